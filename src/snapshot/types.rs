//! Snapshot document shapes handed to the downstream loader
//!
//! Every formatted item is built fresh from its rows; nothing here aliases
//! the extract.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::extract::{AddressKind, Indicator};

// ============================================================================
// Business
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessState {
    Active,
    Historical,
}

impl BusinessState {
    /// `ACT` is active; every other extracted state is historical
    pub fn from_code(code: &str) -> Self {
        match code {
            "ACT" => BusinessState::Active,
            _ => BusinessState::Historical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedBusiness {
    /// Extract columns carried over as-is
    #[serde(flatten)]
    pub columns: Map<String, Value>,
    pub state: BusinessState,
    pub founding_date: Option<String>,
    pub last_ar_date: Option<String>,
    pub fiscal_year_end_date: Option<String>,
    pub last_ledger_timestamp: Option<String>,
    pub last_modified: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ar_year: Option<i32>,
}

// ============================================================================
// Addresses & offices
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedAddress {
    pub address_type: AddressKind,
    pub street: Option<String>,
    pub street_additional: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub delivery_instructions: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OfficeType {
    RegisteredOffice,
    RecordsOffice,
    CustodialOffice,
    BusinessOffice,
    LiquidationRecordsOffice,
}

impl OfficeType {
    pub const ALL: [OfficeType; 5] = [
        OfficeType::RegisteredOffice,
        OfficeType::RecordsOffice,
        OfficeType::CustodialOffice,
        OfficeType::BusinessOffice,
        OfficeType::LiquidationRecordsOffice,
    ];

    /// Map an extract office code. Only `RC` and `RG` are extracted today.
    pub fn from_code(code: &str) -> Self {
        match code {
            "RC" => OfficeType::RecordsOffice,
            _ => OfficeType::RegisteredOffice,
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            OfficeType::RegisteredOffice => "registeredOffice",
            OfficeType::RecordsOffice => "recordsOffice",
            OfficeType::CustodialOffice => "custodialOffice",
            OfficeType::BusinessOffice => "businessOffice",
            OfficeType::LiquidationRecordsOffice => "liquidationRecordsOffice",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OfficeType::RegisteredOffice => "Registered Office",
            OfficeType::RecordsOffice => "Records Office",
            OfficeType::CustodialOffice => "Custodial Office",
            OfficeType::BusinessOffice => "Business Office",
            OfficeType::LiquidationRecordsOffice => "Liquidation Records Office",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OfficeInfo {
    pub office_type: OfficeType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedOffice {
    pub offices: OfficeInfo,
    pub addresses: Vec<FormattedAddress>,
}

// ============================================================================
// Parties
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    Person,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleType {
    Incorporator,
    Director,
}

impl RoleType {
    /// `INC` and `DIR` are the only roles carried into the snapshot
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "INC" => Some(RoleType::Incorporator),
            "DIR" => Some(RoleType::Director),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyInfo {
    pub first_name: Option<String>,
    pub middle_initial: Option<String>,
    pub last_name: Option<String>,
    pub party_type: PartyType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyRole {
    pub role: RoleType,
    pub appointment_date: Option<String>,
    /// `None` while the role is still held
    pub cessation_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedParty {
    pub parties: PartyInfo,
    pub addresses: Vec<FormattedAddress>,
    pub party_roles: Vec<PartyRole>,
}

// ============================================================================
// Share structure
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareSeries {
    pub name: Option<String>,
    pub priority: Option<i64>,
    pub max_share_flag: Option<Indicator>,
    pub max_shares: Option<i64>,
    pub special_rights_flag: Option<Indicator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareClassInfo {
    pub name: Option<String>,
    pub priority: Option<i64>,
    pub max_share_flag: Option<Indicator>,
    pub max_shares: Option<i64>,
    pub par_value_flag: Option<Indicator>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub par_value: Option<Decimal>,
    pub currency: Option<String>,
    pub special_rights_flag: Option<Indicator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedShareClass {
    pub share_classes: ShareClassInfo,
    pub share_series: Vec<ShareSeries>,
}

// ============================================================================
// Aliases & resolutions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AliasType {
    Translation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedAlias {
    pub alias: Option<String>,
    #[serde(rename = "type")]
    pub alias_type: AliasType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionType {
    Special,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedResolution {
    pub resolution_date: Option<String>,
    #[serde(rename = "type")]
    pub resolution_type: ResolutionType,
}
