//! Legacy registry extract rows
//!
//! Field names follow the extract vocabulary exactly (`cp_` party rows,
//! `ssc_`/`srs_` share class and series rows, `o_`/`ma_`/`da_` office and
//! address rows). Renaming any of them breaks the hand-off from the extract
//! queries, so they are kept verbatim here and mapped to readable names
//! only on the snapshot side.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// All rows pulled from the legacy registry for one business
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ExtractBatch {
    #[serde(default)]
    pub businesses: Vec<BusinessRow>,
    #[serde(default)]
    pub offices: Vec<OfficeRow>,
    #[serde(default)]
    pub parties: Vec<PartyRow>,
    #[serde(default)]
    pub share_classes: Vec<ShareClassRow>,
    #[serde(default)]
    pub aliases: Vec<AliasRow>,
    #[serde(default)]
    pub resolutions: Vec<ResolutionRow>,
}

impl ExtractBatch {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load an extract batch from a JSON file on disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

// ============================================================================
// Business
// ============================================================================

/// Corporation row. Only `ACT` and `HIS` states are extracted.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BusinessRow {
    pub state: String,
    #[serde(deserialize_with = "nullable")]
    pub founding_date: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub last_ar_date: Option<String>,
    /// Remaining corporation columns, passed through to the snapshot untouched
    #[serde(flatten)]
    pub columns: Map<String, Value>,
}

// ============================================================================
// Addresses
// ============================================================================

/// Which of the two embedded address column sets to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    Mailing,
    Delivery,
}

impl AddressKind {
    /// Column prefix used by the extract
    pub fn prefix(&self) -> &'static str {
        match self {
            AddressKind::Mailing => "ma_",
            AddressKind::Delivery => "da_",
        }
    }
}

/// Borrowed view over one address column set, regardless of prefix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressColumns<'a> {
    pub addr_line_1: Option<&'a str>,
    pub addr_line_2: Option<&'a str>,
    pub addr_line_3: Option<&'a str>,
    pub city: Option<&'a str>,
    pub province: Option<&'a str>,
    pub country_typ_cd: Option<&'a str>,
    pub postal_cd: Option<&'a str>,
    pub delivery_instructions: Option<&'a str>,
}

/// `ma_*` columns
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct MailingAddressColumns {
    #[serde(rename = "ma_addr_line_1", deserialize_with = "nullable")]
    pub addr_line_1: Option<String>,
    #[serde(rename = "ma_addr_line_2", deserialize_with = "nullable")]
    pub addr_line_2: Option<String>,
    #[serde(rename = "ma_addr_line_3", deserialize_with = "nullable")]
    pub addr_line_3: Option<String>,
    #[serde(rename = "ma_city", deserialize_with = "nullable")]
    pub city: Option<String>,
    #[serde(rename = "ma_province", deserialize_with = "nullable")]
    pub province: Option<String>,
    #[serde(rename = "ma_country_typ_cd", deserialize_with = "nullable")]
    pub country_typ_cd: Option<String>,
    #[serde(rename = "ma_postal_cd", deserialize_with = "nullable")]
    pub postal_cd: Option<String>,
    #[serde(rename = "ma_delivery_instructions", deserialize_with = "nullable")]
    pub delivery_instructions: Option<String>,
}

/// `da_*` columns
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct DeliveryAddressColumns {
    #[serde(rename = "da_addr_line_1", deserialize_with = "nullable")]
    pub addr_line_1: Option<String>,
    #[serde(rename = "da_addr_line_2", deserialize_with = "nullable")]
    pub addr_line_2: Option<String>,
    #[serde(rename = "da_addr_line_3", deserialize_with = "nullable")]
    pub addr_line_3: Option<String>,
    #[serde(rename = "da_city", deserialize_with = "nullable")]
    pub city: Option<String>,
    #[serde(rename = "da_province", deserialize_with = "nullable")]
    pub province: Option<String>,
    #[serde(rename = "da_country_typ_cd", deserialize_with = "nullable")]
    pub country_typ_cd: Option<String>,
    #[serde(rename = "da_postal_cd", deserialize_with = "nullable")]
    pub postal_cd: Option<String>,
    #[serde(rename = "da_delivery_instructions", deserialize_with = "nullable")]
    pub delivery_instructions: Option<String>,
}

impl MailingAddressColumns {
    pub fn columns(&self) -> AddressColumns<'_> {
        AddressColumns {
            addr_line_1: self.addr_line_1.as_deref(),
            addr_line_2: self.addr_line_2.as_deref(),
            addr_line_3: self.addr_line_3.as_deref(),
            city: self.city.as_deref(),
            province: self.province.as_deref(),
            country_typ_cd: self.country_typ_cd.as_deref(),
            postal_cd: self.postal_cd.as_deref(),
            delivery_instructions: self.delivery_instructions.as_deref(),
        }
    }
}

impl DeliveryAddressColumns {
    pub fn columns(&self) -> AddressColumns<'_> {
        AddressColumns {
            addr_line_1: self.addr_line_1.as_deref(),
            addr_line_2: self.addr_line_2.as_deref(),
            addr_line_3: self.addr_line_3.as_deref(),
            city: self.city.as_deref(),
            province: self.province.as_deref(),
            country_typ_cd: self.country_typ_cd.as_deref(),
            postal_cd: self.postal_cd.as_deref(),
            delivery_instructions: self.delivery_instructions.as_deref(),
        }
    }
}

/// A row carrying both a mailing and a delivery column set
pub trait AddressSource {
    fn address_columns(&self, kind: AddressKind) -> AddressColumns<'_>;
}

// ============================================================================
// Offices
// ============================================================================

/// Office row. The extract query only emits `RC` and `RG` offices.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct OfficeRow {
    pub o_office_typ_cd: String,
    #[serde(flatten)]
    pub mailing: MailingAddressColumns,
    #[serde(flatten)]
    pub delivery: DeliveryAddressColumns,
}

impl AddressSource for OfficeRow {
    fn address_columns(&self, kind: AddressKind) -> AddressColumns<'_> {
        match kind {
            AddressKind::Mailing => self.mailing.columns(),
            AddressKind::Delivery => self.delivery.columns(),
        }
    }
}

// ============================================================================
// Parties
// ============================================================================

/// One party row; a person usually spans several rows (one per role)
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PartyRow {
    #[serde(deserialize_with = "nullable")]
    pub cp_full_name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub cp_first_name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub cp_middle_name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub cp_last_name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub cp_party_typ_cd: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub cp_appointment_dt_str: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub cp_cessation_dt_str: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub cp_mailing_addr_id: Option<Value>,
    #[serde(deserialize_with = "nullable")]
    pub cp_delivery_addr_id: Option<Value>,
    #[serde(flatten)]
    pub mailing: MailingAddressColumns,
    #[serde(flatten)]
    pub delivery: DeliveryAddressColumns,
}

impl PartyRow {
    /// Whether this row carries the given address (non-null address id)
    pub fn has_address(&self, kind: AddressKind) -> bool {
        let id = match kind {
            AddressKind::Mailing => &self.cp_mailing_addr_id,
            AddressKind::Delivery => &self.cp_delivery_addr_id,
        };
        !matches!(id, None | Some(Value::Null))
    }
}

impl AddressSource for PartyRow {
    fn address_columns(&self, kind: AddressKind) -> AddressColumns<'_> {
        match kind {
            AddressKind::Mailing => self.mailing.columns(),
            AddressKind::Delivery => self.delivery.columns(),
        }
    }
}

// ============================================================================
// Share classes
// ============================================================================

/// Share class row joined with (at most) one of its series
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ShareClassRow {
    #[serde(deserialize_with = "nullable")]
    pub ssc_share_class_id: Option<Value>,
    #[serde(deserialize_with = "nullable")]
    pub ssc_class_nme: Option<String>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub ssc_max_share_ind: Option<Indicator>,
    #[serde(deserialize_with = "nullable")]
    pub ssc_share_quantity: Option<Value>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub ssc_par_value_ind: Option<Indicator>,
    #[serde(deserialize_with = "nullable")]
    pub ssc_par_value_amt: Option<Value>,
    #[serde(deserialize_with = "nullable")]
    pub ssc_currency_typ_cd: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub ssc_other_currency: Option<String>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub ssc_spec_rights_ind: Option<Indicator>,

    #[serde(deserialize_with = "nullable")]
    pub srs_share_class_id: Option<Value>,
    #[serde(deserialize_with = "nullable")]
    pub srs_series_id: Option<Value>,
    #[serde(deserialize_with = "nullable")]
    pub srs_series_nme: Option<String>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub srs_max_share_ind: Option<Indicator>,
    #[serde(deserialize_with = "nullable")]
    pub srs_share_quantity: Option<Value>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub srs_spec_right_ind: Option<Indicator>,
}

// ============================================================================
// Aliases & resolutions
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AliasRow {
    #[serde(deserialize_with = "nullable")]
    pub cn_corp_name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub cn_corp_name_typ_cd: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ResolutionRow {
    #[serde(deserialize_with = "nullable")]
    pub r_resolution_dt_str: Option<String>,
}

/// Indicator column value. Recognized forms become a flag; anything else
/// is carried through as the extract's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Indicator {
    Flag(bool),
    Raw(String),
}

impl Indicator {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Indicator::Flag(b) => Some(*b),
            Indicator::Raw(_) => None,
        }
    }
}

/// Every extract column is present in a row, possibly as null. A missing
/// column fails deserialization instead of reading as `None`.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Indicator columns come through as booleans, `Y`/`N` or `1`/`0`
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<Option<Indicator>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let indicator = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Bool(b)) => Indicator::Flag(b),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(0) => Indicator::Flag(false),
            Some(1) => Indicator::Flag(true),
            _ => Indicator::Raw(n.to_string()),
        },
        Some(Value::String(s)) => match s.trim().to_ascii_uppercase().as_str() {
            "" => return Ok(None),
            "Y" | "YES" | "T" | "TRUE" | "1" => Indicator::Flag(true),
            "N" | "NO" | "F" | "FALSE" | "0" => Indicator::Flag(false),
            _ => Indicator::Raw(s),
        },
        Some(other) => Indicator::Raw(other.to_string()),
    };
    Ok(Some(indicator))
}
