//! Per-category formatting of extract rows into snapshot documents

use chrono::{DateTime, Utc};

use super::coerce::{coerce_decimal, coerce_int, group_key, non_blank};
use super::group::{first_where, group_by_key};
use super::types::*;
use crate::error::{Result, TombstoneError};
use crate::extract::{AddressKind, AddressSource, ExtractBatch, PartyRow, ShareClassRow};

const DERIVED_BUSINESS_COLUMNS: [&str; 3] =
    ["fiscal_year_end_date", "last_ledger_timestamp", "last_modified"];

/// Format the batch's single business record, stamped with the current time
pub fn format_business_data(batch: &ExtractBatch) -> Result<FormattedBusiness> {
    format_business_data_at(batch, Utc::now())
}

/// Format the business record with an explicit generation timestamp
pub fn format_business_data_at(
    batch: &ExtractBatch,
    generated_at: DateTime<Utc>,
) -> Result<FormattedBusiness> {
    let business = match batch.businesses.as_slice() {
        [] => return Err(TombstoneError::MissingBusiness),
        [only] => only,
        rows => return Err(TombstoneError::UnexpectedBusinessCount(rows.len())),
    };

    let last_ar_year = match business.last_ar_date.as_deref() {
        Some(date) if !date.is_empty() => Some(parse_leading_year(date)?),
        _ => None,
    };

    // Derived fields replace same-named extract columns. An extract
    // `last_ar_year` survives only when no year is derived.
    let mut columns = business.columns.clone();
    for key in DERIVED_BUSINESS_COLUMNS {
        columns.remove(key);
    }
    if last_ar_year.is_some() {
        columns.remove("last_ar_year");
    }

    Ok(FormattedBusiness {
        columns,
        state: BusinessState::from_code(&business.state),
        founding_date: business.founding_date.clone(),
        last_ar_date: business.last_ar_date.clone(),
        fiscal_year_end_date: business.founding_date.clone(),
        last_ledger_timestamp: business.founding_date.clone(),
        last_modified: generated_at,
        last_ar_year,
    })
}

/// Year component of a `YYYY-MM-DD` date string
fn parse_leading_year(date: &str) -> Result<i32> {
    let year = date.split('-').next().unwrap_or(date);
    year.trim()
        .parse::<i32>()
        .map_err(|_| TombstoneError::InvalidNumber {
            field: "last_ar_date",
            value: date.to_string(),
        })
}

/// Format one of the two address column sets carried by a row
pub fn format_address_data<S: AddressSource + ?Sized>(
    row: &S,
    kind: AddressKind,
) -> FormattedAddress {
    let columns = row.address_columns(kind);

    let street_additional = [columns.addr_line_2, columns.addr_line_3]
        .into_iter()
        .filter_map(non_blank)
        .collect::<Vec<_>>()
        .join(" ");

    FormattedAddress {
        address_type: kind,
        street: columns.addr_line_1.map(str::to_string),
        street_additional,
        city: columns.city.map(str::to_string),
        region: columns.province.map(str::to_string),
        country: columns.country_typ_cd.map(str::to_string),
        postal_code: columns.postal_cd.map(str::to_string),
        delivery_instructions: non_blank(columns.delivery_instructions)
            .unwrap_or_default()
            .to_string(),
    }
}

pub fn format_offices_data(batch: &ExtractBatch) -> Vec<FormattedOffice> {
    batch
        .offices
        .iter()
        .map(|office| FormattedOffice {
            offices: OfficeInfo {
                office_type: OfficeType::from_code(&office.o_office_typ_cd),
            },
            addresses: vec![
                format_address_data(office, AddressKind::Mailing),
                format_address_data(office, AddressKind::Delivery),
            ],
        })
        .collect()
}

/// Collapse party rows into one party per full name
pub fn format_parties_data(batch: &ExtractBatch) -> Vec<FormattedParty> {
    group_by_key(&batch.parties, |row| row.cp_full_name.clone())
        .values()
        .filter_map(|rows| format_party_group(rows))
        .collect()
}

fn format_party_group(rows: &[&PartyRow]) -> Option<FormattedParty> {
    let first = rows.first()?;

    // The address may sit on any row of the group, not just the first
    let addresses = [AddressKind::Mailing, AddressKind::Delivery]
        .into_iter()
        .filter_map(|kind| {
            first_where(rows, |row| row.has_address(kind))
                .map(|row| format_address_data(row, kind))
        })
        .collect();

    let party_roles = rows
        .iter()
        .filter_map(|row| {
            let role = RoleType::from_code(row.cp_party_typ_cd.as_deref()?)?;
            Some(PartyRole {
                role,
                appointment_date: row.cp_appointment_dt_str.clone(),
                cessation_date: row.cp_cessation_dt_str.clone(),
            })
        })
        .collect();

    Some(FormattedParty {
        parties: PartyInfo {
            first_name: first.cp_first_name.clone(),
            middle_initial: first.cp_middle_name.clone(),
            last_name: first.cp_last_name.clone(),
            party_type: PartyType::Person,
        },
        addresses,
        party_roles,
    })
}

pub fn format_share_series_data(row: &ShareClassRow) -> Result<ShareSeries> {
    Ok(ShareSeries {
        name: row.srs_series_nme.clone(),
        priority: coerce_int("srs_series_id", row.srs_series_id.as_ref())?,
        max_share_flag: row.srs_max_share_ind.clone(),
        max_shares: coerce_int("srs_share_quantity", row.srs_share_quantity.as_ref())?,
        special_rights_flag: row.srs_spec_right_ind.clone(),
    })
}

/// Collapse share class rows into one class per class id, with its series
pub fn format_share_classes_data(batch: &ExtractBatch) -> Result<Vec<FormattedShareClass>> {
    let groups = group_by_key(&batch.share_classes, |row| {
        group_key(row.ssc_share_class_id.as_ref())
    });

    let mut formatted = Vec::with_capacity(groups.len());
    for (class_id, rows) in &groups {
        let Some(first) = rows.first() else {
            continue;
        };

        // TODO: map a null or free-text ssc_other_currency onto a currency code
        let currency = match first.ssc_currency_typ_cd.as_deref() {
            Some("OTH") => first.ssc_other_currency.clone(),
            code => code.map(str::to_string),
        };

        let share_classes = ShareClassInfo {
            name: first.ssc_class_nme.clone(),
            priority: coerce_int("ssc_share_class_id", first.ssc_share_class_id.as_ref())?,
            max_share_flag: first.ssc_max_share_ind.clone(),
            max_shares: coerce_int("ssc_share_quantity", first.ssc_share_quantity.as_ref())?,
            par_value_flag: first.ssc_par_value_ind.clone(),
            par_value: coerce_decimal("ssc_par_value_amt", first.ssc_par_value_amt.as_ref())?,
            currency,
            special_rights_flag: first.ssc_spec_rights_ind.clone(),
        };

        // A series row references its class; rows with no series carry null
        let share_series = rows
            .iter()
            .filter(|row| {
                group_key(row.srs_share_class_id.as_ref()).as_deref() == Some(class_id.as_str())
            })
            .map(|row| format_share_series_data(row))
            .collect::<Result<Vec<_>>>()?;

        formatted.push(FormattedShareClass {
            share_classes,
            share_series,
        });
    }

    Ok(formatted)
}

/// Translation names only
pub fn format_aliases_data(batch: &ExtractBatch) -> Vec<FormattedAlias> {
    batch
        .aliases
        .iter()
        .filter(|alias| alias.cn_corp_name_typ_cd.as_deref() == Some("TR"))
        .map(|alias| FormattedAlias {
            alias: alias.cn_corp_name.clone(),
            alias_type: AliasType::Translation,
        })
        .collect()
}

pub fn format_resolutions_data(batch: &ExtractBatch) -> Vec<FormattedResolution> {
    batch
        .resolutions
        .iter()
        .map(|resolution| FormattedResolution {
            resolution_date: resolution.r_resolution_dt_str.clone(),
            resolution_type: ResolutionType::Special,
        })
        .collect()
}
