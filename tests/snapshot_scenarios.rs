//! End-to-end formatting of a realistic extract batch
//!
//! Exercises the public API only: load a batch from JSON, run every
//! formatter through the dispatch table and check the snapshot shape.

use std::io::Write;

use serde::Serialize;
use serde_json::{json, Value};
use tombstone::extract::{AliasRow, OfficeRow, PartyRow, ResolutionRow, ShareClassRow};
use tombstone::snapshot::{
    format_address_data, format_business_data, BusinessState, OfficeType, RoleType,
};
use tombstone::{
    format_snapshot, snapshot_formatters, Category, ExtractBatch, SnapshotSection, TombstoneError,
};

/// Fill each row's unlisted columns with null, as the extract queries do
fn with_null_columns<T: Default + Serialize>(rows: &mut Value) {
    let blank = serde_json::to_value(T::default()).unwrap();
    for row in rows.as_array_mut().into_iter().flatten() {
        let mut full = blank.clone();
        if let (Some(full), Some(columns)) = (full.as_object_mut(), row.as_object()) {
            full.extend(columns.clone());
        }
        *row = full;
    }
}

fn sample_extract() -> Value {
    let mut extract = sparse_extract();
    with_null_columns::<OfficeRow>(&mut extract["offices"]);
    with_null_columns::<PartyRow>(&mut extract["parties"]);
    with_null_columns::<ShareClassRow>(&mut extract["share_classes"]);
    with_null_columns::<AliasRow>(&mut extract["aliases"]);
    with_null_columns::<ResolutionRow>(&mut extract["resolutions"]);
    extract
}

fn sparse_extract() -> Value {
    json!({
        "businesses": [{
            "identifier": "BC0871234",
            "legal_name": "HARBOUR FREIGHT LTD.",
            "legal_type": "BC",
            "state": "ACT",
            "founding_date": "2020-01-01",
            "last_ar_date": "2023-06-15"
        }],
        "offices": [
            {
                "o_office_typ_cd": "RC",
                "ma_addr_line_1": "PO Box 88", "ma_addr_line_2": null, "ma_addr_line_3": "  ",
                "ma_city": "Victoria", "ma_province": "BC", "ma_country_typ_cd": "CA",
                "ma_postal_cd": "V8W 1A1", "ma_delivery_instructions": null,
                "da_addr_line_1": "12 Wharf St", "da_addr_line_2": "Unit 3", "da_addr_line_3": null,
                "da_city": "Victoria", "da_province": "BC", "da_country_typ_cd": "CA",
                "da_postal_cd": "V8W 1A1", "da_delivery_instructions": "Rear door"
            },
            {
                "o_office_typ_cd": "RG",
                "ma_addr_line_1": "1 Main St", "ma_city": "Nanaimo",
                "da_addr_line_1": "1 Main St", "da_city": "Nanaimo"
            }
        ],
        "parties": [
            {
                "cp_full_name": "John Smith", "cp_first_name": "John", "cp_middle_name": "Q",
                "cp_last_name": "Smith", "cp_party_typ_cd": "INC",
                "cp_appointment_dt_str": "2020-01-01", "cp_cessation_dt_str": null,
                "cp_mailing_addr_id": null, "cp_delivery_addr_id": null
            },
            {
                "cp_full_name": "John Smith", "cp_first_name": "John", "cp_middle_name": "Q",
                "cp_last_name": "Smith", "cp_party_typ_cd": "DIR",
                "cp_appointment_dt_str": "2020-01-01", "cp_cessation_dt_str": "2022-12-31",
                "cp_mailing_addr_id": 501, "cp_delivery_addr_id": 502,
                "ma_addr_line_1": "9 Bay Rd", "ma_city": "Sooke",
                "da_addr_line_1": "9 Bay Rd", "da_city": "Sooke"
            },
            {
                "cp_full_name": "John Smith", "cp_party_typ_cd": "OFF",
                "cp_appointment_dt_str": "2021-05-05"
            },
            {
                "cp_full_name": "Ann Lee", "cp_first_name": "Ann", "cp_last_name": "Lee",
                "cp_party_typ_cd": "DIR", "cp_appointment_dt_str": "2021-02-02"
            }
        ],
        "share_classes": [
            {
                "ssc_share_class_id": 1, "ssc_class_nme": "Common", "ssc_currency_typ_cd": "OTH",
                "ssc_other_currency": "XYZ", "ssc_max_share_ind": "N", "ssc_share_quantity": null,
                "ssc_par_value_ind": "Y", "ssc_par_value_amt": "0.01", "ssc_spec_rights_ind": "N",
                "srs_share_class_id": null
            },
            {
                "ssc_share_class_id": 2, "ssc_class_nme": "Preferred", "ssc_currency_typ_cd": "CAD",
                "ssc_max_share_ind": "Y", "ssc_share_quantity": 10000, "ssc_spec_rights_ind": "Y",
                "srs_share_class_id": 2, "srs_series_id": 1, "srs_series_nme": "Series A",
                "srs_max_share_ind": "Y", "srs_share_quantity": "2500", "srs_spec_right_ind": "N"
            }
        ],
        "aliases": [
            { "cn_corp_name": "FRET PORTUAIRE LTEE", "cn_corp_name_typ_cd": "TR" },
            { "cn_corp_name": "HARBOUR FREIGHT LTD.", "cn_corp_name_typ_cd": "CO" },
            { "cn_corp_name": "PORTO CARGA LTDA", "cn_corp_name_typ_cd": "TR" }
        ],
        "resolutions": [
            { "r_resolution_dt_str": "2021-07-01" }
        ]
    })
}

fn sample_batch() -> ExtractBatch {
    serde_json::from_value(sample_extract()).unwrap()
}

#[test]
fn test_full_snapshot() {
    let snapshot = format_snapshot(&sample_batch()).unwrap();

    let business = &snapshot.businesses;
    assert_eq!(business.state, BusinessState::Active);
    assert_eq!(business.fiscal_year_end_date.as_deref(), Some("2020-01-01"));
    assert_eq!(business.last_ar_year, Some(2023));
    assert_eq!(business.columns["legal_name"], json!("HARBOUR FREIGHT LTD."));

    assert_eq!(snapshot.offices.len(), 2);
    assert_eq!(snapshot.offices[0].offices.office_type, OfficeType::RecordsOffice);
    assert_eq!(snapshot.offices[1].offices.office_type, OfficeType::RegisteredOffice);
    assert_eq!(snapshot.offices[0].addresses[0].street_additional, "");
    assert_eq!(snapshot.offices[0].addresses[1].street_additional, "Unit 3");
    assert_eq!(snapshot.offices[0].addresses[1].delivery_instructions, "Rear door");

    assert_eq!(snapshot.parties.len(), 2);
    let john = &snapshot.parties[0];
    assert_eq!(john.parties.middle_initial.as_deref(), Some("Q"));
    assert_eq!(john.addresses.len(), 2);
    assert_eq!(john.addresses[0].street.as_deref(), Some("9 Bay Rd"));
    let roles: Vec<_> = john.party_roles.iter().map(|r| r.role).collect();
    assert_eq!(roles, vec![RoleType::Incorporator, RoleType::Director]);
    assert_eq!(john.party_roles[1].cessation_date.as_deref(), Some("2022-12-31"));

    let ann = &snapshot.parties[1];
    assert!(ann.addresses.is_empty());
    assert_eq!(ann.party_roles.len(), 1);

    assert_eq!(snapshot.share_classes.len(), 2);
    assert_eq!(snapshot.share_classes[0].share_classes.currency.as_deref(), Some("XYZ"));
    assert!(snapshot.share_classes[0].share_series.is_empty());
    assert_eq!(snapshot.share_classes[1].share_classes.max_shares, Some(10000));
    assert_eq!(snapshot.share_classes[1].share_series[0].max_shares, Some(2500));

    assert_eq!(snapshot.aliases.len(), 2);
    assert_eq!(snapshot.resolutions.len(), 1);
}

#[test]
fn test_snapshot_json_shape() {
    let value = serde_json::to_value(format_snapshot(&sample_batch()).unwrap()).unwrap();

    assert_eq!(value["businesses"]["state"], "ACTIVE");
    assert_eq!(value["businesses"]["identifier"], "BC0871234");
    assert_eq!(value["businesses"]["last_ar_year"], 2023);
    assert_eq!(value["offices"][0]["offices"]["office_type"], "recordsOffice");
    assert_eq!(value["offices"][0]["addresses"][0]["address_type"], "mailing");
    assert_eq!(value["offices"][0]["addresses"][0]["region"], "BC");
    assert_eq!(value["parties"][0]["parties"]["party_type"], "person");
    assert_eq!(value["parties"][0]["party_roles"][0]["role"], "incorporator");
    assert_eq!(value["parties"][0]["party_roles"][0]["cessation_date"], Value::Null);
    assert_eq!(value["share_classes"][0]["share_classes"]["par_value"], 0.01);
    assert_eq!(value["share_classes"][0]["share_classes"]["max_shares"], Value::Null);
    assert_eq!(value["aliases"][0]["type"], "TRANSLATION");
    assert_eq!(value["resolutions"][0]["type"], "SPECIAL");
}

#[test]
fn test_business_without_annual_report_omits_year() {
    let mut extract = sample_extract();
    extract["businesses"][0]["last_ar_date"] = Value::Null;
    extract["businesses"][0]["state"] = json!("HIS");
    let batch: ExtractBatch = serde_json::from_value(extract).unwrap();

    let business = format_business_data(&batch).unwrap();
    assert_eq!(business.state, BusinessState::Historical);

    let value = serde_json::to_value(&business).unwrap();
    assert!(value.get("last_ar_year").is_none());
}

#[test]
fn test_formatters_are_idempotent() {
    let batch = sample_batch();

    for (category, formatter) in snapshot_formatters() {
        let first = formatter(&batch).unwrap();
        let second = formatter(&batch).unwrap();

        match (first, second) {
            (SnapshotSection::Business(mut a), SnapshotSection::Business(b)) => {
                a.last_modified = b.last_modified;
                assert_eq!(a, b, "{category} differs between runs");
            }
            (a, b) => assert_eq!(a, b, "{category} differs between runs"),
        }
    }
}

#[test]
fn test_dispatch_by_category_name() {
    let batch = sample_batch();
    let formatter = "aliases".parse::<Category>().unwrap().formatter();

    match formatter(&batch).unwrap() {
        SnapshotSection::Aliases(aliases) => assert_eq!(aliases.len(), 2),
        other => panic!("unexpected section: {other:?}"),
    }
}

#[test]
fn test_party_row_order_decides_representative() {
    let mut extract = sample_extract();
    let parties = extract["parties"].as_array_mut().unwrap();
    parties.swap(0, 1);
    let batch: ExtractBatch = serde_json::from_value(extract).unwrap();

    let snapshot = format_snapshot(&batch).unwrap();
    let roles: Vec<_> = snapshot.parties[0].party_roles.iter().map(|r| r.role).collect();
    assert_eq!(roles, vec![RoleType::Director, RoleType::Incorporator]);
}

#[test]
fn test_missing_business_fails_snapshot() {
    let mut extract = sample_extract();
    extract["businesses"] = json!([]);
    let batch: ExtractBatch = serde_json::from_value(extract).unwrap();

    assert!(matches!(
        format_snapshot(&batch),
        Err(TombstoneError::MissingBusiness)
    ));
}

#[test]
fn test_row_missing_a_column_is_rejected() {
    let mut extract = sample_extract();
    extract["parties"][0]
        .as_object_mut()
        .unwrap()
        .remove("cp_full_name");

    let err = ExtractBatch::from_json_str(&extract.to_string()).unwrap_err();
    assert!(matches!(err, TombstoneError::Serialization(_)));
    assert!(err.to_string().contains("cp_full_name"));

    let err = ExtractBatch::from_json_str(&sparse_extract().to_string()).unwrap_err();
    assert!(matches!(err, TombstoneError::Serialization(_)));
}

#[test]
fn test_unrecognized_indicator_passes_through() {
    let mut extract = sample_extract();
    extract["share_classes"][1]["ssc_spec_rights_ind"] = json!("?");
    let batch: ExtractBatch = serde_json::from_value(extract).unwrap();

    let value = serde_json::to_value(format_snapshot(&batch).unwrap()).unwrap();
    let class = &value["share_classes"][1]["share_classes"];
    assert_eq!(class["special_rights_flag"], "?");
    assert_eq!(class["max_share_flag"], true);
}

#[test]
fn test_office_address_reuse() {
    let batch = sample_batch();
    let address = format_address_data(&batch.offices[1], tombstone::extract::AddressKind::Mailing);
    assert_eq!(address.street.as_deref(), Some("1 Main St"));
    assert_eq!(address.region, None);
    assert_eq!(address.street_additional, "");
    assert_eq!(address.delivery_instructions, "");
}

#[test]
fn test_load_extract_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", sample_extract()).unwrap();

    let batch = ExtractBatch::from_path(file.path()).unwrap();
    assert_eq!(batch.parties.len(), 4);
    assert_eq!(batch.share_classes.len(), 2);
}

#[test]
fn test_load_extract_missing_file() {
    let result = ExtractBatch::from_path("/nonexistent/extract.json");
    assert!(matches!(result, Err(TombstoneError::Io(_))));
}
