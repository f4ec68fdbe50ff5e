//! Lookup table seed data
//!
//! Office type identifiers and the dissolution configuration defaults the
//! registry schema expects to find before any snapshot is loaded.

use tracing::info;

use crate::error::Result;
use crate::load::{load_rows, Row, SqlSink, SqlValue};
use crate::snapshot::OfficeType;

pub const OFFICE_TYPES_TABLE: &str = "office_types";
pub const CONFIGURATIONS_TABLE: &str = "configurations";

/// One row of the `configurations` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationSeed {
    pub name: &'static str,
    pub val: &'static str,
    pub short_description: &'static str,
    pub full_description: &'static str,
}

pub const CONFIGURATION_SEEDS: [ConfigurationSeed; 5] = [
    ConfigurationSeed {
        name: "NUM_DISSOLUTIONS_ALLOWED",
        val: "2",
        short_description: "Number of involuntary dissolutions per day.",
        full_description: "Number of involuntary dissolutions per day.",
    },
    ConfigurationSeed {
        name: "MAX_DISSOLUTIONS_ALLOWED",
        val: "2500",
        short_description: "Max number of involuntary dissolutions permitted per day.",
        full_description: "Max number of involuntary dissolutions permitted per day. \
            This is used to validate the upper limit for NUM_DISSOLUTIONS_ALLOWED.",
    },
    ConfigurationSeed {
        name: "DISSOLUTIONS_STAGE_1_SCHEDULE",
        val: "* * * * * ",
        short_description: "Cron string for which days new involuntary dissolutions can be initiated.",
        full_description: "Cron string for which days new involuntary dissolutions can be initiated.",
    },
    ConfigurationSeed {
        name: "DISSOLUTIONS_STAGE_2_SCHEDULE",
        val: "* * * * * ",
        short_description: "Schedule for running stage 2 of dissolution process.",
        full_description: "Schedule for running stage 2 of dissolution process.",
    },
    ConfigurationSeed {
        name: "DISSOLUTIONS_STAGE_3_SCHEDULE",
        val: "* * * * * ",
        short_description: "Schedule for running stage 3 of dissolution process.",
        full_description: "Schedule for running stage 3 of dissolution process.",
    },
];

pub fn office_type_rows() -> Vec<Row> {
    OfficeType::ALL
        .iter()
        .map(|office_type| {
            Row::from([
                ("identifier".to_string(), SqlValue::from(office_type.identifier())),
                ("description".to_string(), SqlValue::from(office_type.description())),
            ])
        })
        .collect()
}

pub fn configuration_rows() -> Vec<Row> {
    CONFIGURATION_SEEDS
        .iter()
        .map(|seed| {
            Row::from([
                ("name".to_string(), SqlValue::from(seed.name)),
                ("val".to_string(), SqlValue::from(seed.val)),
                ("short_description".to_string(), SqlValue::from(seed.short_description)),
                ("full_description".to_string(), SqlValue::from(seed.full_description)),
            ])
        })
        .collect()
}

/// Rows written by [`seed_lookup_data`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub office_types: u64,
    pub configurations: u64,
}

/// Bulk insert the lookup rows, one statement per table
pub async fn seed_lookup_data<S: SqlSink + ?Sized>(sink: &mut S) -> Result<SeedSummary> {
    let office_types = load_rows(sink, OFFICE_TYPES_TABLE, &office_type_rows()).await?;
    let configurations = load_rows(sink, CONFIGURATIONS_TABLE, &configuration_rows()).await?;

    info!(office_types, configurations, "seeded lookup tables");

    Ok(SeedSummary {
        office_types,
        configurations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::tests::RecordingSink;

    #[test]
    fn test_office_type_rows() {
        let rows = office_type_rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0]["identifier"], SqlValue::from("registeredOffice"));
        assert_eq!(rows[4]["description"], SqlValue::from("Liquidation Records Office"));
    }

    #[test]
    fn test_configuration_rows_keep_column_order() {
        let rows = configuration_rows();
        let columns: Vec<_> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(
            columns,
            vec!["name", "val", "short_description", "full_description"]
        );
        assert_eq!(rows[1]["val"], SqlValue::from("2500"));
    }

    #[tokio::test]
    async fn test_seed_lookup_data() {
        let mut sink = RecordingSink::default();
        let summary = seed_lookup_data(&mut sink).await.unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                office_types: 5,
                configurations: 5
            }
        );
        assert_eq!(sink.statements.len(), 2);
        assert!(sink.statements[0].starts_with(
            "insert into office_types (identifier, description) values ('registeredOffice', 'Registered Office'), "
        ));
        assert!(sink.statements[1].contains("'NUM_DISSOLUTIONS_ALLOWED', '2'"));
    }
}
