//! Tombstone snapshot formatter
//!
//! Reshapes a flat legacy registry extract into the nested snapshot
//! documents consumed by the downstream loader. Each category has its own
//! formatter; [`snapshot_formatters`] is the dispatch table over them.

pub mod coerce;
pub mod format;
pub mod group;
pub mod types;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, TombstoneError};
use crate::extract::ExtractBatch;

pub use format::*;
pub use types::*;

/// Extract categories, in the order they are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Businesses,
    Offices,
    Parties,
    ShareClasses,
    Aliases,
    Resolutions,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Businesses,
        Category::Offices,
        Category::Parties,
        Category::ShareClasses,
        Category::Aliases,
        Category::Resolutions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Businesses => "businesses",
            Category::Offices => "offices",
            Category::Parties => "parties",
            Category::ShareClasses => "share_classes",
            Category::Aliases => "aliases",
            Category::Resolutions => "resolutions",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Formatter registered for this category
    pub fn formatter(self) -> Formatter {
        match self {
            Category::Businesses => business_section,
            Category::Offices => offices_section,
            Category::Parties => parties_section,
            Category::ShareClasses => share_classes_section,
            Category::Aliases => aliases_section,
            Category::Resolutions => resolutions_section,
        }
    }
}

fn business_section(batch: &ExtractBatch) -> Result<SnapshotSection> {
    format_business_data(batch).map(SnapshotSection::Business)
}

fn offices_section(batch: &ExtractBatch) -> Result<SnapshotSection> {
    Ok(SnapshotSection::Offices(format_offices_data(batch)))
}

fn parties_section(batch: &ExtractBatch) -> Result<SnapshotSection> {
    Ok(SnapshotSection::Parties(format_parties_data(batch)))
}

fn share_classes_section(batch: &ExtractBatch) -> Result<SnapshotSection> {
    format_share_classes_data(batch).map(SnapshotSection::ShareClasses)
}

fn aliases_section(batch: &ExtractBatch) -> Result<SnapshotSection> {
    Ok(SnapshotSection::Aliases(format_aliases_data(batch)))
}

fn resolutions_section(batch: &ExtractBatch) -> Result<SnapshotSection> {
    Ok(SnapshotSection::Resolutions(format_resolutions_data(batch)))
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TombstoneError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| TombstoneError::UnknownCategory(s.to_string()))
    }
}

/// Formatter signature shared by every category
pub type Formatter = fn(&ExtractBatch) -> Result<SnapshotSection>;

/// Output of a single category formatter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SnapshotSection {
    Business(FormattedBusiness),
    Offices(Vec<FormattedOffice>),
    Parties(Vec<FormattedParty>),
    ShareClasses(Vec<FormattedShareClass>),
    Aliases(Vec<FormattedAlias>),
    Resolutions(Vec<FormattedResolution>),
}

impl SnapshotSection {
    /// Number of formatted documents in the section
    pub fn len(&self) -> usize {
        match self {
            SnapshotSection::Business(_) => 1,
            SnapshotSection::Offices(items) => items.len(),
            SnapshotSection::Parties(items) => items.len(),
            SnapshotSection::ShareClasses(items) => items.len(),
            SnapshotSection::Aliases(items) => items.len(),
            SnapshotSection::Resolutions(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Category name to formatter table
pub fn snapshot_formatters() -> [(Category, Formatter); 6] {
    Category::ALL.map(|category| (category, category.formatter()))
}

/// Every category of one business, formatted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub businesses: FormattedBusiness,
    pub offices: Vec<FormattedOffice>,
    pub parties: Vec<FormattedParty>,
    pub share_classes: Vec<FormattedShareClass>,
    pub aliases: Vec<FormattedAlias>,
    pub resolutions: Vec<FormattedResolution>,
}

/// Format all six categories; the first failing category aborts the batch
pub fn format_snapshot(batch: &ExtractBatch) -> Result<Snapshot> {
    let snapshot = Snapshot {
        businesses: format_business_data(batch)?,
        offices: format_offices_data(batch),
        parties: format_parties_data(batch),
        share_classes: format_share_classes_data(batch)?,
        aliases: format_aliases_data(batch),
        resolutions: format_resolutions_data(batch),
    };

    debug!(
        offices = snapshot.offices.len(),
        parties = snapshot.parties.len(),
        share_classes = snapshot.share_classes.len(),
        aliases = snapshot.aliases.len(),
        resolutions = snapshot.resolutions.len(),
        "formatted tombstone snapshot"
    );

    Ok(snapshot)
}
