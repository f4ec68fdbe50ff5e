//! Tombstone snapshot tooling for migrated registry businesses
//!
//! - [`extract`]: flat rows pulled from the legacy registry
//! - [`snapshot`]: formatters that reshape those rows into snapshot documents
//! - [`load`]: insert statements and the connection seam they run on
//! - [`lookup`]: lookup table seed rows
//! - [`config`]: environment driven settings

pub mod config;
pub mod error;
pub mod extract;
pub mod load;
pub mod lookup;
pub mod snapshot;

pub use config::{Environment, TombstoneConfig};
pub use error::{Result, TombstoneError};
pub use extract::ExtractBatch;
pub use snapshot::{format_snapshot, snapshot_formatters, Category, Snapshot, SnapshotSection};
