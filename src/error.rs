//! Error handling for the tombstone snapshot pipeline
//!
//! Domain filters (unsupported office types, roles and alias types) are not
//! errors and never show up here.

use thiserror::Error;

/// Main error type for extract formatting and loading
#[derive(Error, Debug)]
pub enum TombstoneError {
    #[error("Extract batch has no business record")]
    MissingBusiness,

    #[error("Extract batch must hold exactly one business record, found {0}")]
    UnexpectedBusinessCount(usize),

    #[error("Invalid numeric value for '{field}': {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Unknown snapshot category: {0}")]
    UnknownCategory(String),

    #[error("Unknown configuration environment: {0}")]
    UnknownEnvironment(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bulk insert into '{table}' has rows with differing columns")]
    MismatchedColumns { table: String },

    #[error("Insert into '{table}' has no rows or no columns")]
    EmptyInsert { table: String },

    #[error("Insert into '{table}' returned no identifier")]
    MissingIdentifier { table: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, TombstoneError>;
