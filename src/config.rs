//! Runtime configuration
//!
//! Values come from the process environment, after loading a `.env` file
//! when one is present.

use std::fmt;

use crate::error::{Result, TombstoneError};

const DEFAULT_LOG_FILTER: &str = "info";

/// Named deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    Testing,
    #[default]
    Production,
}

impl Environment {
    /// `staging` and `default` run with production settings
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "staging" | "default" => Ok(Environment::Production),
            "testing" => Ok(Environment::Testing),
            "development" => Ok(Environment::Development),
            other => Err(TombstoneError::UnknownEnvironment(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Production => "production",
        }
    }

    /// Variable holding the database URL for this environment
    pub fn database_url_var(&self) -> &'static str {
        match self {
            Environment::Testing => "DATABASE_TEST_URL",
            _ => "DATABASE_URL",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TombstoneConfig {
    pub environment: Environment,
    pub database_url: Option<String>,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for TombstoneConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            database_url: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TombstoneConfig {
    /// Create config from the environment (and `.env`, if any)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("TOMBSTONE_ENV") {
            Some(name) if !name.trim().is_empty() => Environment::parse(&name)?,
            _ => Environment::default(),
        };

        let database_url = lookup(environment.database_url_var()).filter(|url| !url.is_empty());
        let log_filter = lookup("TOMBSTONE_LOG")
            .filter(|filter| !filter.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            environment,
            database_url,
            log_filter,
        })
    }

    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url.as_deref().ok_or_else(|| {
            TombstoneError::Config(format!(
                "{} must be set for the {} environment",
                self.environment.database_url_var(),
                self.environment
            ))
        })
    }
}
