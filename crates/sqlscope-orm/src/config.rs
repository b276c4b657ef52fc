//! Query configuration.

use serde::{Deserialize, Serialize};
use sqlscope_core::{Dialect, GenericDialect, MySqlDialect, PostgresDialect};

use crate::error::ConfigError;

/// The SQL dialect to render for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// Standard SQL.
    #[default]
    Generic,
    /// PostgreSQL.
    Postgres,
    /// MySQL.
    MySql,
}

impl DialectKind {
    /// Returns the dialect implementation.
    #[must_use]
    pub fn dialect(self) -> Box<dyn Dialect> {
        match self {
            Self::Generic => Box::new(GenericDialect),
            Self::Postgres => Box::new(PostgresDialect),
            Self::MySql => Box::new(MySqlDialect),
        }
    }
}

/// Settings shared by every statement a session compiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// The dialect to render for.
    pub dialect: DialectKind,
    /// Whether statements carry an interpolated log rendering and are
    /// handed to the logger.
    pub log_statements: bool,
    /// Whether criteria-based UPDATE and DELETE may omit the where clause.
    pub allow_missing_where: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::Generic,
            log_statements: true,
            allow_missing_where: false,
        }
    }
}

impl QueryConfig {
    /// Parses a configuration from JSON. Missing fields take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown
    /// dialect names.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
