//! Journal configuration loaded from environment variables.
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file via `dotenvy`. Command-line flags take precedence over
//! everything here.

use crate::domain::status::OverduePolicy;
use crate::error::Result;
use std::path::PathBuf;

/// Default location of the JSON journal file.
pub const DEFAULT_DATA_FILE: &str = "journal.json";

#[derive(Debug, Clone, PartialEq)]
pub struct JournalConfig {
    /// JSON document used when no RocksDB path is configured.
    pub data_file: PathBuf,

    /// RocksDB directory. Requires the `storage-rocksdb` feature.
    pub db_path: Option<PathBuf>,

    /// Overdue comparison used by the status engine.
    pub overdue_policy: OverduePolicy,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            db_path: None,
            overdue_policy: OverduePolicy::default(),
        }
    }
}

impl JournalConfig {
    /// Loads configuration from the environment, reading `.env` if present.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `JOURNAL_OVERDUE_POLICY` is set to an
    /// unknown value.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_file = non_empty("JOURNAL_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);
        let db_path = non_empty("JOURNAL_DB_PATH").map(PathBuf::from);
        let overdue_policy = match non_empty("JOURNAL_OVERDUE_POLICY") {
            Some(value) => value.parse()?,
            None => defaults.overdue_policy,
        };

        Ok(Self {
            data_file,
            db_path,
            overdue_policy,
        })
    }
}
