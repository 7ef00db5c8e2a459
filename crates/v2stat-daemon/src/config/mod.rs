//! Daemon configuration.
//!
//! Loaded from a TOML, YAML or JSON(C) file picked by extension. Every
//! section is optional; a missing file section falls back to the
//! defaults in `v2stat_core::defaults`.
//!
//! ```toml
//! [source]
//! program = "v2ray"
//! server = "127.0.0.1:8080"
//!
//! [database]
//! url = "sqlite:///var/lib/v2stat/traffic.db"
//!
//! [daemon]
//! interval_secs = 300
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```
//!
//! In YAML, SQLite URLs must be quoted: an unquoted value ending in `:`
//! (such as `sqlite::memory:`) is read as a mapping key.
//!
//! ```yaml
//! database:
//!   url: "sqlite:///var/lib/v2stat/traffic.db"
//! ```

mod cli;
mod defaults;
mod loader;
mod validate;

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use v2stat_store::{StoreConfig, StoreError, resolve_database_url};

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, ConfigFormat, load_config};
pub use validate::validate_config;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub daemon: PollConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How counters are read from the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Stats client executable.
    #[serde(default = "default_source_program")]
    pub program: String,
    /// API address substituted for `{server}` in `args`.
    #[serde(default = "default_api_server")]
    pub server: String,
    #[serde(default = "default_source_args")]
    pub args: Vec<String>,
    /// Extra argument asking the client to zero counters after reading.
    #[serde(default = "default_reset_flag")]
    pub reset_flag: Option<String>,
    #[serde(default = "default_source_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            program: default_source_program(),
            server: default_api_server(),
            args: default_source_args(),
            reset_flag: default_reset_flag(),
            timeout_secs: default_source_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL or SQLite file path. Falls back to the default search paths.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_db_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_db_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Offset applied to timestamps before grouping them into hours.
    #[serde(default = "default_bucket_offset_secs")]
    pub bucket_offset_secs: i64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_db_max_connections(),
            min_connections: default_db_min_connections(),
            connect_timeout_secs: default_db_connect_timeout_secs(),
            bucket_offset_secs: default_bucket_offset_secs(),
        }
    }
}

impl DatabaseConfig {
    /// Build the store configuration, resolving the database URL.
    pub fn store_config(&self) -> Result<StoreConfig, StoreError> {
        let url = resolve_database_url(self.url.as_deref())?;
        Ok(StoreConfig::new(url)
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .bucket_offset_secs(self.bucket_offset_secs))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between two polls.
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
    /// Read counters with reset so that every sample is a delta.
    #[serde(default = "default_true")]
    pub reset: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
            reset: true,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Log format: json, pretty, or compact. Default: pretty.
    pub format: Option<String>,
    /// Per-module log level filters (e.g., {"v2stat_store": "debug", "sqlx": "warn"}).
    #[serde(default)]
    pub filters: HashMap<String, String>,
}
