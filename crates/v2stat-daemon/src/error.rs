//! Daemon error types.

use std::time::Duration;

use v2stat_store::StoreError;

use crate::config::ConfigError;

/// Failure to read counters from the stats API.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Status {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("invalid stats output: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid counter value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("stats query timed out after {0:?}")]
    Timeout(Duration),
}

/// Daemon error type.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("source: {0}")]
    Source(#[from] SourceError),
}
