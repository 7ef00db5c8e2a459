//! Counter sources.
//!
//! A [`CounterSource`] returns the raw `(name, value)` pairs exposed by the
//! proxy's stats API. [`CommandSource`] shells out to the proxy's own API
//! client (`v2ray api stats -json`) and decodes its JSON output:
//!
//! ```json
//! {"stat": [{"name": "user>>>alice>>>traffic>>>downlink", "value": "1024"}]}
//! ```
//!
//! `value` may be a number or a decimal string, and is omitted when zero.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;
use v2stat_core::RawCounter;
use v2stat_core::defaults::DEFAULT_SOURCE_TIMEOUT_SECS;

use crate::config::SourceConfig;
use crate::error::SourceError;

/// Placeholder in the client arguments replaced by the API server address.
pub const SERVER_PLACEHOLDER: &str = "{server}";

/// Something that can read the current traffic counters.
#[async_trait]
pub trait CounterSource: Send + Sync {
    /// Fetch all counters. With `reset`, the upstream counters are zeroed
    /// as part of the read, so the returned values are deltas.
    async fn query_stats(&self, reset: bool) -> Result<Vec<RawCounter>, SourceError>;
}

/// Reads counters by running an external stats client.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
    reset_flag: Option<String>,
    timeout: Duration,
}

impl CommandSource {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            reset_flag: None,
            timeout: Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
        }
    }

    /// Build a source from configuration, substituting the server address.
    pub fn from_config(config: &SourceConfig) -> Self {
        let args = config
            .args
            .iter()
            .map(|arg| arg.replace(SERVER_PLACEHOLDER, &config.server))
            .collect();
        Self::new(config.program.clone())
            .args(args)
            .reset_flag(config.reset_flag.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Argument appended when a reset-read is requested.
    pub fn reset_flag(mut self, flag: Option<String>) -> Self {
        self.reset_flag = flag;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, reset: bool) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if reset && let Some(flag) = &self.reset_flag {
            cmd.arg(flag);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CounterSource for CommandSource {
    async fn query_stats(&self, reset: bool) -> Result<Vec<RawCounter>, SourceError> {
        debug!(program = %self.program, reset, "querying stats");

        let output = tokio::time::timeout(self.timeout, self.command(reset).output())
            .await
            .map_err(|_| SourceError::Timeout(self.timeout))?
            .map_err(|source| SourceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::Status {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        decode_stats(&output.stdout)
    }
}

#[derive(Deserialize)]
struct StatsResponse {
    #[serde(default)]
    stat: Option<Vec<StatEntry>>,
}

#[derive(Deserialize)]
struct StatEntry {
    name: String,
    #[serde(default)]
    value: Option<StatValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatValue {
    Number(i64),
    Text(String),
}

/// Decode the JSON printed by `v2ray api stats -json`.
pub fn decode_stats(bytes: &[u8]) -> Result<Vec<RawCounter>, SourceError> {
    let response: StatsResponse = serde_json::from_slice(bytes)?;

    response
        .stat
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            let value = match entry.value {
                None => 0,
                Some(StatValue::Number(n)) => n,
                Some(StatValue::Text(text)) => {
                    text.trim().parse().map_err(|_| SourceError::InvalidValue {
                        name: entry.name.clone(),
                        value: text.clone(),
                    })?
                }
            };
            Ok(RawCounter::new(entry.name, value))
        })
        .collect()
}
