//! Polling daemon for V2Ray traffic statistics.
//!
//! Reads the proxy's traffic counters through a [`CounterSource`] on a
//! fixed interval and records each read as one atomic batch in a
//! [`v2stat_store::StatsStore`].
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use v2stat_daemon::{CommandSource, Poller};
//!
//! let source = CommandSource::new("v2ray")
//!     .args(vec!["api".into(), "stats".into(), "--server=127.0.0.1:8080".into(), "-json".into()])
//!     .reset_flag(Some("-reset".into()));
//! let poller = Poller::new(source, store, Duration::from_secs(300));
//! poller.run(CancellationToken::new()).await;
//! ```

pub mod cli;
pub mod config;
mod error;
mod poller;
mod source;

pub use cli::{DaemonArgs, run_daemon};
pub use config::DaemonConfig;
pub use error::{DaemonError, SourceError};
pub use poller::Poller;
pub use source::{CommandSource, CounterSource, SERVER_PLACEHOLDER, decode_stats};
