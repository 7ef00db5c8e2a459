//! SQL storage for V2Ray traffic statistics.
//!
//! This crate records polled traffic counters as a time series keyed by
//! connection identity and reports them back as hourly totals. SQLite,
//! PostgreSQL and MySQL are supported through SQLx.
//!
//! # Example
//!
//! ```ignore
//! use v2stat_core::{ConnInfo, RawCounter};
//! use v2stat_store::{StatsStore, StoreConfig};
//!
//! let store = StatsStore::connect(StoreConfig::new("sqlite://traffic.db?mode=rwc")).await?;
//! store.init_schema().await?;
//!
//! let report = store
//!     .record(now, &[RawCounter::new("user>>>alice>>>traffic>>>downlink", 1024)])
//!     .await?;
//! assert_eq!(report.accepted, 1);
//!
//! for bucket in store.hourly_stats(&ConnInfo::user("alice")).await? {
//!     println!("{} {} {}", bucket.time, bucket.downlink, bucket.uplink);
//! }
//! ```

pub mod cli;
mod error;
mod sql;

pub use cli::StoreArgs;
pub use error::StoreError;
pub use sql::{
    ConnId, DatabaseType, HourlyBucket, RecordReport, RowDiagnostic, RowIssue, StatsStore,
    StoreConfig, resolve_database_url,
};
