//! # v2stat-rs
//!
//! Records V2Ray traffic counters as a time series and reports them as
//! hourly totals per user, inbound or outbound.
//!
//! ## Crates
//!
//! - [`v2stat_core`] - Connection identities, counter key parsing, defaults
//! - [`v2stat_store`] - SQL storage, hourly aggregation and reporting CLI
//! - [`v2stat_daemon`] - Counter sources, configuration and the poll loop

pub use v2stat_core as core;
pub use v2stat_daemon as daemon;
pub use v2stat_store as store;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use v2stat_core::{ConnInfo, ConnType, Direction, RawCounter, parse_stat_key};
    pub use v2stat_daemon::{CommandSource, CounterSource, DaemonConfig, Poller};
    pub use v2stat_store::{HourlyBucket, RecordReport, StatsStore, StoreConfig};
}
