//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Polling Defaults
// ============================================================================

/// Default interval between two polls of the stats API, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;
/// Default V2Ray API server address.
pub const DEFAULT_API_SERVER: &str = "127.0.0.1:8080";
/// Default program used to query the stats API.
pub const DEFAULT_SOURCE_PROGRAM: &str = "v2ray";
/// Default timeout for one stats query, in seconds.
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Aggregation Defaults
// ============================================================================

/// Offset added to sample timestamps before bucketing them into hours.
///
/// Hour labels are rendered in this fixed offset (UTC+8), not in the
/// timezone the sample was taken in.
pub const DEFAULT_BUCKET_UTC_OFFSET_SECS: i64 = 8 * 60 * 60;

// ============================================================================
// Database Defaults
// ============================================================================

/// Candidate SQLite database files, tried in order when no URL is given.
pub const DEFAULT_DB_PATHS: &[&str] = &[
    "v2stat.db",
    "traffic.db",
    "/var/lib/v2stat/traffic.db",
    "/usr/local/share/v2stat/traffic.db",
    "/opt/apps/v2stat/traffic.db",
];
/// Default maximum pooled database connections.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 4;
/// Default minimum pooled database connections.
pub const DEFAULT_DB_MIN_CONNECTIONS: u32 = 1;
/// Default database acquire timeout in seconds.
pub const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default log format (`pretty` or `json`).
pub const DEFAULT_LOG_FORMAT: &str = "pretty";
