//! SQL traffic store.
//!
//! # Features
//!
//! SQLite is enabled by default. Enable other engines in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! v2stat-store = { version = "0.1", features = ["postgres"] }
//! # or
//! v2stat-store = { version = "0.1", features = ["mysql"] }
//! ```
//!
//! # Database Schema
//!
//! [`StatsStore::init_schema`] creates (SQLite dialect shown):
//!
//! ```sql
//! CREATE TABLE conn (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     type INTEGER NOT NULL,        -- 0 = user, 1 = inbound, 2 = outbound
//!     name TEXT NOT NULL,
//!     UNIQUE (type, name)
//! );
//!
//! CREATE TABLE stats (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     conn_id INTEGER NOT NULL,
//!     timestamp INTEGER NOT NULL,   -- unix seconds
//!     traffic INTEGER NOT NULL,     -- bytes since the previous poll
//!     direction INTEGER NOT NULL,   -- 0 = downlink, 1 = uplink
//!     FOREIGN KEY (conn_id) REFERENCES conn (id)
//!         ON DELETE CASCADE ON UPDATE CASCADE
//! );
//!
//! CREATE INDEX idx_conn_id ON stats (conn_id);
//! CREATE INDEX idx_timestamp ON stats (timestamp);
//! ```

mod backend;
mod config;
mod queries;
mod recorder;
mod registry;
mod report;


pub use backend::{DatabaseType, StatsStore};
pub use config::{StoreConfig, resolve_database_url};
pub use recorder::{RecordReport, RowDiagnostic, RowIssue};
pub use registry::ConnId;
pub use report::HourlyBucket;
