//! Core types and constants shared across v2stat crates.
//!
//! This crate provides:
//! - Connection identities (`type:name`) and traffic directions
//! - Parsing of V2Ray stats counter keys
//! - Default configuration values

pub mod conn;
pub mod defaults;
pub mod error;
pub mod key;

pub use conn::{ConnInfo, ConnType, Direction};
pub use defaults::*;
pub use error::ParseConnInfoError;
pub use key::{RawCounter, StatKey, parse_stat_key};

/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
