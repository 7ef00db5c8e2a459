//! V2Ray stats counter keys.
//!
//! The stats service names traffic counters
//! `{scope}>>>{name}>>>traffic>>>{direction}`, for example
//! `user>>>alice@example.com>>>traffic>>>downlink`. Other counters share
//! the same namespace (e.g. `inbound>>>api>>>online`), so a key that does
//! not decode is an expected outcome, not an error.

use serde::{Deserialize, Serialize};

use crate::conn::{ConnInfo, ConnType, Direction};

/// Field separator used in counter keys.
pub const KEY_DELIMITER: &str = ">>>";

/// Literal expected in the third field of a traffic counter key.
const TRAFFIC_FIELD: &str = "traffic";

/// A named counter as returned by one stats query.
///
/// `value` is the delta accumulated since the previous reset-read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCounter {
    pub name: String,
    pub value: i64,
}

impl RawCounter {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A decoded traffic counter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatKey {
    pub conn: ConnInfo,
    pub direction: Direction,
}

/// Decode a counter key. Returns `None` for anything that is not a
/// well-formed traffic counter.
pub fn parse_stat_key(key: &str) -> Option<StatKey> {
    let mut fields = key.split(KEY_DELIMITER);
    let (Some(scope), Some(name), Some(kind), Some(direction), None) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        return None;
    };

    if kind != TRAFFIC_FIELD {
        return None;
    }

    Some(StatKey {
        conn: ConnInfo::new(ConnType::from_tag(scope)?, name),
        direction: Direction::from_tag(direction)?,
    })
}
