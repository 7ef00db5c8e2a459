//! Connection identities and traffic directions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseConnInfoError;

/// Kind of logical connection a counter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnType {
    User,
    Inbound,
    Outbound,
}

impl ConnType {
    /// All connection types, in storage-code order.
    pub const ALL: [ConnType; 3] = [ConnType::User, ConnType::Inbound, ConnType::Outbound];

    /// Tag used in counter keys and in `type:name` strings.
    pub fn as_str(self) -> &'static str {
        match self {
            ConnType::User => "user",
            ConnType::Inbound => "inbound",
            ConnType::Outbound => "outbound",
        }
    }

    /// Map a tag back to a type. Unknown tags are rejected, never defaulted.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "user" => Some(ConnType::User),
            "inbound" => Some(ConnType::Inbound),
            "outbound" => Some(ConnType::Outbound),
            _ => None,
        }
    }

    /// Integer stored in the `conn.type` column.
    pub fn code(self) -> i64 {
        match self {
            ConnType::User => 0,
            ConnType::Inbound => 1,
            ConnType::Outbound => 2,
        }
    }

    /// Inverse of [`ConnType::code`].
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ConnType::User),
            1 => Some(ConnType::Inbound),
            2 => Some(ConnType::Outbound),
            _ => None,
        }
    }
}

impl fmt::Display for ConnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traffic direction as seen from the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Downlink,
    Uplink,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Downlink => "downlink",
            Direction::Uplink => "uplink",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "downlink" => Some(Direction::Downlink),
            "uplink" => Some(Direction::Uplink),
            _ => None,
        }
    }

    /// Integer stored in the `stats.direction` column.
    pub fn code(self) -> i64 {
        match self {
            Direction::Downlink => 0,
            Direction::Uplink => 1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Direction::Downlink),
            1 => Some(Direction::Uplink),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connection identity: the `(type, name)` pair.
///
/// Formats as `type:name` (e.g. `user:alice`) and parses back from the
/// same form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnInfo {
    #[serde(rename = "type")]
    pub conn_type: ConnType,
    pub name: String,
}

impl ConnInfo {
    pub fn new(conn_type: ConnType, name: impl Into<String>) -> Self {
        Self {
            conn_type,
            name: name.into(),
        }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self::new(ConnType::User, name)
    }

    pub fn inbound(name: impl Into<String>) -> Self {
        Self::new(ConnType::Inbound, name)
    }

    pub fn outbound(name: impl Into<String>) -> Self {
        Self::new(ConnType::Outbound, name)
    }
}

impl fmt::Display for ConnInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.conn_type, self.name)
    }
}

impl FromStr for ConnInfo {
    type Err = ParseConnInfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (Some(tag), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParseConnInfoError::Format(s.to_string()));
        };
        let conn_type =
            ConnType::from_tag(tag).ok_or_else(|| ParseConnInfoError::UnknownType(tag.to_string()))?;
        Ok(Self::new(conn_type, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_inbound() {
        let info: ConnInfo = "inbound:proxy1".parse().unwrap();
        assert_eq!(info, ConnInfo::inbound("proxy1"));
        assert_eq!(info.to_string(), "inbound:proxy1");
    }

    #[test]
    fn parses_every_type() {
        for ty in ConnType::ALL {
            let text = format!("{}:alice", ty);
            let info: ConnInfo = text.parse().unwrap();
            assert_eq!(info.conn_type, ty);
            assert_eq!(info.name, "alice");
            assert_eq!(info.to_string(), text);
        }
    }

    #[test]
    fn rejects_missing_separator() {
        assert_eq!(
            "alice".parse::<ConnInfo>(),
            Err(ParseConnInfoError::Format("alice".into()))
        );
    }

    #[test]
    fn rejects_extra_separator() {
        assert!(matches!(
            "user:alice:bob".parse::<ConnInfo>(),
            Err(ParseConnInfoError::Format(_))
        ));
    }

    #[test]
    fn rejects_unknown_type() {
        assert_eq!(
            "group:alice".parse::<ConnInfo>(),
            Err(ParseConnInfoError::UnknownType("group".into()))
        );
    }

    #[test]
    fn codes_round_trip() {
        for ty in ConnType::ALL {
            assert_eq!(ConnType::from_code(ty.code()), Some(ty));
        }
        assert_eq!(ConnType::from_code(3), None);
        assert_eq!(Direction::from_code(Direction::Uplink.code()), Some(Direction::Uplink));
        assert_eq!(Direction::from_code(-1), None);
    }

    #[test]
    fn serializes_with_lowercase_tags() {
        let json = serde_json::to_string(&ConnInfo::outbound("direct")).unwrap();
        assert_eq!(json, r#"{"type":"outbound","name":"direct"}"#);
    }
}
