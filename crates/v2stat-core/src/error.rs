//! Core error types.

/// Error returned when a `type:name` connection string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseConnInfoError {
    /// The string is not of the form `type:name`.
    #[error("expected `type:name`, got {0:?}")]
    Format(String),

    /// The type prefix is not `user`, `inbound` or `outbound`.
    #[error("unknown connection type {0:?}")]
    UnknownType(String),
}
