//! Store error types.

/// Storage error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error (connection, transaction, query).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The database URL scheme is not one of the supported engines.
    #[error("unsupported database URL: {0}")]
    UnsupportedUrl(String),

    /// No database URL was given and none of the default paths exist.
    #[error("no database configured and no default database found (tried {0})")]
    NoDatabase(String),

    /// A stored row could not be decoded.
    #[error("invalid row: {0}")]
    InvalidRow(String),
}

impl StoreError {
    /// Create an invalid-row error from any displayable value.
    #[inline]
    pub fn invalid_row<E: std::fmt::Display>(err: E) -> Self {
        Self::InvalidRow(err.to_string())
    }
}
