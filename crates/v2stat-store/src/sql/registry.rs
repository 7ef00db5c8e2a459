//! Connection identity registry.

use sqlx::AnyConnection;
use v2stat_core::ConnInfo;

use super::backend::StatsStore;
use super::queries::Queries;
use crate::StoreError;

/// Internal identifier of a stored connection (`conn.id`).
pub type ConnId = i64;

/// Resolve a connection to its id, inserting it on first sight.
///
/// Insert-if-absent followed by a lookup, so it works on engines without
/// `RETURNING` and is safe to repeat inside one transaction.
pub(crate) async fn ensure(
    conn: &mut AnyConnection,
    queries: &Queries,
    info: &ConnInfo,
) -> Result<ConnId, sqlx::Error> {
    sqlx::query(queries.insert_conn)
        .bind(info.conn_type.code())
        .bind(info.name.as_str())
        .execute(&mut *conn)
        .await?;

    sqlx::query_scalar::<_, i64>(queries.select_conn_id)
        .bind(info.conn_type.code())
        .bind(info.name.as_str())
        .fetch_one(&mut *conn)
        .await
}

impl StatsStore {
    /// Get the id of a connection, creating the connection if needed.
    ///
    /// Calling this repeatedly with the same identity returns the same id
    /// and never creates a second row.
    pub async fn ensure_conn(&self, info: &ConnInfo) -> Result<ConnId, StoreError> {
        let mut conn = self.pool().acquire().await?;
        Ok(ensure(&mut conn, self.queries(), info).await?)
    }
}
