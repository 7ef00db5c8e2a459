//! Read side: connection catalog and hourly aggregation.

use serde::Serialize;
use sqlx::Row;
use v2stat_core::{ConnInfo, ConnType};

use super::backend::StatsStore;
use crate::StoreError;

/// Traffic totals for one hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyBucket {
    /// Start of the hour, `YYYY-MM-DD HH:00:00`, in the store's bucket offset.
    pub time: String,
    /// Bytes received by clients during the hour.
    pub downlink: i64,
    /// Bytes sent by clients during the hour.
    pub uplink: i64,
}

impl StatsStore {
    /// List every connection that has ever been recorded.
    pub async fn list_conns(&self) -> Result<Vec<ConnInfo>, StoreError> {
        let rows = sqlx::query(self.queries().select_conns)
            .fetch_all(self.pool())
            .await?;

        rows.into_iter()
            .map(|row| -> Result<ConnInfo, StoreError> {
                let code: i64 = row.try_get("type")?;
                let name: String = row.try_get("name")?;
                let conn_type = ConnType::from_code(code).ok_or_else(|| {
                    StoreError::invalid_row(format!("unknown connection type code {code}"))
                })?;
                Ok(ConnInfo::new(conn_type, name))
            })
            .collect()
    }

    /// Hourly downlink/uplink totals for one connection.
    ///
    /// Buckets come back in ascending order. Hours without samples are
    /// omitted; a direction without samples in an hour is reported as 0.
    /// An unknown connection yields an empty list.
    pub async fn hourly_stats(&self, conn: &ConnInfo) -> Result<Vec<HourlyBucket>, StoreError> {
        let rows = sqlx::query(self.queries().hourly_stats)
            .bind(self.bucket_offset_secs())
            .bind(conn.conn_type.code())
            .bind(conn.name.as_str())
            .fetch_all(self.pool())
            .await?;

        rows.into_iter()
            .map(|row| -> Result<HourlyBucket, StoreError> {
                Ok(HourlyBucket {
                    time: row.try_get("time")?,
                    downlink: row.try_get("downlink")?,
                    uplink: row.try_get("uplink")?,
                })
            })
            .collect()
    }
}
