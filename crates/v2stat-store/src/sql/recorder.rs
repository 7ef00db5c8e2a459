//! Atomic recording of one poll cycle.

use sqlx::{AnyConnection, Connection};
use tracing::debug;
use v2stat_core::{RawCounter, StatKey, parse_stat_key};

use super::backend::StatsStore;
use super::queries::Queries;
use super::registry::{self, ConnId};
use crate::StoreError;

/// Why a single counter was left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowIssue {
    /// The key is not a traffic counter key.
    #[error("unrecognized stat key")]
    UnrecognizedKey,

    /// Traffic counters never go below zero.
    #[error("negative counter value {0}")]
    NegativeValue(i64),

    /// The connection could not be resolved or created.
    #[error("failed to resolve connection: {0}")]
    ResolveConn(String),

    /// The sample row could not be inserted.
    #[error("failed to insert sample: {0}")]
    InsertSample(String),
}

impl RowIssue {
    /// Whether the issue came from the database rather than the input.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::ResolveConn(_) | Self::InsertSample(_))
    }
}

/// A counter that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    pub key: String,
    pub issue: RowIssue,
}

/// Outcome of one committed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordReport {
    /// Number of samples written.
    pub accepted: usize,
    /// Counters that were skipped, in input order.
    pub diagnostics: Vec<RowDiagnostic>,
}

impl RecordReport {
    fn skip(&mut self, counter: &RawCounter, issue: RowIssue) {
        self.diagnostics.push(RowDiagnostic {
            key: counter.name.clone(),
            issue,
        });
    }
}

impl StatsStore {
    /// Record one poll cycle.
    ///
    /// Every recognised counter becomes one sample stamped `now` (unix
    /// seconds). The whole batch is a single transaction: readers see all of
    /// it or none of it. Inside the batch each counter runs in its own
    /// savepoint, so a counter that fails is rolled back alone and reported
    /// in [`RecordReport::diagnostics`] while the others are kept.
    ///
    /// Returns an error only when the transaction itself cannot be opened,
    /// maintained or committed; in that case nothing from the batch is
    /// stored.
    pub async fn record(
        &self,
        now: i64,
        counters: &[RawCounter],
    ) -> Result<RecordReport, StoreError> {
        let queries = self.queries();
        let mut report = RecordReport::default();
        let mut tx = self.pool().begin().await?;

        for counter in counters {
            let Some(key) = parse_stat_key(&counter.name) else {
                report.skip(counter, RowIssue::UnrecognizedKey);
                continue;
            };
            if counter.value < 0 {
                report.skip(counter, RowIssue::NegativeValue(counter.value));
                continue;
            }

            let mut savepoint = Connection::begin(&mut *tx).await?;
            match insert_sample(&mut savepoint, queries, now, counter.value, &key).await {
                Ok(conn_id) => {
                    savepoint.commit().await?;
                    report.accepted += 1;
                    debug!(
                        conn_id,
                        conn = %key.conn,
                        timestamp = now,
                        traffic = counter.value,
                        direction = %key.direction,
                        "inserted sample"
                    );
                }
                Err(issue) => {
                    savepoint.rollback().await?;
                    report.skip(counter, issue);
                }
            }
        }

        tx.commit().await?;
        Ok(report)
    }
}

async fn insert_sample(
    conn: &mut AnyConnection,
    queries: &Queries,
    now: i64,
    traffic: i64,
    key: &StatKey,
) -> Result<ConnId, RowIssue> {
    let conn_id = registry::ensure(conn, queries, &key.conn)
        .await
        .map_err(|e| RowIssue::ResolveConn(e.to_string()))?;

    sqlx::query(queries.insert_stat)
        .bind(conn_id)
        .bind(now)
        .bind(traffic)
        .bind(key.direction.code())
        .execute(&mut *conn)
        .await
        .map_err(|e| RowIssue::InsertSample(e.to_string()))?;

    Ok(conn_id)
}
