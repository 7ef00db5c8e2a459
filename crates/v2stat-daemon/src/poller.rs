//! Periodic polling of the stats API into the store.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use v2stat_store::{RecordReport, StatsStore};

use crate::error::DaemonError;
use crate::source::CounterSource;

/// Reads counters from a source and records them, once per interval.
pub struct Poller<S> {
    source: S,
    store: StatsStore,
    interval: Duration,
    reset: bool,
}

impl<S: CounterSource> Poller<S> {
    /// Create a poller that reads with reset.
    pub fn new(source: S, store: StatsStore, interval: Duration) -> Self {
        Self {
            source,
            store,
            interval,
            reset: true,
        }
    }

    /// Whether each read zeroes the upstream counters.
    pub fn reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    pub fn store(&self) -> &StatsStore {
        &self.store
    }

    /// Run one fetch-and-record cycle.
    pub async fn poll_once(&self) -> Result<RecordReport, DaemonError> {
        let counters = self.source.query_stats(self.reset).await?;
        let report = self.store.record(unix_now(), &counters).await?;
        log_report(&report, counters.len());
        Ok(report)
    }

    /// Poll immediately, then on every tick, until `shutdown` is cancelled.
    ///
    /// A failed cycle is logged and the loop carries on; missed ticks are
    /// skipped rather than replayed.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(interval_secs = self.interval.as_secs(), "poller started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    debug!("poller shutting down");
                    return;
                }

                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once().await {
                        error!(error = %e, "poll cycle failed");
                    }
                }
            }
        }
    }
}

fn log_report(report: &RecordReport, fetched: usize) {
    for diag in &report.diagnostics {
        if diag.issue.is_storage() {
            error!(key = %diag.key, issue = %diag.issue, "counter not recorded");
        } else {
            warn!(key = %diag.key, issue = %diag.issue, "counter skipped");
        }
    }
    info!(
        fetched,
        accepted = report.accepted,
        skipped = report.diagnostics.len(),
        "recorded traffic samples"
    );
}

fn unix_now() -> i64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    i64::try_from(secs).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use v2stat_core::{ConnInfo, RawCounter};
    use v2stat_store::{RowIssue, StoreConfig};

    use super::*;
    use crate::error::SourceError;

    /// Hands out queued batches; an empty queue yields an empty batch.
    #[derive(Default)]
    struct StubSource {
        batches: Mutex<VecDeque<Result<Vec<RawCounter>, SourceError>>>,
        resets: Mutex<Vec<bool>>,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn with(batches: Vec<Result<Vec<RawCounter>, SourceError>>) -> Self {
            Self {
                batches: Mutex::new(batches.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl CounterSource for StubSource {
        async fn query_stats(&self, reset: bool) -> Result<Vec<RawCounter>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.resets.lock().unwrap().push(reset);
            self.batches
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    async fn memory_store() -> StatsStore {
        let config = StoreConfig::new("sqlite::memory:")
            .max_connections(1)
            .bucket_offset_secs(0);
        let store = StatsStore::connect(config).await.unwrap();
        store.init_schema().await.unwrap();
        store
    }

    fn total_downlink(buckets: &[v2stat_store::HourlyBucket]) -> i64 {
        buckets.iter().map(|b| b.downlink).sum()
    }

    #[tokio::test]
    async fn poll_once_records_batch() {
        let source = StubSource::with(vec![Ok(vec![
            RawCounter::new("user>>>alice>>>traffic>>>downlink", 300),
            RawCounter::new("user>>>alice>>>traffic>>>uplink", 20),
            RawCounter::new("bogus", 1),
        ])]);
        let poller = Poller::new(source, memory_store().await, Duration::from_secs(60));

        let report = poller.poll_once().await.unwrap();
        assert_eq!(report.accepted, 2);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].issue, RowIssue::UnrecognizedKey);

        let buckets = poller
            .store()
            .hourly_stats(&ConnInfo::user("alice"))
            .await
            .unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].downlink, 300);
        assert_eq!(buckets[0].uplink, 20);
        assert_eq!(*poller.source.resets.lock().unwrap(), [true]);
    }

    #[tokio::test]
    async fn poll_once_without_reset() {
        let poller =
            Poller::new(StubSource::default(), memory_store().await, Duration::from_secs(60))
                .reset(false);
        let report = poller.poll_once().await.unwrap();
        assert_eq!(report, RecordReport::default());
        assert_eq!(*poller.source.resets.lock().unwrap(), [false]);
    }

    #[tokio::test]
    async fn source_failure_writes_nothing() {
        let source = StubSource::with(vec![Err(SourceError::Timeout(Duration::from_secs(1)))]);
        let poller = Poller::new(source, memory_store().await, Duration::from_secs(60));

        let err = poller.poll_once().await.unwrap_err();
        assert!(matches!(err, DaemonError::Source(SourceError::Timeout(_))));
        assert!(poller.store().list_conns().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_polls_immediately_and_stops_on_cancel() {
        let source = StubSource::with(vec![Ok(vec![RawCounter::new(
            "outbound>>>direct>>>traffic>>>downlink",
            4096,
        )])]);
        let poller = std::sync::Arc::new(Poller::new(
            source,
            memory_store().await,
            Duration::from_secs(3600),
        ));
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn({
            let poller = poller.clone();
            let shutdown = shutdown.clone();
            async move { poller.run(shutdown).await }
        });

        tokio::time::timeout(Duration::from_secs(5), async {
            while poller.source.calls.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("first poll did not happen");

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("poller did not stop")
            .unwrap();

        assert_eq!(poller.source.calls.load(Ordering::SeqCst), 1);
        let buckets = poller
            .store()
            .hourly_stats(&ConnInfo::outbound("direct"))
            .await
            .unwrap();
        assert_eq!(total_downlink(&buckets), 4096);
    }

    #[tokio::test]
    async fn run_survives_failed_cycle() {
        let source = StubSource::with(vec![
            Err(SourceError::Timeout(Duration::from_secs(1))),
            Ok(vec![RawCounter::new("user>>>bob>>>traffic>>>downlink", 7)]),
        ]);
        let poller = std::sync::Arc::new(Poller::new(
            source,
            memory_store().await,
            Duration::from_millis(20),
        ));
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn({
            let poller = poller.clone();
            let shutdown = shutdown.clone();
            async move { poller.run(shutdown).await }
        });

        tokio::time::timeout(Duration::from_secs(5), async {
            while poller.source.calls.load(Ordering::SeqCst) < 3 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("poller stalled after a failed cycle");

        shutdown.cancel();
        handle.await.unwrap();

        let buckets = poller
            .store()
            .hourly_stats(&ConnInfo::user("bob"))
            .await
            .unwrap();
        assert_eq!(total_downlink(&buckets), 7);
    }
}
