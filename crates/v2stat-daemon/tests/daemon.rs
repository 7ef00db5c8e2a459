//! End-to-end: the daemon runs a stats client and fills a SQLite file.

#![cfg(unix)]

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use v2stat_core::ConnInfo;
use v2stat_daemon::{DaemonConfig, DaemonError, run_daemon};
use v2stat_store::{StatsStore, StoreConfig};

const STATS_JSON: &str = r#"{"stat":[{"name":"user>>>alice>>>traffic>>>downlink","value":"2048"},{"name":"user>>>alice>>>traffic>>>uplink","value":"128"},{"name":"inbound>>>vmess>>>traffic>>>downlink"}]}"#;

fn test_config(db_path: &std::path::Path) -> DaemonConfig {
    let mut config = DaemonConfig::default();
    config.source.program = "sh".into();
    config.source.args = vec!["-c".into(), format!("printf '%s' '{STATS_JSON}'")];
    config.source.reset_flag = None;
    config.source.timeout_secs = 5;
    config.database.url = Some(db_path.display().to_string());
    config.database.bucket_offset_secs = 0;
    config.daemon.interval_secs = 3600;
    config
}

#[tokio::test]
async fn daemon_records_first_poll_and_stops() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("traffic.db");
    let shutdown = CancellationToken::new();

    let handle = tokio::spawn(run_daemon(test_config(&db_path), shutdown.clone()));

    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let reader = StatsStore::connect(StoreConfig::new(url).bucket_offset_secs(0))
        .await
        .unwrap();

    let alice = ConnInfo::user("alice");
    let buckets = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            if let Ok(buckets) = reader.hourly_stats(&alice).await
                && !buckets.is_empty()
            {
                return buckets;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("daemon never recorded a sample");

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("daemon did not stop")
        .unwrap()
        .unwrap();

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].downlink, 2048);
    assert_eq!(buckets[0].uplink, 128);

    let conns = reader.list_conns().await.unwrap();
    assert_eq!(conns, vec![ConnInfo::user("alice"), ConnInfo::inbound("vmess")]);
    reader.close().await;
}

#[tokio::test]
async fn daemon_fails_when_database_cannot_open() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir.path().join("missing").join("traffic.db"));

    let err = run_daemon(config, CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, DaemonError::Store(_)));
}
