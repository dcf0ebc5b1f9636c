//! End-to-end aggregates over an on-disk RocksDB runtime directory.
//!
//! A writable RocksDB instance plays the workflow engine; the monitor opens
//! the same directory read-only through `StoreHandle`.

use std::time::Duration;

use rocksdb::DB;
use serde_json::json;
use tempfile::TempDir;

use zdb_aggregate::{AggregateCache, Aggregator};
use zdb_storage::keys::encode_family_id;
use zdb_storage::StoreHandle;
use zdb_types::{ColumnFamily, ALL_COLUMN_FAMILIES};

fn family(name: &str) -> ColumnFamily {
    ColumnFamily::by_name(name).expect("known column family")
}

fn engine_key(family: ColumnFamily, key: u64) -> Vec<u8> {
    let mut bytes = encode_family_id(family.id).to_vec();
    bytes.extend_from_slice(&key.to_be_bytes());
    bytes
}

fn incident_value(message: &str) -> Vec<u8> {
    rmp_serde::to_vec(&json!({
        "incidentRecord": {
            "errorType": "UNHANDLED_ERROR_EVENT",
            "errorMessage": message,
            "processInstanceKey": 2251799813685249u64,
            "elementId": "charge-card"
        }
    }))
    .expect("encode incident")
}

/// Engine stand-in writing Zeebe-shaped keys into the default column family.
struct Engine {
    db: DB,
}

impl Engine {
    fn open(dir: &TempDir) -> Self {
        Self {
            db: DB::open_default(dir.path()).expect("open writer"),
        }
    }

    fn put(&self, family: ColumnFamily, key: u64, value: &[u8]) {
        self.db.put(engine_key(family, key), value).expect("put");
    }

    fn flush(&self) {
        self.db.flush().expect("flush");
    }
}

#[tokio::test]
async fn test_counts_from_runtime_directory() {
    let dir = TempDir::new().unwrap();
    let engine = Engine::open(&dir);
    for key in 0..5 {
        engine.put(family("JOBS"), key, b"job");
    }
    engine.put(family("VARIABLES"), 1, b"var");
    engine.put(ColumnFamily::INCIDENTS, 1, &incident_value("Expected result of the expression to be 'BOOLEAN'"));
    engine.put(ColumnFamily::INCIDENTS, 2, &incident_value("Expected result of the expression to be 'BOOLEAN'"));
    engine.put(ColumnFamily::INCIDENTS, 3, &incident_value("No more retries left."));
    engine.put(ColumnFamily::INCIDENTS, 4, b"\xc1garbage");
    engine.flush();

    let aggregator = Aggregator::new(StoreHandle::new(dir.path()));

    let per_family = aggregator
        .try_count_entries_per_family(ALL_COLUMN_FAMILIES)
        .await
        .unwrap();
    assert_eq!(per_family.get("JOBS"), Some(5));
    assert_eq!(per_family.get("VARIABLES"), Some(1));
    assert_eq!(per_family.get("INCIDENTS"), None);
    assert_eq!(per_family.len(), 2);

    let per_message = aggregator.try_count_incidents_by_message().await.unwrap();
    assert_eq!(
        per_message.get("Expected result of the expression to be 'BOOLEAN'"),
        Some(2)
    );
    assert_eq!(per_message.get("No more retries left."), Some(1));
    assert_eq!(per_message.total(), 3);
}

#[tokio::test]
async fn test_each_aggregate_sees_latest_flush() {
    let dir = TempDir::new().unwrap();
    let engine = Engine::open(&dir);
    engine.put(family("TIMERS"), 1, b"t");
    engine.flush();

    let aggregator = Aggregator::new(StoreHandle::new(dir.path()));
    let first = aggregator.count_entries_per_family(ALL_COLUMN_FAMILIES).await;
    assert_eq!(first.get("TIMERS"), Some(1));

    engine.put(family("TIMERS"), 2, b"t");
    engine.put(family("MESSAGES"), 1, b"m");
    engine.flush();

    let second = aggregator.count_entries_per_family(ALL_COLUMN_FAMILIES).await;
    assert_eq!(second.get("TIMERS"), Some(2));
    assert_eq!(second.get("MESSAGES"), Some(1));
}

#[tokio::test]
async fn test_missing_runtime_directory_reports_nothing() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("runtime");
    let cache = AggregateCache::new(
        Aggregator::new(StoreHandle::new(&missing)),
        Duration::from_secs(300),
    );

    assert!(cache.entries_per_family().await.is_empty());
    assert!(cache.incidents_by_message().await.is_empty());
    assert!(!missing.exists(), "monitor must never create the store");
}

#[tokio::test]
async fn test_cached_value_served_until_ttl() {
    let dir = TempDir::new().unwrap();
    let engine = Engine::open(&dir);
    engine.put(ColumnFamily::INCIDENTS, 1, &incident_value("boom"));
    engine.flush();

    let cache = AggregateCache::new(
        Aggregator::new(StoreHandle::new(dir.path())),
        Duration::from_secs(300),
    );
    assert_eq!(cache.incidents_by_message().await.get("boom"), Some(1));

    engine.put(ColumnFamily::INCIDENTS, 2, &incident_value("boom"));
    engine.flush();

    // Still inside the TTL: the second incident is not visible yet
    assert_eq!(cache.incidents_by_message().await.get("boom"), Some(1));
    cache.close().await;
}
