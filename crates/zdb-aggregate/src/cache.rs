//! Time-bounded memoization of aggregates.
//!
//! A full-family scan reopens the store and walks every record, so scrapes
//! are served from a cached value until it is older than the TTL.
//!
//! ## Coalescing
//!
//! The cached slot is guarded by an async mutex that stays locked while a
//! value is being computed. Callers arriving during a computation wait on
//! the lock and then find a fresh value, so overlapping scrapes trigger a
//! single scan.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use zdb_types::{AggregateCount, ColumnFamily, ALL_COLUMN_FAMILIES};

use crate::aggregator::Aggregator;

/// Default time-to-live of a cached aggregate.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Receives the wall-clock duration of every underlying aggregate computation.
pub type ScanObserver = Arc<dyn Fn(Duration) + Send + Sync>;

struct CacheEntry<T> {
    value: T,
    created: Instant,
}

/// A single memoized value with a fixed TTL.
pub struct Memoized<T> {
    ttl: Duration,
    slot: Mutex<Option<CacheEntry<T>>>,
}

impl<T: Clone> Memoized<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached value if younger than the TTL, otherwise run
    /// `compute`, store its output and return it.
    pub async fn get_with<F, Fut>(&self, compute: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(entry) = slot.as_ref() {
            if entry.created.elapsed() < self.ttl {
                return entry.value.clone();
            }
        }

        let value = compute().await;
        *slot = Some(CacheEntry {
            value: value.clone(),
            created: Instant::now(),
        });
        value
    }

    /// True if a value is cached and younger than the TTL.
    pub async fn is_fresh(&self) -> bool {
        self.slot
            .lock()
            .await
            .as_ref()
            .is_some_and(|entry| entry.created.elapsed() < self.ttl)
    }

    /// Drop the cached value; the next `get_with` recomputes.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

/// Process-wide cache of both aggregates, owned by the metrics layer.
pub struct AggregateCache {
    aggregator: Aggregator,
    families: Vec<ColumnFamily>,
    family_counts: Memoized<AggregateCount>,
    incident_counts: Memoized<AggregateCount>,
    observer: Option<ScanObserver>,
}

impl AggregateCache {
    /// Cache both aggregates of `aggregator` over every known column family.
    pub fn new(aggregator: Aggregator, ttl: Duration) -> Self {
        Self {
            aggregator,
            families: ALL_COLUMN_FAMILIES.to_vec(),
            family_counts: Memoized::new(ttl),
            incident_counts: Memoized::new(ttl),
            observer: None,
        }
    }

    /// Restrict the per-family aggregate to `families`.
    pub fn with_families(mut self, families: Vec<ColumnFamily>) -> Self {
        self.families = families;
        self
    }

    pub fn with_scan_observer(mut self, observer: ScanObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Entry count per column family (`INCIDENTS` excluded).
    pub async fn entries_per_family(&self) -> AggregateCount {
        self.family_counts
            .get_with(|| {
                self.observed(
                    "entries_per_family",
                    self.aggregator.count_entries_per_family(&self.families),
                )
            })
            .await
    }

    /// Incident count per error message.
    pub async fn incidents_by_message(&self) -> AggregateCount {
        self.incident_counts
            .get_with(|| {
                self.observed(
                    "incidents_by_message",
                    self.aggregator.count_incidents_by_message(),
                )
            })
            .await
    }

    /// Close the store handle held by the aggregator.
    pub async fn close(&self) {
        self.aggregator.close().await;
    }

    async fn observed<F>(&self, aggregate: &'static str, computation: F) -> AggregateCount
    where
        F: Future<Output = AggregateCount>,
    {
        let started = std::time::Instant::now();
        let counts = computation.await;
        let elapsed = started.elapsed();
        debug!(aggregate, labels = counts.len(), ?elapsed, "Recomputed aggregate");
        if let Some(observer) = &self.observer {
            observer(elapsed);
        }
        counts
    }
}
