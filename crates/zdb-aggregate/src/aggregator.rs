//! Column-family aggregates over a read-only store.
//!
//! Every aggregate refreshes the store first so that each scrape observes
//! the writer's latest flushed state. The store sits behind an async mutex:
//! refresh and all scans of one aggregate run under a single lock, so two
//! aggregates never interleave against the same handle.

use tokio::sync::Mutex;
use tracing::{debug, error};

use zdb_storage::keys::range_for_family;
use zdb_storage::store::OnRecord;
use zdb_storage::{RangeStore, StorageError};
use zdb_types::{AggregateCount, ColumnFamily};

use crate::decoder::extract_message;

/// Path of the error message inside an incident value.
pub const INCIDENT_MESSAGE_PATH: &[&str] = &["incidentRecord", "errorMessage"];

/// Domain wrapper around a `RangeStore`.
pub struct Aggregator {
    store: Mutex<Box<dyn RangeStore>>,
    message_path: Vec<String>,
}

impl Aggregator {
    pub fn new(store: impl RangeStore + 'static) -> Self {
        Self {
            store: Mutex::new(Box::new(store)),
            message_path: INCIDENT_MESSAGE_PATH.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Override the field path read from incident values.
    pub fn with_message_path(mut self, path: &[&str]) -> Self {
        self.message_path = path.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Count records per family, omitting empty families and `INCIDENTS`.
    ///
    /// Families are scanned one after another. Any failure aborts the whole
    /// aggregate.
    pub async fn try_count_entries_per_family(
        &self,
        families: &[ColumnFamily],
    ) -> Result<AggregateCount, StorageError> {
        let mut store = self.store.lock().await;
        store.refresh()?;

        let mut counts = AggregateCount::new();
        for family in families {
            if *family == ColumnFamily::INCIDENTS {
                continue;
            }
            let mut entries = 0u64;
            walk_column_family(&**store, *family, &mut |_, _| entries += 1)?;
            counts.add(family.name, entries);
        }

        debug!(families = counts.len(), total = counts.total(), "Counted column family entries");
        Ok(counts)
    }

    /// Count incidents grouped by their error message.
    ///
    /// Records whose message cannot be decoded or is absent are skipped.
    pub async fn try_count_incidents_by_message(&self) -> Result<AggregateCount, StorageError> {
        let path: Vec<&str> = self.message_path.iter().map(String::as_str).collect();

        let mut store = self.store.lock().await;
        store.refresh()?;

        let mut counts = AggregateCount::new();
        let mut skipped = 0u64;
        walk_column_family(&**store, ColumnFamily::INCIDENTS, &mut |_, value| {
            match extract_message(value, &path) {
                Some(message) => counts.increment(&message),
                None => skipped += 1,
            }
        })?;

        if skipped > 0 {
            debug!(skipped, "Skipped incidents without an error message");
        }
        Ok(counts)
    }

    /// All-or-nothing variant of `try_count_entries_per_family`: failures are
    /// logged and produce an empty result.
    pub async fn count_entries_per_family(&self, families: &[ColumnFamily]) -> AggregateCount {
        match self.try_count_entries_per_family(families).await {
            Ok(counts) => counts,
            Err(e) => {
                error!(error = %e, "Failed to count column family entries");
                AggregateCount::new()
            }
        }
    }

    /// All-or-nothing variant of `try_count_incidents_by_message`.
    pub async fn count_incidents_by_message(&self) -> AggregateCount {
        match self.try_count_incidents_by_message().await {
            Ok(counts) => counts,
            Err(e) => {
                error!(error = %e, "Failed to count incidents by message");
                AggregateCount::new()
            }
        }
    }

    /// Close the underlying handle. The next aggregate reopens it.
    pub async fn close(&self) {
        self.store.lock().await.close();
    }
}

/// Scan every record of `family` in key order.
pub fn walk_column_family(
    store: &dyn RangeStore,
    family: ColumnFamily,
    on_record: &mut OnRecord<'_>,
) -> Result<(), StorageError> {
    let range = range_for_family(family);
    store.scan_range(&range.lower, &range.upper, on_record)
}
