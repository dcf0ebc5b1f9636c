//! Sorted in-memory `RangeStore`.
//!
//! Used by tests throughout the workspace in place of an on-disk runtime
//! directory. Supports fault injection for the open and scan paths and
//! counts how often the handle was (re)opened.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::StorageError;
use crate::store::{OnRecord, RangeStore};

/// In-memory store backed by a `BTreeMap`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: BTreeMap<Vec<u8>, Vec<u8>>,
    open: bool,
    unavailable: bool,
    fail_after: Option<usize>,
    opens: Arc<AtomicUsize>,
    scans: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.records.insert(key.into(), value.into());
    }

    /// Make every subsequent `refresh` fail with `StoreUnavailable`.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Make each scan fail after `n` records have been delivered.
    pub fn fail_scans_after(&mut self, n: usize) {
        self.fail_after = Some(n);
    }

    /// Shared counter of successful opens.
    pub fn open_counter(&self) -> Arc<AtomicUsize> {
        self.opens.clone()
    }

    /// Shared counter of started scans.
    pub fn scan_counter(&self) -> Arc<AtomicUsize> {
        self.scans.clone()
    }
}

impl RangeStore for InMemoryStore {
    fn refresh(&mut self) -> Result<(), StorageError> {
        self.open = false;
        if self.unavailable {
            return Err(StorageError::StoreUnavailable {
                path: PathBuf::from(":memory:"),
                reason: "marked unavailable".to_string(),
            });
        }
        self.open = true;
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn scan_range(
        &self,
        lower: &[u8],
        upper: &[u8],
        on_record: &mut OnRecord<'_>,
    ) -> Result<(), StorageError> {
        if !self.open {
            return Err(StorageError::NotOpen);
        }
        self.scans.fetch_add(1, Ordering::SeqCst);
        if lower >= upper {
            return Ok(());
        }

        let range = self
            .records
            .range::<[u8], _>((Bound::Included(lower), Bound::Excluded(upper)));
        for (delivered, (key, value)) in range.enumerate() {
            if self.fail_after == Some(delivered) {
                return Err(StorageError::Scan(format!(
                    "injected fault after {} records",
                    delivered
                )));
            }
            on_record(key, value);
        }

        Ok(())
    }
}
