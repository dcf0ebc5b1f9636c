//! Read-only RocksDB handle over the Zeebe runtime directory.
//!
//! Provides:
//! - Read-only open with `create_if_missing(false)`; the path is never
//!   created, repaired or written
//! - Refresh (close + reopen) to observe the writer's latest flushed state
//! - Forward range scans bounded by `[lower, upper)`

use rocksdb::{Direction, IteratorMode, LogLevel, Options, ReadOptions, DB};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StorageError;
use crate::store::{OnRecord, RangeStore};

/// Exclusively-owned read-only connection bound to one path.
pub struct StoreHandle {
    path: PathBuf,
    db: Option<DB>,
}

impl StoreHandle {
    /// Create a closed handle. Nothing touches the filesystem until `refresh`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            db: None,
        }
    }

    fn open_read_only(path: &Path) -> Result<DB, StorageError> {
        if !path.is_dir() {
            return Err(StorageError::StoreUnavailable {
                path: path.to_path_buf(),
                reason: "directory does not exist".to_string(),
            });
        }

        let mut opts = Options::default();
        opts.create_if_missing(false);
        opts.create_missing_column_families(false);
        opts.set_log_level(LogLevel::Error);

        DB::open_for_read_only(&opts, path, false).map_err(|e| StorageError::StoreUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl RangeStore for StoreHandle {
    fn refresh(&mut self) -> Result<(), StorageError> {
        self.close();
        let db = Self::open_read_only(&self.path)?;
        debug!(path = ?self.path, "Opened store read-only");
        self.db = Some(db);
        Ok(())
    }

    fn close(&mut self) {
        if self.db.take().is_some() {
            debug!(path = ?self.path, "Closed store");
        }
    }

    fn is_open(&self) -> bool {
        self.db.is_some()
    }

    fn scan_range(
        &self,
        lower: &[u8],
        upper: &[u8],
        on_record: &mut OnRecord<'_>,
    ) -> Result<(), StorageError> {
        let db = self.db.as_ref().ok_or(StorageError::NotOpen)?;

        let mut read_opts = ReadOptions::default();
        // Full scans every few minutes should not evict the writer's hot blocks
        read_opts.fill_cache(false);
        read_opts.set_iterate_upper_bound(upper.to_vec());

        let iter = db.iterator_opt(IteratorMode::From(lower, Direction::Forward), read_opts);
        for item in iter {
            let (key, value) = item.map_err(|e| StorageError::Scan(e.to_string()))?;
            if key.as_ref() >= upper {
                break;
            }
            on_record(&key, &value);
        }

        Ok(())
    }
}
