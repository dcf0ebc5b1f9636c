//! Generic ordered range-scan store interface.

use crate::error::StorageError;

/// Callback invoked once per record during a range scan.
pub type OnRecord<'a> = dyn FnMut(&[u8], &[u8]) + 'a;

/// A read-only, sorted key-value store that can be reopened and range-scanned.
///
/// Implementations never write. A handle starts closed; `refresh` must succeed
/// before `scan_range` can be used.
pub trait RangeStore: Send {
    /// Close the handle if open, then reopen it read-only.
    ///
    /// On failure the handle is left closed and calling `refresh` again is safe.
    fn refresh(&mut self) -> Result<(), StorageError>;

    /// Close the handle if open. Idempotent.
    fn close(&mut self);

    fn is_open(&self) -> bool;

    /// Visit every record with `lower <= key < upper` in ascending key order.
    ///
    /// Returns `StorageError::Scan` if iteration fails part-way; records
    /// already passed to `on_record` must then be discarded by the caller.
    fn scan_range(
        &self,
        lower: &[u8],
        upper: &[u8],
        on_record: &mut OnRecord<'_>,
    ) -> Result<(), StorageError>;
}
