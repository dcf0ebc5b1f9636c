//! Read-only storage layer for the Zeebe DB monitor.
//!
//! Provides:
//! - Column-family key ranges over the flat RocksDB key space (`keys`)
//! - The `RangeStore` interface: refresh + ordered half-open range scans
//! - `StoreHandle`, a read-only RocksDB implementation that never writes
//! - `InMemoryStore`, a sorted in-memory implementation with fault injection

pub mod db;
pub mod error;
pub mod keys;
pub mod memory;
pub mod store;

pub use db::StoreHandle;
pub use error::StorageError;
pub use keys::{range_for, KeyRange};
pub use memory::InMemoryStore;
pub use store::RangeStore;
