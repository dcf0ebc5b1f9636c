//! Shared types for the Zeebe DB monitor.
//!
//! - `column_family`: the engine's column-family table (name + ordinal)
//! - `count`: `AggregateCount`, the label -> count mapping exported as metrics
//! - `config`: layered settings (defaults -> file -> env -> CLI)
//! - `error`: configuration error type

pub mod column_family;
pub mod config;
pub mod count;
pub mod error;

pub use column_family::{ColumnFamily, ALL_COLUMN_FAMILIES};
pub use config::Settings;
pub use count::AggregateCount;
pub use error::MonitorError;
