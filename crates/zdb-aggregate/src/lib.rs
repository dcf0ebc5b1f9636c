//! Aggregation core for the Zeebe DB monitor.
//!
//! # Components
//!
//! - `decoder`: MessagePack value decoding and nested field extraction
//! - `aggregator`: per-family entry counts and per-message incident counts
//! - `cache`: TTL memoization with in-flight call coalescing
//!
//! # Failure policy
//!
//! Undecodable or incomplete records are skipped one by one. A store that
//! cannot be opened or a scan that fails part-way empties the whole
//! aggregate: a partial snapshot is never returned.

pub mod aggregator;
pub mod cache;
pub mod decoder;
pub mod error;

pub use aggregator::{Aggregator, INCIDENT_MESSAGE_PATH};
pub use cache::{AggregateCache, Memoized, ScanObserver, DEFAULT_CACHE_TTL};
pub use decoder::{decode_record, extract_field, extract_message, StructuredRecord};
pub use error::DecodeError;
