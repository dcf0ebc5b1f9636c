//! Error types for record decoding.

use thiserror::Error;

/// A stored value is not a single well-formed MessagePack value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Decode error: {0}")]
    MessagePack(#[from] rmpv::decode::Error),

    #[error("Decode error: {0} trailing bytes after value")]
    TrailingBytes(usize),
}
