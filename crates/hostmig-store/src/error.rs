//! Error types for the record store.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record {index} is truncated: expected {expected} bytes, found {actual}")]
    Truncated {
        index: u64,
        expected: usize,
        actual: usize,
    },

    #[error("record {index} declares {length} bytes, above the {limit} byte limit")]
    RecordTooLarge { index: u64, length: usize, limit: usize },

    #[error("failed to encode record: {0}")]
    Encode(String),

    #[error("failed to decode record {index}: {message}")]
    Decode { index: u64, message: String },

    #[error("record {index} has unsupported payload version {version}")]
    UnsupportedVersion { index: u64, version: u32 },
}
