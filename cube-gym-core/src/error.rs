//! Errors in the library.
use thiserror::Error;

/// Errors raised when reading values from a [`Record`](crate::record::Record).
#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
