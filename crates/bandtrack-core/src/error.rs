//! Error types for the tracker core.
//!
//! Persistence failures never reach the caller of `Tracker`; they are logged
//! and swallowed by the gateway. The errors here cover the cases a user can
//! actually act on: bad input, bad backups, unknown records.

use thiserror::Error;

/// A score field that falls outside its documented domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreInputError {
    /// Listening or reading raw score above 40.
    #[error("{field} raw score must be between 0 and 40, got {value}")]
    RawOutOfRange { field: &'static str, value: u32 },

    /// Writing band outside 0–9, NaN, or not on a half point.
    #[error("{field} band must be between 0 and 9 in steps of 0.5, got {value}")]
    InvalidBand { field: &'static str, value: f64 },

    /// A form field that is neither empty nor a number.
    #[error("{field} is not a number: '{input}'")]
    NotANumber { field: &'static str, input: String },
}

/// A record identifier that does not match `b{book}-t{test}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid record id '{0}', expected the form b<book>-t<test>")]
pub struct RecordIdError(pub String);

/// Errors raised by a `BlobStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The medium refused the write because it is full.
    #[error("storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// Underlying I/O failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a backup payload is refused by `Tracker::import_state`.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The payload is not JSON at all.
    #[error("failed to parse backup: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload has no `records` array.
    #[error("invalid backup file: missing records array")]
    MissingRecords,
}

/// Errors returned by state-controller mutations.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("no test record with id '{0}'")]
    UnknownRecord(String),

    #[error("book {0} is outside the library")]
    UnknownBook(u32),

    #[error("all four scores are required to complete a test")]
    IncompleteScores,

    #[error(transparent)]
    InvalidScores(#[from] ScoreInputError),

    #[error(transparent)]
    Import(#[from] ImportError),
}
