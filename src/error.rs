//! Error handling for Fundledger
//!
//! Report execution fails with the typed `ReportError`; application layers
//! wrap it in anyhow for context chaining and error propagation.

use thiserror::Error;

/// Failures of a single report execution.
///
/// `row` is the 1-based position of the offending record in the sequence
/// returned by the record source.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("query error: {0}")]
    Query(String),

    #[error("invalid transaction type '{value}' in row {row}")]
    InvalidTransactionType { row: usize, value: String },

    #[error("malformed record in row {row}: missing or invalid {field}")]
    MalformedRecord { row: usize, field: &'static str },
}

impl From<rusqlite::Error> for ReportError {
    fn from(err: rusqlite::Error) -> Self {
        ReportError::Query(err.to_string())
    }
}

/// Result type alias for application operations
pub type Result<T> = anyhow::Result<T>;
