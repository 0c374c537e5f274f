//! Error types for nimbus-io.

use std::path::PathBuf;

use nimbus_markov::MarkovError;

/// Error type for all fallible operations in the nimbus-io crate.
///
/// Covers file-system failures, CSV and JSON format errors, date handling,
/// accumulated validation problems, and model errors surfaced while
/// reassembling a saved model.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps a failure reading or writing a file.
    #[error("i/o error: {reason}")]
    Io {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error originating from the CSV parser.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps an error originating from JSON (de)serialization.
    #[error("json error: {reason}")]
    Json {
        /// Description of the underlying JSON failure.
        reason: String,
    },

    /// Returned when a required column is not present in the header.
    #[error("column '{name}' not found in header")]
    MissingColumn {
        /// Name of the missing column.
        name: String,
    },

    /// Returned when a date cell cannot be parsed.
    #[error("invalid date {value:?} on row {row}")]
    InvalidDate {
        /// 1-based data row (the header is row 0).
        row: usize,
        /// The offending cell.
        value: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Wraps an error from the Markov model layer.
    #[error("model error: {0}")]
    Markov(#[from] MarkovError),
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Io {
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json {
            reason: e.to_string(),
        }
    }
}
