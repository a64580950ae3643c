//! Error types for the iana-etc-core library.
//!
//! This module provides comprehensive error handling using the `thiserror` crate,
//! with detailed error variants for different failure modes.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for iana-etc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all iana-etc operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while streaming generated output
    #[error("failed to write output: {0}")]
    OutputWrite(#[from] std::io::Error),

    /// Registry XML is unparsable or structurally incomplete
    #[error("malformed registry document: {details}")]
    MalformedDocument {
        /// Detailed description of the issue
        details: String,
    },

    /// The registry's `updated` element does not hold a `YYYY-MM-DD` date
    #[error("invalid registry date '{text}': {source}")]
    InvalidDate {
        /// The offending date text
        text: String,
        /// Underlying parse error
        #[source]
        source: chrono::ParseError,
    },

    /// A record field expected to hold an integer does not
    #[error("invalid {field} field '{text}': {source}")]
    InvalidNumber {
        /// Name of the record field
        field: &'static str,
        /// The offending field text
        text: String,
        /// Underlying parse error
        #[source]
        source: std::num::ParseIntError,
    },

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new malformed document error
    pub fn malformed_document(details: impl Into<String>) -> Self {
        Self::MalformedDocument {
            details: details.into(),
        }
    }

    /// Creates a new invalid date error
    pub fn invalid_date(text: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::InvalidDate {
            text: text.into(),
            source,
        }
    }

    /// Creates a new invalid number error
    pub fn invalid_number(
        field: &'static str,
        text: impl Into<String>,
        source: std::num::ParseIntError,
    ) -> Self {
        Self::InvalidNumber {
            field,
            text: text.into(),
            source,
        }
    }

    /// Creates a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::malformed_document("no <updated> element found");
        assert!(err.to_string().contains("malformed registry document"));
        assert!(err.to_string().contains("updated"));
    }

    #[test]
    fn test_invalid_number_display() {
        let source = "port".parse::<u32>().unwrap_err();
        let err = Error::invalid_number("number", "port", source);
        assert!(err.to_string().contains("number"));
        assert!(err.to_string().contains("'port'"));
    }
}
