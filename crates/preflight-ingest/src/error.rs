//! Error types for row-stream opening and iteration.
//!
//! The split matters to the validation engine: dialect and I/O failures are
//! caller mistakes and propagate, while encoding and quoting faults are
//! properties of the input data and get translated into findings.

use std::path::PathBuf;
use thiserror::Error;

/// Structurally invalid dialect options.
#[derive(Debug, Error)]
pub enum DialectError {
    /// Delimiter is not a single ASCII character.
    #[error("delimiter has to be a single character: {value:?}")]
    InvalidDelimiter { value: String },

    /// Quote is not a single ASCII character.
    #[error("quote has to be a single character: {value:?}")]
    InvalidQuote { value: String },

    /// Encoding label not recognized by the WHATWG registry.
    #[error("unknown encoding: {label}")]
    UnknownEncoding { label: String },
}

/// Failure to open a row stream.
#[derive(Debug, Error)]
pub enum OpenError {
    /// Malformed dialect configuration; propagates to the caller.
    #[error(transparent)]
    Dialect(#[from] DialectError),

    /// I/O failure reading the file; propagates to the caller.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file's bytes do not decode under the configured encoding.
    /// Data fault: the engine reports it as a finding instead of failing.
    #[error("invalid byte sequence in {encoding}")]
    Encoding { encoding: String },

    /// Tokenizer failure while reading the header record; propagates.
    #[error(transparent)]
    Parse(#[from] csv::Error),
}

/// Fault raised while iterating rows.
#[derive(Debug, Error)]
pub enum RowFault {
    /// A quoted field was opened but never closed. Data fault: the engine
    /// records the line and stops consuming rows.
    #[error("{message}")]
    UnclosedQuote { line: u64, message: String },

    /// Any other tokenizer failure; propagates to the caller.
    #[error(transparent)]
    Parse(#[from] csv::Error),
}
