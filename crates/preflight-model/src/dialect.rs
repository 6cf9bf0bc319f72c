//! Parsing conventions forwarded to the row reader.

use serde::{Deserialize, Serialize};

/// Default field delimiter.
pub const DEFAULT_DELIMITER: &str = ",";
/// Default quote character.
pub const DEFAULT_QUOTE: &str = "\"";
/// Default text encoding (WHATWG label).
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Syntactic conventions used to tokenize a delimited-text file.
///
/// Delimiter and quote are carried as strings so that structurally invalid
/// values (e.g. a multi-character quote) are representable here and rejected
/// by the reader at open time as configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Field delimiter. Must resolve to a single ASCII character.
    pub delimiter: String,
    /// Quote character. Must resolve to a single ASCII character.
    pub quote: String,
    /// Text encoding, resolved via WHATWG encoding labels.
    pub encoding: String,
    /// Treat the first record as a header naming the columns.
    pub headers: bool,
    /// When `headers` is set, also yield the header record as data.
    pub emit_header_row: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            quote: DEFAULT_QUOTE.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            headers: false,
            emit_header_row: false,
        }
    }
}

impl Dialect {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: impl Into<String>) -> Self {
        self.quote = quote.into();
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: bool) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_emit_header_row(mut self, emit: bool) -> Self {
        self.emit_header_row = emit;
        self
    }
}
