use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable classification of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bytes in the file do not decode under the configured encoding.
    InvalidEncoding,
    /// A quoted field was opened but never closed.
    UnclosedQuote,
    /// A mandatory field has no value.
    MissingField,
    /// A field value does not parse under the configured date pattern.
    InvalidDate,
    /// The run was aborted after reaching the configured error limit.
    TooManyErrors,
}

impl ErrorKind {
    /// Stable tag used in reports and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidEncoding => "invalid_encoding",
            Self::UnclosedQuote => "unclosed_quote",
            Self::MissingField => "missing_field",
            Self::InvalidDate => "invalid_date",
            Self::TooManyErrors => "too_many_errors",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem discovered during a validation run.
///
/// Records are immutable once accumulated. Equality covers all four
/// attributes so whole result lists can be compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// 1-based record number, or `None` for file-level findings.
    pub row: Option<u64>,
    /// Field name, or `None` when the finding is not tied to one field.
    pub field: Option<String>,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl ErrorRecord {
    /// A finding that applies to the file as a whole.
    pub fn file_level(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            row: None,
            field: None,
            kind,
            message: message.into(),
        }
    }

    /// A finding tied to one record but not to a single field.
    pub fn in_row(row: u64, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            field: None,
            kind,
            message: message.into(),
        }
    }

    /// A finding tied to one field of one record.
    pub fn in_field(
        row: u64,
        field: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row: Some(row),
            field: Some(field.into()),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.row, self.field.as_deref()) {
            (Some(row), Some(field)) => {
                write!(f, "row {row}, field {field}: [{}] {}", self.kind, self.message)
            }
            (Some(row), None) => write!(f, "row {row}: [{}] {}", self.kind, self.message),
            _ => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}
