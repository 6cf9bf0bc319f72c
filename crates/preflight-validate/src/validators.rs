//! Field validators: per-field checks dispatched by the engine.

use chrono::format::{Item, Parsed, StrftimeItems, parse};
use thiserror::Error;

use preflight_model::{ErrorKind, ErrorRecord};

/// Row context handed to a validator along with the field value.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// 1-based record number of the row being checked.
    pub row: u64,
    /// Name of the field being checked.
    pub field: &'a str,
}

/// A unit that checks one field's value within a row.
///
/// Implementations must not fail on malformed data; malformed data is
/// exactly what they report. Malformed configuration belongs in the
/// constructor. Validators hold no per-row state and may be invoked in any
/// column order.
pub trait FieldValidator {
    fn check(&self, value: Option<&str>, ctx: &FieldContext<'_>) -> Vec<ErrorRecord>;
}

/// Reports a field whose value is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mandatory;

impl Mandatory {
    pub fn new() -> Self {
        Self
    }
}

impl FieldValidator for Mandatory {
    fn check(&self, value: Option<&str>, ctx: &FieldContext<'_>) -> Vec<ErrorRecord> {
        match value {
            Some(_) => Vec::new(),
            None => vec![ErrorRecord::in_field(
                ctx.row,
                ctx.field,
                ErrorKind::MissingField,
                "Missing mandatory field",
            )],
        }
    }
}

/// Invalid strftime pattern supplied to [`DateFormat`].
#[derive(Debug, Error)]
#[error("invalid date format pattern: {pattern:?}")]
pub struct InvalidPattern {
    pub pattern: String,
}

/// Reports values that do not parse under a strftime date pattern.
///
/// Absent values pass: reporting absence is [`Mandatory`]'s concern.
#[derive(Debug, Clone)]
pub struct DateFormat {
    pattern: String,
}

impl DateFormat {
    /// Construction fails fast on a malformed pattern rather than failing
    /// once per row.
    pub fn new(pattern: impl Into<String>) -> Result<Self, InvalidPattern> {
        let pattern = pattern.into();
        let malformed = StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error));
        if malformed {
            return Err(InvalidPattern { pattern });
        }
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl FieldValidator for DateFormat {
    fn check(&self, value: Option<&str>, ctx: &FieldContext<'_>) -> Vec<ErrorRecord> {
        let Some(value) = value else {
            return Vec::new();
        };
        let mut parsed = Parsed::new();
        if parse(&mut parsed, value, StrftimeItems::new(&self.pattern)).is_ok() {
            return Vec::new();
        }
        vec![ErrorRecord::in_field(
            ctx.row,
            ctx.field,
            ErrorKind::InvalidDate,
            "Invalid date value",
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::{DateFormat, FieldContext, FieldValidator, Mandatory};
    use preflight_model::ErrorKind;

    fn ctx() -> FieldContext<'static> {
        FieldContext {
            row: 7,
            field: "when",
        }
    }

    #[test]
    fn mandatory_reports_absent_values_only() {
        let validator = Mandatory::new();
        assert!(validator.check(Some("x"), &ctx()).is_empty());

        let records = validator.check(None, &ctx());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ErrorKind::MissingField);
        assert_eq!(records[0].row, Some(7));
        assert_eq!(records[0].field.as_deref(), Some("when"));
        assert_eq!(records[0].message, "Missing mandatory field");
    }

    #[test]
    fn date_format_accepts_matching_values() {
        let validator = DateFormat::new("%Y%m%d").expect("valid pattern");
        assert!(validator.check(Some("20240115"), &ctx()).is_empty());
        assert!(validator.check(None, &ctx()).is_empty());
    }

    #[test]
    fn date_format_reports_mismatches() {
        let validator = DateFormat::new("%Y%m%d").expect("valid pattern");
        let records = validator.check(Some("not-a-date"), &ctx());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ErrorKind::InvalidDate);
        assert_eq!(records[0].row, Some(7));
    }

    #[test]
    fn date_format_rejects_out_of_range_components() {
        let validator = DateFormat::new("%Y%m%d").expect("valid pattern");
        assert_eq!(validator.check(Some("20241340"), &ctx()).len(), 1);
    }

    #[test]
    fn malformed_pattern_fails_at_construction() {
        assert!(DateFormat::new("%Q").is_err());
    }
}
