//! The validation engine: row scan, validator dispatch, error accumulation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, trace};

use preflight_ingest::{DialectError, OpenError, Row, RowFault, open_rows};
use preflight_model::{Dialect, ErrorKind, ErrorRecord};

use crate::validators::{FieldContext, FieldValidator};

/// Default number of accumulated records after which a run aborts.
pub const DEFAULT_ERRORS_LIMIT: u64 = 1000;

const TOO_MANY_ERRORS_MESSAGE: &str = "Too many errors were found";

/// Configuration for one validation run.
///
/// Field-level validation runs only when `fields` is present and at least
/// one validator is registered; either alone is a no-op.
pub struct ValidateOptions {
    /// Ordered field names the rows are expected to expose, by position or
    /// by header name.
    pub fields: Option<Vec<String>>,
    /// Validators keyed by field name.
    pub validators: BTreeMap<String, Box<dyn FieldValidator>>,
    /// Abort threshold; `None` disables the limit.
    pub errors_limit: Option<u64>,
    /// Reader configuration, forwarded verbatim.
    pub dialect: Dialect,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            fields: None,
            validators: BTreeMap::new(),
            errors_limit: Some(DEFAULT_ERRORS_LIMIT),
            dialect: Dialect::default(),
        }
    }
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_validator(
        mut self,
        field: impl Into<String>,
        validator: impl FieldValidator + 'static,
    ) -> Self {
        self.validators.insert(field.into(), Box::new(validator));
        self
    }

    #[must_use]
    pub fn with_errors_limit(mut self, limit: Option<u64>) -> Self {
        self.errors_limit = limit;
        self
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }
}

impl fmt::Debug for ValidateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateOptions")
            .field("fields", &self.fields)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("errors_limit", &self.errors_limit)
            .field("dialect", &self.dialect)
            .finish()
    }
}

/// Configuration or I/O failure that aborts a run without producing
/// findings. Data problems never surface here; they end up in the
/// accumulated record list instead.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Dialect(#[from] DialectError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] csv::Error),
}

/// Validates one delimited-text file, collecting every finding up to the
/// configured limit instead of stopping at the first problem.
pub struct Validator {
    path: PathBuf,
    errors: Vec<ErrorRecord>,
    rows_scanned: u64,
}

impl Validator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            errors: Vec::new(),
            rows_scanned: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Findings of the most recent run, in encounter order. A terminal
    /// `too_many_errors` record, if present, is always last.
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Rows consumed by the most recent run.
    pub fn rows_scanned(&self) -> u64 {
        self.rows_scanned
    }

    pub fn into_errors(self) -> Vec<ErrorRecord> {
        self.errors
    }

    /// Run validation against the configured file.
    ///
    /// Each call starts from an empty finding list; a second run never
    /// appends to the previous run's records.
    pub fn validate(&mut self, options: &ValidateOptions) -> Result<(), ValidateError> {
        self.errors.clear();
        self.rows_scanned = 0;
        debug!(
            path = %self.path.display(),
            limit = ?options.errors_limit,
            "validation started"
        );

        let stream = match open_rows(&self.path, &options.dialect) {
            Ok(stream) => stream,
            Err(OpenError::Encoding { encoding }) => {
                self.errors.push(ErrorRecord::file_level(
                    ErrorKind::InvalidEncoding,
                    format!("invalid byte sequence in {encoding}"),
                ));
                return Ok(());
            }
            Err(OpenError::Dialect(err)) => return Err(err.into()),
            Err(OpenError::Io { path, source }) => return Err(ValidateError::Io { path, source }),
            Err(OpenError::Parse(err)) => return Err(err.into()),
        };

        let plan = FieldPlan::build(options, stream.columns());

        for item in stream {
            match item {
                Ok(row) => {
                    self.rows_scanned += 1;
                    if let Some(plan) = &plan
                        && !self.check_row(&row, plan, options.errors_limit)
                    {
                        // limit reached; terminal record already appended
                        break;
                    }
                }
                Err(RowFault::UnclosedQuote { line, message }) => {
                    self.errors
                        .push(ErrorRecord::in_row(line, ErrorKind::UnclosedQuote, message));
                    break;
                }
                Err(RowFault::Parse(err)) => return Err(err.into()),
            }
        }

        info!(
            path = %self.path.display(),
            rows = self.rows_scanned,
            errors = self.errors.len(),
            "validation finished"
        );
        Ok(())
    }

    /// Dispatch the plan against one row. Returns `false` when the limit
    /// was reached and the run must stop.
    fn check_row(&mut self, row: &Row, plan: &FieldPlan<'_>, limit: Option<u64>) -> bool {
        for entry in &plan.entries {
            let value = entry.column.and_then(|index| row.get(index));
            let ctx = FieldContext {
                row: row.number,
                field: entry.name,
            };
            for mut record in entry.validator.check(value, &ctx) {
                if record.field.is_none() {
                    record.field = Some(entry.name.to_string());
                }
                trace!(%record, "finding");
                self.errors.push(record);
                if let Some(limit) = limit
                    && self.errors.len() as u64 >= limit
                {
                    self.errors.push(ErrorRecord::file_level(
                        ErrorKind::TooManyErrors,
                        TOO_MANY_ERRORS_MESSAGE,
                    ));
                    return false;
                }
            }
        }
        true
    }
}

/// Pre-resolved dispatch plan: one entry per configured field that has a
/// registered validator, in field-list order.
struct FieldPlan<'a> {
    entries: Vec<PlanEntry<'a>>,
}

struct PlanEntry<'a> {
    name: &'a str,
    /// Position of the field within a row; `None` when headers are enabled
    /// but the header does not expose this field.
    column: Option<usize>,
    validator: &'a dyn FieldValidator,
}

impl<'a> FieldPlan<'a> {
    fn build(options: &'a ValidateOptions, columns: Option<&[String]>) -> Option<Self> {
        let fields = options.fields.as_ref()?;
        if options.validators.is_empty() {
            return None;
        }
        let entries = fields
            .iter()
            .enumerate()
            .filter_map(|(position, name)| {
                let validator = options.validators.get(name)?;
                let column = match columns {
                    Some(columns) => columns.iter().position(|column| column == name),
                    None => Some(position),
                };
                Some(PlanEntry {
                    name: name.as_str(),
                    column,
                    validator: validator.as_ref(),
                })
            })
            .collect();
        Some(Self { entries })
    }
}
