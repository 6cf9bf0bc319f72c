//! Dialect-configured row stream over a decoded CSV file.
//!
//! The file is read and decoded once at open time, scanned for unterminated
//! quotes, and then tokenized in memory. The file handle is closed before
//! iteration starts, so a stream never holds OS resources while the caller
//! walks the rows.

use std::io::Cursor;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use encoding_rs::Encoding;
use tracing::{debug, trace};

use preflight_model::Dialect;

use crate::error::{DialectError, OpenError, RowFault};
use crate::scan::find_unclosed_quote;

/// One record of the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based physical record number. When headers are enabled the header
    /// occupies record 1 and the first data row is record 2.
    pub number: u64,
    values: Vec<Option<String>>,
}

impl Row {
    /// Field value by position. Empty fields and fields beyond the end of a
    /// short record are both absent.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|value| value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Lazy, forward-only sequence of rows.
pub struct RowStream {
    records: StringRecordsIntoIter<Cursor<Vec<u8>>>,
    columns: Option<Vec<String>>,
    stashed: Option<Row>,
    pending_fault: Option<(u64, String)>,
    next_number: u64,
}

impl std::fmt::Debug for RowStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStream")
            .field("columns", &self.columns)
            .field("stashed", &self.stashed)
            .field("pending_fault", &self.pending_fault)
            .field("next_number", &self.next_number)
            .finish_non_exhaustive()
    }
}

impl RowStream {
    /// Column names from the header record, when headers are enabled and
    /// the file is non-empty.
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }
}

impl Iterator for RowStream {
    type Item = Result<Row, RowFault>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(row) = self.stashed.take() {
            return Some(Ok(row));
        }
        match self.records.next() {
            Some(Ok(record)) => {
                let number = self.next_number;
                self.next_number += 1;
                trace!(number, fields = record.len(), "row read");
                Some(Ok(row_from_record(&record, number)))
            }
            Some(Err(err)) => Some(Err(RowFault::Parse(err))),
            None => self
                .pending_fault
                .take()
                .map(|(line, message)| Err(RowFault::UnclosedQuote { line, message })),
        }
    }
}

/// Open `path` with the given dialect and return a row stream.
///
/// Dialect and I/O failures are configuration errors and come back as
/// `Err`; an encoding mismatch is a data fault surfaced as
/// [`OpenError::Encoding`] for the caller to translate.
pub fn open_rows(path: &Path, dialect: &Dialect) -> Result<RowStream, OpenError> {
    let resolved = resolve_dialect(dialect)?;
    let bytes = std::fs::read(path).map_err(|source| OpenError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (decoded, had_errors) = resolved.encoding.decode_with_bom_removal(&bytes);
    if had_errors {
        return Err(OpenError::Encoding {
            encoding: dialect.encoding.clone(),
        });
    }
    let mut text = decoded.into_owned();

    let mut pending_fault = None;
    if let Some(fault) = find_unclosed_quote(&text, resolved.delimiter, resolved.quote) {
        debug!(line = fault.line, "unclosed quoted field detected");
        let message = format!("Unclosed quoted field on line {}.", fault.line);
        pending_fault = Some((fault.line, message));
        text.truncate(fault.truncate_at);
    }

    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(resolved.delimiter)
        .quote(resolved.quote)
        .from_reader(Cursor::new(text.into_bytes()));

    let mut stream = RowStream {
        records: reader.into_records(),
        columns: None,
        stashed: None,
        pending_fault,
        next_number: 1,
    };

    if dialect.headers {
        match stream.records.next() {
            Some(Ok(record)) => {
                let number = stream.next_number;
                stream.next_number += 1;
                stream.columns = Some(record.iter().map(str::to_string).collect());
                if dialect.emit_header_row {
                    stream.stashed = Some(row_from_record(&record, number));
                }
            }
            Some(Err(err)) => return Err(OpenError::Parse(err)),
            // Empty file, or a quote fault already on line 1: iteration
            // surfaces whatever is pending.
            None => {}
        }
    }

    Ok(stream)
}

#[derive(Debug)]
struct ResolvedDialect {
    delimiter: u8,
    quote: u8,
    encoding: &'static Encoding,
}

fn resolve_dialect(dialect: &Dialect) -> Result<ResolvedDialect, DialectError> {
    let delimiter =
        single_ascii(&dialect.delimiter).ok_or_else(|| DialectError::InvalidDelimiter {
            value: dialect.delimiter.clone(),
        })?;
    let quote = single_ascii(&dialect.quote).ok_or_else(|| DialectError::InvalidQuote {
        value: dialect.quote.clone(),
    })?;
    let encoding = Encoding::for_label(dialect.encoding.as_bytes()).ok_or_else(|| {
        DialectError::UnknownEncoding {
            label: dialect.encoding.clone(),
        }
    })?;
    Ok(ResolvedDialect {
        delimiter,
        quote,
        encoding,
    })
}

fn single_ascii(value: &str) -> Option<u8> {
    // a one-byte &str is necessarily ASCII
    match value.as_bytes() {
        [b] => Some(*b),
        _ => None,
    }
}

fn row_from_record(record: &StringRecord, number: u64) -> Row {
    let values = record
        .iter()
        .map(|field| (!field.is_empty()).then(|| field.to_string()))
        .collect();
    Row { number, values }
}
