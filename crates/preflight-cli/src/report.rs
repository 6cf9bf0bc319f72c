//! Rendering of validation results as a table or JSON payload.

use std::path::Path;

use chrono::Utc;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

use preflight_model::{ErrorKind, ErrorRecord};

pub const REPORT_SCHEMA: &str = "preflight.report";
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Machine-readable report written by `--report json`.
#[derive(Debug, Serialize)]
pub struct ReportPayload<'a> {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub file: String,
    pub rows_scanned: u64,
    pub error_count: usize,
    pub errors: &'a [ErrorRecord],
}

impl<'a> ReportPayload<'a> {
    pub fn new(file: &Path, rows_scanned: u64, errors: &'a [ErrorRecord]) -> Self {
        Self {
            schema: REPORT_SCHEMA,
            schema_version: REPORT_SCHEMA_VERSION,
            generated_at: Utc::now().to_rfc3339(),
            file: file.display().to_string(),
            rows_scanned,
            error_count: errors.len(),
            errors,
        }
    }
}

pub fn render_json(payload: &ReportPayload<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(payload)
}

pub fn render_table(errors: &[ErrorRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Row", "Field", "Type", "Message"]);
    for record in errors {
        let row = record
            .row
            .map_or_else(|| "-".to_string(), |number| number.to_string());
        let field = record.field.as_deref().unwrap_or("-");
        table.add_row(vec![
            Cell::new(row).set_alignment(CellAlignment::Right),
            Cell::new(field),
            kind_cell(record.kind),
            Cell::new(&record.message),
        ]);
    }
    table
}

fn kind_cell(kind: ErrorKind) -> Cell {
    let color = match kind {
        ErrorKind::TooManyErrors => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(kind.as_str()).fg(color)
}
