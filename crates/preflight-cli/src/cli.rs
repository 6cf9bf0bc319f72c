//! CLI argument definitions for the pre-flight validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "preflight",
    version,
    about = "CSV pre-flight validator - collect every problem in a file before ingestion",
    long_about = "Validate a delimited-text file against structural and semantic rules.\n\n\
                  Collects all discovered problems (up to a configurable cap) instead of\n\
                  stopping at the first one. Exits 1 when problems were found and 2 on\n\
                  configuration errors."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a CSV file and report every problem found.
    Check(CheckArgs),

    /// List commonly used text encoding labels.
    Encodings,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the CSV file to validate.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field delimiter (default ",").
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<String>,

    /// Quote character (default "\"").
    #[arg(long, value_name = "CHAR")]
    pub quote: Option<String>,

    /// Text encoding as a WHATWG label, e.g. UTF-8 or ISO-8859-9 (default UTF-8).
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Treat the first record as a header naming the columns.
    #[arg(long)]
    pub headers: bool,

    /// With --headers, also validate the header record as data.
    #[arg(long = "emit-header-row")]
    pub emit_header_row: bool,

    /// Ordered field names; field validation needs this together with
    /// --require or --date-format.
    #[arg(long, value_delimiter = ',', value_name = "NAME,NAME,...")]
    pub fields: Option<Vec<String>>,

    /// Mark a field as mandatory (repeatable).
    #[arg(long = "require", value_name = "FIELD")]
    pub require: Vec<String>,

    /// Check a field against a strftime date pattern (repeatable).
    #[arg(long = "date-format", value_name = "FIELD=PATTERN")]
    pub date_format: Vec<String>,

    /// Abort after N findings (default 1000); pass "none" to disable the cap.
    #[arg(long = "errors-limit", value_name = "N|none")]
    pub errors_limit: Option<String>,

    /// JSON run configuration; explicit flags override its values.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value = "table")]
    pub report: ReportFormatArg,

    /// Write the JSON report to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Report format choices.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
