//! Subcommand implementations.

use std::fs;

use anyhow::{Context, Result, bail};
use tracing::info;

use preflight_validate::{DEFAULT_ERRORS_LIMIT, DateFormat, Mandatory, ValidateOptions, Validator};

use crate::cli::{CheckArgs, ReportFormatArg};
use crate::config::RunConfig;
use crate::report::{ReportPayload, render_json, render_table};

/// Exit code when findings were collected.
pub const EXIT_FINDINGS: i32 = 1;

pub fn run_check(args: &CheckArgs) -> Result<i32> {
    let options = build_options(args)?;
    let mut validator = Validator::new(&args.file);
    validator
        .validate(&options)
        .with_context(|| format!("validate {}", args.file.display()))?;

    let errors = validator.errors();
    info!(errors = errors.len(), "check finished");

    match args.report {
        ReportFormatArg::Json => {
            let payload = ReportPayload::new(&args.file, validator.rows_scanned(), errors);
            let json = render_json(&payload).context("serialize report")?;
            match &args.output {
                Some(path) => fs::write(path, format!("{json}\n"))
                    .with_context(|| format!("write report: {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        ReportFormatArg::Table => {
            if errors.is_empty() {
                println!("{}: no problems found", args.file.display());
            } else {
                println!("{}", render_table(errors));
                println!(
                    "{}: {} problem(s) in {} row(s)",
                    args.file.display(),
                    errors.len(),
                    validator.rows_scanned()
                );
            }
        }
    }

    Ok(if errors.is_empty() { 0 } else { EXIT_FINDINGS })
}

/// Merge the config file (if any) under the explicit flags and build the
/// engine options.
pub fn build_options(args: &CheckArgs) -> Result<ValidateOptions> {
    let config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    let mut dialect = config.dialect.unwrap_or_default();
    if let Some(delimiter) = &args.delimiter {
        dialect.delimiter = delimiter.clone();
    }
    if let Some(quote) = &args.quote {
        dialect.quote = quote.clone();
    }
    if let Some(encoding) = &args.encoding {
        dialect.encoding = encoding.clone();
    }
    if args.headers {
        dialect.headers = true;
    }
    if args.emit_header_row {
        dialect.emit_header_row = true;
    }

    let errors_limit = match &args.errors_limit {
        Some(raw) => parse_errors_limit(raw)?,
        None => config.errors_limit.unwrap_or(Some(DEFAULT_ERRORS_LIMIT)),
    };

    let mut options = ValidateOptions::new()
        .with_errors_limit(errors_limit)
        .with_dialect(dialect);
    options.fields = args.fields.clone().or(config.fields);

    for field in config.mandatory.iter().chain(&args.require) {
        options = options.with_validator(field.clone(), Mandatory::new());
    }
    for (field, pattern) in &config.date_formats {
        options = options.with_validator(field.clone(), DateFormat::new(pattern)?);
    }
    for entry in &args.date_format {
        let Some((field, pattern)) = entry.split_once('=') else {
            bail!("--date-format expects FIELD=PATTERN, got {entry:?}");
        };
        options = options.with_validator(field, DateFormat::new(pattern)?);
    }

    Ok(options)
}

fn parse_errors_limit(raw: &str) -> Result<Option<u64>> {
    if raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let limit = raw
        .parse::<u64>()
        .with_context(|| format!("--errors-limit expects a number or \"none\", got {raw:?}"))?;
    Ok(Some(limit))
}

/// Labels listed by `preflight encodings`. Any WHATWG label is accepted by
/// --encoding; these are the common ones.
const COMMON_ENCODINGS: &[&str] = &[
    "UTF-8",
    "UTF-16LE",
    "UTF-16BE",
    "ISO-8859-1",
    "ISO-8859-2",
    "ISO-8859-9",
    "ISO-8859-15",
    "windows-1250",
    "windows-1251",
    "windows-1252",
    "Shift_JIS",
    "EUC-JP",
    "GBK",
    "Big5",
    "KOI8-R",
];

pub fn run_encodings() {
    for label in COMMON_ENCODINGS {
        println!("{label}");
    }
}

#[cfg(test)]
mod tests {
    use super::parse_errors_limit;

    #[test]
    fn errors_limit_accepts_numbers_and_none() {
        assert_eq!(parse_errors_limit("5").expect("number"), Some(5));
        assert_eq!(parse_errors_limit("none").expect("none"), None);
        assert_eq!(parse_errors_limit("NONE").expect("none"), None);
        assert!(parse_errors_limit("abc").is_err());
    }
}
