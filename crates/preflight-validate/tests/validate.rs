//! Integration tests for the validation engine, driven through real files.

use std::io::Write;

use tempfile::NamedTempFile;

use preflight_model::{Dialect, ErrorKind, ErrorRecord};
use preflight_validate::{DateFormat, Mandatory, ValidateError, ValidateOptions, Validator};

fn temp_csv(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents).expect("write temp file");
    file
}

fn run(file: &NamedTempFile, options: &ValidateOptions) -> Vec<ErrorRecord> {
    let mut validator = Validator::new(file.path());
    validator.validate(options).expect("validate");
    validator.into_errors()
}

#[test]
fn collects_no_errors_for_valid_files() {
    let file = temp_csv(b"order,date,customer\n1,20240115,acme\n2,20240116,globex\n");
    assert!(run(&file, &ValidateOptions::default()).is_empty());
}

#[test]
fn uses_the_provided_dialect_to_parse() {
    let file = temp_csv(b"1;'semi;colon';3\n2;plain;4\n");
    let options = ValidateOptions::new()
        .with_dialect(Dialect::new().with_delimiter(";").with_quote("'"));
    assert!(run(&file, &options).is_empty());
}

#[test]
fn detects_invalid_byte_sequence_under_default_encoding() {
    let file = temp_csv(b"name\ng\xFCl\n");
    let errors = run(&file, &ValidateOptions::default());
    assert_eq!(
        errors,
        [ErrorRecord::file_level(
            ErrorKind::InvalidEncoding,
            "invalid byte sequence in UTF-8",
        )]
    );
}

#[test]
fn does_not_report_byte_sequence_error_with_correct_encoding() {
    let file = temp_csv(b"name\ng\xFCl\n");
    let options =
        ValidateOptions::new().with_dialect(Dialect::new().with_encoding("ISO-8859-9"));
    assert!(run(&file, &options).is_empty());
}

#[test]
fn detects_quoting_problems() {
    let file = temp_csv(b"a,b\n1,2\n3,4\n\"never closed,5\n");
    let errors = run(&file, &ValidateOptions::default());
    assert_eq!(
        errors,
        [ErrorRecord::in_row(
            4,
            ErrorKind::UnclosedQuote,
            "Unclosed quoted field on line 4.",
        )]
    );
}

#[test]
fn rows_before_a_quote_fault_keep_their_errors() {
    let file = temp_csv(b"1,alice\n,bob\n3,carol\n\"oops,dave\n");
    let options = ValidateOptions::new()
        .with_fields(["id", "name"])
        .with_validator("id", Mandatory::new());
    let errors = run(&file, &options);
    assert_eq!(
        errors,
        [
            ErrorRecord::in_field(2, "id", ErrorKind::MissingField, "Missing mandatory field"),
            ErrorRecord::in_row(4, ErrorKind::UnclosedQuote, "Unclosed quoted field on line 4."),
        ]
    );
}

#[test]
fn reraises_errors_that_are_not_parsing_related() {
    let file = temp_csv(b"a,b\n1,2\n");
    let options = ValidateOptions::new().with_dialect(Dialect::new().with_quote("asd"));
    let mut validator = Validator::new(file.path());
    let err = validator.validate(&options).expect_err("must propagate");
    assert!(matches!(err, ValidateError::Dialect(_)));
    assert!(validator.errors().is_empty());
}

#[test]
fn missing_file_propagates_as_io_error() {
    let mut validator = Validator::new("/no/such/file.csv");
    let err = validator
        .validate(&ValidateOptions::default())
        .expect_err("must propagate");
    assert!(matches!(err, ValidateError::Io { .. }));
}

mod mandatory_field {
    use super::*;

    fn fixture() -> NamedTempFile {
        temp_csv(b"1,alice\n2,bob\n3,carol\n,dave\n")
    }

    #[test]
    fn does_not_validate_unless_fields_given() {
        let options = ValidateOptions::new().with_validator("id", Mandatory::new());
        assert!(run(&fixture(), &options).is_empty());
    }

    #[test]
    fn does_not_validate_unless_validators_given() {
        let options = ValidateOptions::new().with_fields(["id", "name"]);
        assert!(run(&fixture(), &options).is_empty());
    }

    #[test]
    fn reports_field_with_nil_value() {
        let options = ValidateOptions::new()
            .with_fields(["id", "name"])
            .with_validator("id", Mandatory::new());
        assert_eq!(
            run(&fixture(), &options),
            [ErrorRecord::in_field(
                4,
                "id",
                ErrorKind::MissingField,
                "Missing mandatory field",
            )]
        );
    }

    #[test]
    fn resolves_fields_by_header_name_when_headers_enabled() {
        // columns are reversed relative to the configured field order
        let file = temp_csv(b"name,id\nalice,1\nbob,\n");
        let options = ValidateOptions::new()
            .with_dialect(Dialect::new().with_headers(true))
            .with_fields(["id", "name"])
            .with_validator("id", Mandatory::new());
        assert_eq!(
            run(&file, &options),
            [ErrorRecord::in_field(
                3,
                "id",
                ErrorKind::MissingField,
                "Missing mandatory field",
            )]
        );
    }
}

mod abort_validation {
    use super::*;

    const FIELDS: [&str; 7] = [
        "order",
        "date",
        "customer",
        "item",
        "c_sales_amount",
        "quantity",
        "unit_price",
    ];

    /// 7 date-validated fields x 150 rows of non-dates = 1050 potential errors.
    fn fixture() -> NamedTempFile {
        let mut contents = Vec::new();
        for _ in 0..150 {
            contents.extend_from_slice(b"a,a,a,a,a,a,a\n");
        }
        temp_csv(&contents)
    }

    fn options() -> ValidateOptions {
        let mut options = ValidateOptions::new().with_fields(FIELDS);
        for field in FIELDS {
            options =
                options.with_validator(field, DateFormat::new("%Y%m%d").expect("valid pattern"));
        }
        options
    }

    #[test]
    fn aborts_when_reaching_the_default_limit() {
        let errors = run(&fixture(), &options());
        assert_eq!(errors.len(), 1000 + 1);
        assert_eq!(
            errors.last(),
            Some(&ErrorRecord::file_level(
                ErrorKind::TooManyErrors,
                "Too many errors were found",
            ))
        );
    }

    #[test]
    fn aborts_when_reaching_the_configured_limit() {
        let errors = run(&fixture(), &options().with_errors_limit(Some(1)));
        assert_eq!(errors.len(), 1 + 1);
        assert_eq!(
            errors.last(),
            Some(&ErrorRecord::file_level(
                ErrorKind::TooManyErrors,
                "Too many errors were found",
            ))
        );
    }

    #[test]
    fn no_limit_disables_the_abort() {
        let errors = run(&fixture(), &options().with_errors_limit(None));
        assert_eq!(errors.len(), 1050);
        assert!(errors.iter().all(|record| record.kind != ErrorKind::TooManyErrors));
    }
}

#[test]
fn a_second_run_starts_from_a_fresh_list() {
    let file = temp_csv(b"1,alice\n,bob\n");
    let options = ValidateOptions::new()
        .with_fields(["id", "name"])
        .with_validator("id", Mandatory::new());

    let mut validator = Validator::new(file.path());
    validator.validate(&options).expect("first run");
    let first = validator.errors().to_vec();
    assert_eq!(first.len(), 1);

    validator.validate(&options).expect("second run");
    assert_eq!(validator.errors(), &first[..]);
}

#[test]
fn rows_scanned_reflects_consumed_rows() {
    let file = temp_csv(b"a,b\n1,2\n3,4\n");
    let mut validator = Validator::new(file.path());
    validator
        .validate(&ValidateOptions::default())
        .expect("validate");
    assert_eq!(validator.rows_scanned(), 3);
}
