//! Property tests for the validation engine.

use std::io::Write;

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::{ProptestConfig, Strategy, prop_assert, prop_assert_eq, proptest};

use tempfile::NamedTempFile;

use preflight_model::ErrorKind;
use preflight_validate::{Mandatory, ValidateOptions, Validator};

fn write_csv(rows: &[Vec<Option<String>>]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    for row in rows {
        let line = row
            .iter()
            .map(|cell| cell.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(file, "{line}").expect("write row");
    }
    file
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A well-formed file with no configured validators never produces
    /// findings, whatever its shape.
    #[test]
    fn clean_tables_yield_no_findings(
        rows in vec(vec("[a-z0-9]{1,8}".prop_map(Some), 1..6), 0..20),
    ) {
        let file = write_csv(&rows);
        let mut validator = Validator::new(file.path());
        validator.validate(&ValidateOptions::default()).expect("validate");
        prop_assert!(validator.errors().is_empty());
    }

    /// The finding list never exceeds limit + 1, and when it hits that
    /// bound the last record is the terminal one.
    #[test]
    fn findings_never_exceed_limit_plus_one(
        rows in vec(vec(option::of("[a-z]{1,4}"), 3..5), 1..40),
        limit in 1u64..20,
    ) {
        let file = write_csv(&rows);
        let options = ValidateOptions::new()
            .with_fields(["a", "b", "c"])
            .with_validator("a", Mandatory::new())
            .with_validator("b", Mandatory::new())
            .with_validator("c", Mandatory::new())
            .with_errors_limit(Some(limit));
        let mut validator = Validator::new(file.path());
        validator.validate(&options).expect("validate");

        let count = validator.errors().len() as u64;
        prop_assert!(count <= limit + 1);
        if count == limit + 1 {
            prop_assert_eq!(
                validator.errors().last().map(|record| record.kind),
                Some(ErrorKind::TooManyErrors)
            );
        } else {
            prop_assert!(
                validator
                    .errors()
                    .iter()
                    .all(|record| record.kind != ErrorKind::TooManyErrors)
            );
        }
    }
}
