mod engine;
mod validators;

pub use engine::{DEFAULT_ERRORS_LIMIT, ValidateError, ValidateOptions, Validator};
pub use validators::{DateFormat, FieldContext, FieldValidator, InvalidPattern, Mandatory};
