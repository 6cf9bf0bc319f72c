pub mod dialect;
pub mod record;

pub use dialect::Dialect;
pub use record::{ErrorKind, ErrorRecord};
