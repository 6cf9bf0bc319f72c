pub mod error;
mod scan;
pub mod stream;

pub use error::{DialectError, OpenError, RowFault};
pub use stream::{Row, RowStream, open_rows};
