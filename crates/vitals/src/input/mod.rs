//! Input parsing, in-memory tables, and CSV output.

mod parser;
mod source;
mod value;
mod writer;

pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, Row, SourceMetadata};
pub use value::{TIMESTAMP_FORMAT, Value, is_null_token};
pub use writer::{write_csv, write_table};
