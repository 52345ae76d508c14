//! Generic parsing primitives for "set" style configuration dumps used by higher-level tools.

pub mod parser;
pub mod statement;

pub use parser::{parse, parse_file, parse_reader, ParseError};
pub use statement::Statement;
