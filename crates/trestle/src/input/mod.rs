//! Input layer: delimited-text parsing and column type inference.

mod infer;
mod parser;

pub use infer::{build_column, is_null_value};
pub use parser::{Parser, ParserConfig};
