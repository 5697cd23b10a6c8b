mod error;
mod labels;
mod parser;
mod tests;
mod tokenstream;

pub use error::ParserError;
pub use labels::LabelScopeStack;
pub use parser::{parse, ParserOutput, MAX_LITERAL_DEPTH, MAX_LITERAL_LENGTH};
pub use tokenstream::TokenStream;

use crate::compiler::CompilerError;

pub type ParserResult<T> = std::result::Result<T, CompilerError<ParserError>>;
