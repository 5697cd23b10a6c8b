mod error;
mod lexer;
mod suggest;
mod tests;
pub mod tokens;

pub use error::LexerError;
pub use lexer::{tokenize, Lexer, LexerOutput};
pub use suggest::suggest;
pub use tokens::{Token, TokenKind};

use super::CompilerError;

pub type LexerResult<T> = std::result::Result<T, CompilerError<LexerError>>;
