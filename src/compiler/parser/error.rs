use crate::compiler::lexer::TokenKind;
use crate::compiler::{CompilerDisplay, CompilerDisplayError, Source};

/// Compiler errors that happen within the Parser stage of compilation.
#[derive(Clone, Debug, PartialEq)]
pub enum ParserError {
    ExpectedButFound(Vec<TokenKind>, Option<TokenKind>),
    /// A token which cannot begin a statement
    UnexpectedToken(TokenKind),
    UnknownLocation(String),
    /// A location which cannot be read, with whether it had a literal
    InvalidSourceLocation(String, bool),
    /// A location which cannot be written, with whether it had a literal
    InvalidDestinationLocation(String, bool),
    InvalidRegisterActionTarget(Option<String>),
    UnpairedPop,
    LabelledLabel(String),
    DuplicateLabel(String),
    DanglingLabel(String),
    /// A string or array which is not named by a label
    UnlabelledData,
    /// The explicit length and the number of elements given
    LengthTooShort(usize, usize),
    /// The explicit length and the largest length allowed
    LengthTooLong(usize, usize),
    LiteralTooDeep,
}

fn describe(kind: &Option<TokenKind>) -> String {
    match kind {
        Some(kind) => format!("{}", kind),
        None => "EOF".into(),
    }
}

impl CompilerDisplay for ParserError {
    fn fmt(&self, _: &Source) -> Result<String, CompilerDisplayError> {
        use ParserError::*;
        let msg = match self {
            ExpectedButFound(expected, found) => {
                let expected: Vec<String> = expected.iter().map(|k| format!("{}", k)).collect();
                format!(
                    "Expected {} but found {}",
                    expected.join(" or "),
                    describe(found)
                )
            }
            UnexpectedToken(kind) => format!("Unexpected {}, expected a statement", kind),
            UnknownLocation(name) => format!("Unknown location {}", name),
            InvalidSourceLocation(name, true) => {
                format!("Cannot read from {} with an index", name)
            }
            InvalidSourceLocation(name, false) => format!("Cannot read from {}", name),
            InvalidDestinationLocation(name, true) => {
                format!("Cannot write to {} with an index", name)
            }
            InvalidDestinationLocation(name, false) => format!("Cannot write to {}", name),
            InvalidRegisterActionTarget(Some(found)) => {
                format!("Expected a register (a, b, c, d) but found {}", found)
            }
            InvalidRegisterActionTarget(None) => {
                "Expected a register (a, b, c, d) after the operator".into()
            }
            UnpairedPop => "#pop without a matching #push".into(),
            LabelledLabel(name) => format!("Cannot label a label ({})", name),
            DuplicateLabel(key) => format!("Label {} is already defined", key),
            DanglingLabel(name) => format!("Label {} does not name a statement", name),
            UnlabelledData => "Data must be named by a label".into(),
            LengthTooShort(length, count) => format!(
                "Length {} is shorter than the {} elements given",
                length, count
            ),
            LengthTooLong(length, max) => format!(
                "Length {} is longer than the {} words any machine can address",
                length, max
            ),
            LiteralTooDeep => "Literal is nested too deeply".into(),
        };
        Ok(msg)
    }
}
