use crate::compiler::{CompilerDisplay, CompilerDisplayError, Source};

/// Errors which can be encountered while tokenizing a compilation unit
#[derive(Clone, Debug, PartialEq)]
pub enum LexerError {
    UnexpectedCharacter(char),
    UnterminatedString,
    UnterminatedComment,
    InvalidEscapeSequence(char),
    InvalidNumber(String),
    UnknownLocation(String, Vec<String>),
    UnknownAction(String, Vec<String>),
    /// A `#define` header may only contain macro names
    InvalidDefineHeader(String),
    MissingMacroName,
    NestedDefine,
    /// A `{` or `}` which does not open or close a define body
    UnexpectedBrace(char),
    UnterminatedDefineHeader,
    UnterminatedDefineBody,
}

fn did_you_mean(alternatives: &[String]) -> String {
    if alternatives.is_empty() {
        String::new()
    } else {
        format!("\n  Did you mean {}", alternatives.join(", "))
    }
}

impl CompilerDisplay for LexerError {
    fn fmt(&self, _: &Source) -> Result<String, CompilerDisplayError> {
        use LexerError::*;
        let msg = match self {
            UnexpectedCharacter(c) => format!("Unexpected character {:?}", c),
            UnterminatedString => format!("Unterminated string"),
            UnterminatedComment => format!("Unterminated block comment"),
            InvalidEscapeSequence(c) => format!("Invalid escape sequence \\{}", c),
            InvalidNumber(text) => format!("Invalid number {}", text),
            UnknownLocation(name, alts) => {
                format!("Unknown location {}{}", name, did_you_mean(alts))
            }
            UnknownAction(name, alts) => format!("Unknown action !{}{}", name, did_you_mean(alts)),
            InvalidDefineHeader(text) => format!(
                "Define header can only contain the name of the macro and its arguments, found {}",
                text
            ),
            MissingMacroName => format!("No name set in define"),
            NestedDefine => format!("Cannot define a macro inside of a define"),
            UnexpectedBrace(c) => format!("Unexpected {}", c),
            UnterminatedDefineHeader => format!("Unterminated define header"),
            UnterminatedDefineBody => format!("Unterminated define body"),
        };

        Ok(msg)
    }
}
