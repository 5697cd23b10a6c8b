//! Everything the compiler reports back to the user about a compilation:
//! the accumulated diagnostics of every stage, and annotations which
//! describe what the compiler did to the source (e.g. what a macro call
//! expanded to).

use serde::Serialize;

use super::lexer::LexerError;
use super::macros::MacroError;
use super::parser::ParserError;
use super::semantics::LinkError;
use super::source::{SourceIr, Span};
use super::{CompilerDisplay, CompilerDisplayError, CompilerError, Source};


/// A note attached to a region of source, for tooling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Annotation {
    pub span: Span,
    pub text: String,
}

impl Annotation {
    pub fn new(span: Span, text: &str) -> Annotation {
        Annotation {
            span,
            text: text.into(),
        }
    }
}

/// The stage of the compiler which raised a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Lexer,
    Macros,
    Parser,
    Semantics,
    Assembler,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Lexer => "lexer",
            Stage::Macros => "macros",
            Stage::Parser => "parser",
            Stage::Semantics => "semantics",
            Stage::Assembler => "assembler",
        };
        f.write_str(s)
    }
}

/// A user facing problem found by any stage of compilation.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    Lexer(CompilerError<LexerError>),
    Macro(CompilerError<MacroError>),
    Parser(CompilerError<ParserError>),
    Link(CompilerError<LinkError>),
}

impl Diagnostic {
    pub fn stage(&self) -> Stage {
        match self {
            Diagnostic::Lexer(_) => Stage::Lexer,
            Diagnostic::Macro(_) => Stage::Macros,
            Diagnostic::Parser(_) => Stage::Parser,
            Diagnostic::Link(e) => match e.inner() {
                LinkError::ProgramTooLarge(..) => Stage::Assembler,
                _ => Stage::Semantics,
            },
        }
    }
}

impl SourceIr for Diagnostic {
    fn span(&self) -> Span {
        match self {
            Diagnostic::Lexer(e) => e.span(),
            Diagnostic::Macro(e) => e.span(),
            Diagnostic::Parser(e) => e.span(),
            Diagnostic::Link(e) => e.span(),
        }
    }
}

impl CompilerDisplay for Diagnostic {
    fn fmt(&self, src: &Source) -> Result<String, CompilerDisplayError> {
        let msg = match self {
            Diagnostic::Lexer(e) => e.fmt(src)?,
            Diagnostic::Macro(e) => e.fmt(src)?,
            Diagnostic::Parser(e) => e.fmt(src)?,
            Diagnostic::Link(e) => e.fmt(src)?,
        };
        Ok(format!("{} error {}", self.stage(), msg))
    }
}

impl From<CompilerError<LexerError>> for Diagnostic {
    fn from(e: CompilerError<LexerError>) -> Self {
        Diagnostic::Lexer(e)
    }
}

impl From<CompilerError<MacroError>> for Diagnostic {
    fn from(e: CompilerError<MacroError>) -> Self {
        Diagnostic::Macro(e)
    }
}

impl From<CompilerError<ParserError>> for Diagnostic {
    fn from(e: CompilerError<ParserError>) -> Self {
        Diagnostic::Parser(e)
    }
}

impl From<CompilerError<LinkError>> for Diagnostic {
    fn from(e: CompilerError<LinkError>) -> Self {
        Diagnostic::Link(e)
    }
}
