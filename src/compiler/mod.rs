/**
 * The compiler turns S9B assembly text into a memory image for the S9B CPU.
 *
 * It runs as a pipeline of stages, each of which consumes the output of the
 * previous one:
 *
 * 1. The Lexer converts the text into tokens and captures `#define`d macros.
 * 2. The Macro Expander rewrites macro calls into their bodies.
 * 3. The Parser builds the statement arena and assigns labels to nested
 * label scopes.
 * 4. The Semantic stage resolves every reference to the statement it names.
 * 5. The Assembler encodes statements into words and links addresses.
 *
 * Stages 1 through 4 accumulate every problem they find as a diagnostic and
 * keep going, so that a single compile reports as much as possible.  The
 * Assembler only runs on a program with no diagnostics; any error it finds
 * other than the program not fitting in memory is a bug in the compiler and
 * panics.
 */

/// Construct an `Err` holding a `CompilerError` for the given span.
macro_rules! err {
    ($span: expr, $kind: expr) => {
        Err($crate::compiler::CompilerError::new($span, $kind))
    };
}

pub mod arch;
pub mod assembler;
pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod semantics;
pub mod source;

mod compiler;
mod error;

pub use compiler::{check, compile, CompileOutput};
pub use diagnostics::{Annotation, Diagnostic, Stage};
pub use error::{CompilerDisplay, CompilerDisplayError, CompilerError};
pub use source::{Position, Source, SourceIr, Span};
