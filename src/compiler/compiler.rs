use log::debug;

use super::arch::WordSize;
use super::assembler::{self, AssembledOutput};
use super::ast::Program;
use super::diagnostics::{Annotation, Diagnostic, Stage};
use super::{lexer, macros, parser, semantics, Source};

/// A successful compilation
#[derive(Debug)]
pub struct CompileOutput {
    pub output: AssembledOutput,
    /// Notes on what the compiler did to the source, such as macro expansions
    pub annotations: Vec<Annotation>,
}

/// Compiles `src` into a memory image for a machine with the given word size.
/// Returns every diagnostic found if any stage reported a problem.
pub fn compile(src: &Source, word_size: WordSize) -> Result<CompileOutput, Vec<Diagnostic>> {
    let front = front_end(src, Stage::Semantics);
    if !front.diagnostics.is_empty() {
        debug!("Compilation failed with {} diagnostics", front.diagnostics.len());
        return Err(front.diagnostics);
    }

    let program = front
        .program
        .expect("The front end produces a program when run through semantics");
    let output = assembler::link(&program, word_size).map_err(|e| vec![e.into()])?;
    debug!("Compiled {} words", output.len());

    Ok(CompileOutput {
        output,
        annotations: front.annotations,
    })
}

/// Runs the compiler up to and including `stop` and returns the diagnostics
/// found along the way.
pub fn check(src: &Source, word_size: WordSize, stop: Stage) -> Vec<Diagnostic> {
    if stop == Stage::Assembler {
        compile(src, word_size).err().unwrap_or_default()
    } else {
        front_end(src, stop).diagnostics
    }
}

struct FrontEnd {
    program: Option<Program>,
    annotations: Vec<Annotation>,
    diagnostics: Vec<Diagnostic>,
}

/// Runs every stage before the assembler, stopping after `stop`.
fn front_end(src: &Source, stop: Stage) -> FrontEnd {
    let mut diagnostics: Vec<Diagnostic> = vec![];

    let lexed = lexer::tokenize(src.text());
    diagnostics.extend(lexed.errors.into_iter().map(Diagnostic::from));
    if stop == Stage::Lexer {
        return FrontEnd {
            program: None,
            annotations: vec![],
            diagnostics,
        };
    }

    let expanded = macros::expand(&lexed.tokens, lexed.macros);
    diagnostics.extend(expanded.errors.into_iter().map(Diagnostic::from));
    if stop == Stage::Macros {
        return FrontEnd {
            program: None,
            annotations: expanded.annotations,
            diagnostics,
        };
    }

    let mut parsed = parser::parse(&expanded.tokens);
    diagnostics.extend(parsed.errors.into_iter().map(Diagnostic::from));
    if stop != Stage::Parser {
        let errors = semantics::resolve(&mut parsed.program);
        diagnostics.extend(errors.into_iter().map(Diagnostic::from));
    }

    FrontEnd {
        program: Some(parsed.program),
        annotations: expanded.annotations,
        diagnostics,
    }
}
