//! This module abstracts out the source code from which the compiler derives
//! its input data.  Every token, statement, and diagnostic carries a [`Span`]
//! which points back into the [`Source`] it was read from.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

mod source;

pub use source::Source;

/// A point in the source text. Both fields are zero based; they are shown to
/// the user one based.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Position {
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}:{}", self.line + 1, self.column + 1))
    }
}

/// A half open range `[from, to)` of the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    from: Position,
    to: Position,
}

impl Span {
    pub fn new(from: Position, to: Position) -> Span {
        Span { from, to }
    }

    /// A zero length span at the start of the source.
    pub fn zero() -> Span {
        Span::default()
    }

    pub fn from(&self) -> Position {
        self.from
    }

    pub fn to(&self) -> Position {
        self.to
    }

    /// Returns the smallest span which covers both `a` and `b`.
    pub fn cover(a: Span, b: Span) -> Span {
        let from = if a.from <= b.from { a.from } else { b.from };
        let to = if a.to >= b.to { a.to } else { b.to };
        Span::new(from, to)
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("[{}, {}]", self.from, self.to))
    }
}

/// Implemented by anything which was derived from a region of source code.
pub trait SourceIr {
    fn span(&self) -> Span;
}
