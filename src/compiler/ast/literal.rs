use crate::compiler::source::{SourceIr, Span};

use super::RefId;

/// A value written in the source: an operand of a movement or the contents
/// of named data.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(Span, u32),
    Text(Span, String),
    Array(Span, Vec<Literal>),
    /// A label reference.  The reference table holds its resolution.
    Reference(Span, RefId),
}

impl SourceIr for Literal {
    fn span(&self) -> Span {
        match self {
            Literal::Number(span, _)
            | Literal::Text(span, _)
            | Literal::Array(span, _)
            | Literal::Reference(span, _) => *span,
        }
    }
}

impl Literal {
    /// The number of words this literal occupies when emitted as data
    pub fn data_len(&self) -> usize {
        match self {
            Literal::Number(..) | Literal::Reference(..) => 1,
            // Strings are terminated by a NUL word
            Literal::Text(_, text) => text.chars().count() + 1,
            Literal::Array(_, elements) => elements.iter().map(|e| e.data_len()).sum(),
        }
    }
}
