use std::collections::BTreeMap;

use serde::Serialize;

use crate::compiler::arch::Word;
use crate::compiler::ast::StatementId;
use crate::compiler::source::Position;

/// A label and the address it was placed at
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Symbol {
    pub label: String,
    pub address: Word,
    pub position: Position,
}

/// The memory image produced by the assembler.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AssembledOutput {
    pub word_bits: u32,
    pub words: Vec<Word>,
    /// The first address emitted for each statement
    #[serde(skip)]
    pub addresses: BTreeMap<StatementId, Word>,
    /// The statement which emitted each word, if any
    #[serde(skip)]
    pub statement_at: Vec<Option<StatementId>>,
    pub symbols: Vec<Symbol>,
}

impl AssembledOutput {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn address_of(&self, id: StatementId) -> Option<Word> {
        self.addresses.get(&id).copied()
    }

    pub fn statement_at(&self, address: Word) -> Option<StatementId> {
        self.statement_at.get(address as usize).copied().flatten()
    }

    /// Looks up a symbol by its label key
    pub fn symbol(&self, label: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.label == label)
    }
}
