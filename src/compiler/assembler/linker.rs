use std::collections::{BTreeMap, VecDeque};

use log::{debug, trace, warn};

use crate::compiler::arch::{Word, WordSize};
use crate::compiler::ast::{Literal, Program, Resolution, StatementId, StatementKind};
use crate::compiler::semantics::LinkError;
use crate::compiler::source::{SourceIr, Span};
use crate::compiler::CompilerError;

use super::encoder::{encode, operands};
use super::output::{AssembledOutput, Symbol};

/// What a placeholder word is patched with
enum Target<'p> {
    /// The address of a statement or named data
    Statement(StatementId),
    /// The address of inline data, placed when the item is processed
    Anonymous(&'p Literal),
}

struct WorkItem<'p> {
    address: usize,
    target: Target<'p>,
}

/// Lays out a resolved program in memory.
///
/// Panics if a reference is unresolved: resolution errors must stop
/// compilation before linking.
pub fn link(program: &Program, word_size: WordSize) -> Result<AssembledOutput, CompilerError<LinkError>> {
    let mut linker = Linker::new(program, word_size);

    for (id, stmt) in program.instructions() {
        linker.emit_instruction(id, &stmt.kind);
    }
    let code_size = linker.words.len();

    while let Some(item) = linker.work.pop_front() {
        let value = match item.target {
            Target::Statement(id) => linker.address_of(id),
            Target::Anonymous(lit) => linker.emit_data(lit, None),
        };
        trace!("Patching {} with {}", item.address, value);
        linker.words[item.address] = value;
    }

    debug!(
        "Linked {} words of code and {} words of data",
        code_size,
        linker.words.len() - code_size
    );

    let max = word_size.size() as usize;
    if linker.words.len() > max {
        return err!(
            Span::zero(),
            LinkError::ProgramTooLarge(linker.words.len(), max)
        );
    }

    let symbols = linker.symbols();
    Ok(AssembledOutput {
        word_bits: word_size.bits(),
        words: linker.words,
        addresses: linker.addresses,
        statement_at: linker.statement_at,
        symbols,
    })
}

struct Linker<'p> {
    program: &'p Program,
    word_size: WordSize,
    words: Vec<Word>,
    addresses: BTreeMap<StatementId, Word>,
    statement_at: Vec<Option<StatementId>>,
    work: VecDeque<WorkItem<'p>>,
}

impl<'p> Linker<'p> {
    fn new(program: &'p Program, word_size: WordSize) -> Linker<'p> {
        Linker {
            program,
            word_size,
            words: vec![],
            addresses: BTreeMap::new(),
            statement_at: vec![],
            work: VecDeque::new(),
        }
    }

    fn push(&mut self, word: Word, owner: Option<StatementId>) -> usize {
        self.words.push(word);
        self.statement_at.push(owner);
        self.words.len() - 1
    }

    fn push_number(&mut self, n: Word, span: Span, owner: Option<StatementId>) {
        let (word, wrapped) = self.word_size.wrap(n as i64);
        if wrapped {
            warn!(
                "{}: {} does not fit in {} bits and was masked to {}",
                span.from(),
                n,
                self.word_size.bits(),
                word
            );
        }
        self.push(word, owner);
    }

    fn emit_instruction(&mut self, id: StatementId, kind: &'p StatementKind) {
        let word = encode(kind).expect("Only executable statements are emitted as instructions");
        let address = self.push(word, Some(id));
        self.addresses.insert(id, address as Word);
        trace!("{}: {:#011b} {}", address, word, self.program.display(id));

        for lit in operands(kind) {
            self.emit_operand(lit, id);
        }
    }

    /// Emits one immediate operand word
    fn emit_operand(&mut self, lit: &'p Literal, owner: StatementId) {
        match lit {
            Literal::Number(span, n) => self.push_number(*n, *span, Some(owner)),
            Literal::Reference(..) => self.emit_reference(lit, Some(owner)),
            Literal::Text(..) | Literal::Array(..) => {
                let address = self.push(0, Some(owner));
                self.work.push_back(WorkItem {
                    address,
                    target: Target::Anonymous(lit),
                });
            }
        }
    }

    fn emit_reference(&mut self, lit: &'p Literal, owner: Option<StatementId>) {
        let rid = match lit {
            Literal::Reference(_, rid) => *rid,
            _ => unreachable!("emit_reference is only given references"),
        };
        let program = self.program;
        let r = program.reference(rid);
        let target = match r.resolution {
            Resolution::Resolved(target) => target,
            Resolution::Unresolved { .. } => panic!(
                "Reference to {} at {} reached the linker unresolved",
                r.label,
                lit.span()
            ),
        };
        let address = self.push(0, owner);
        self.work.push_back(WorkItem {
            address,
            target: Target::Statement(target),
        });
    }

    /// The address of a statement, placing it first if it is named data which
    /// has not been referenced before.
    fn address_of(&mut self, id: StatementId) -> Word {
        if let Some(address) = self.addresses.get(&id) {
            return *address;
        }

        let program = self.program;
        match &program.statement(id).kind {
            StatementKind::Constant(lit) => self.emit_data(lit, Some(id)),
            _ => panic!(
                "Statement {} was never assigned an address",
                program.display(id)
            ),
        }
    }

    /// Places a literal at the end of the image and returns its address.
    fn emit_data(&mut self, lit: &'p Literal, owner: Option<StatementId>) -> Word {
        let address = self.words.len() as Word;
        if let Some(id) = owner {
            self.addresses.insert(id, address);
        }
        self.emit_data_words(lit, owner);
        address
    }

    fn emit_data_words(&mut self, lit: &'p Literal, owner: Option<StatementId>) {
        match lit {
            Literal::Number(span, n) => self.push_number(*n, *span, owner),
            Literal::Reference(..) => self.emit_reference(lit, owner),
            Literal::Text(span, text) => {
                for c in text.chars() {
                    self.push_number(c as Word, *span, owner);
                }
                self.push(0, owner);
            }
            // Nested arrays and strings are laid out inline
            Literal::Array(_, elements) => {
                for element in elements {
                    self.emit_data_words(element, owner);
                }
            }
        }
    }

    fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self
            .program
            .labels()
            .filter_map(|(key, id)| {
                self.addresses.get(&id).map(|address| Symbol {
                    label: key.into(),
                    address: *address,
                    position: self.program.statement(id).span.from(),
                })
            })
            .collect();
        symbols.sort_by(|a, b| a.address.cmp(&b.address).then_with(|| a.label.cmp(&b.label)));
        symbols
    }
}
