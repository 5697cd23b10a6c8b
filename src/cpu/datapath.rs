use serde::Serialize;

use crate::compiler::arch::{Word, WordSize};

use super::components::{CombinatorId, Components, RegisterId};
use super::memory::Memory;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Flags {
    pub running: bool,
    /// Set by a false condition; the next instruction is skipped
    pub skip: bool,
    pub zero: bool,
    pub carry: bool,
}

impl Flags {
    pub fn clear(&mut self) {
        *self = Flags::default();
    }
}

/// Everything the micro states operate on.
#[derive(Clone, Debug)]
pub struct Datapath {
    pub word_size: WordSize,
    pub flags: Flags,
    pub components: Components,
    pub memory: Memory,
    /// Every value written to `out`
    pub outputs: Vec<Word>,
}

impl Datapath {
    pub fn new(word_size: WordSize, memory_size: usize) -> Datapath {
        Datapath {
            word_size,
            flags: Flags::default(),
            components: Components::new(word_size),
            memory: Memory::new(memory_size),
            outputs: vec![],
        }
    }

    pub fn get(&self, id: RegisterId) -> Word {
        self.components.get(id)
    }

    pub fn set(&mut self, id: RegisterId, value: Word) {
        self.components.set(id, value)
    }

    /// Reads the output of a combinator.  ALU outputs set the carry flag when
    /// the result had to be wrapped into the word and the zero flag when the
    /// wrapped result is zero.
    pub fn read_combinator(&mut self, c: CombinatorId) -> Word {
        let (value, wrapped) = self.word_size.wrap(self.components.combine(c));
        if c.sets_flags() {
            self.flags.carry = wrapped;
            self.flags.zero = value == 0;
        }
        value
    }

    /// The output of a combinator, without touching the flags
    pub fn peek_combinator(&self, c: CombinatorId) -> Word {
        self.word_size.wrap(self.components.combine(c)).0
    }

    /// Moves the program counter to the next word.
    pub fn advance_pc(&mut self) {
        self.components.offset(RegisterId::Pc, 1)
    }
}
