use serde::Serialize;

use crate::compiler::arch::{GeneralRegister, RegisterOp, Word, WordSize};

/// Every register in the datapath.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RegisterId {
    /// Holds the value being moved
    BusBuffer,
    /// Holds the instruction being executed
    InstBuffer,
    A,
    B,
    C,
    D,
    Pc,
    /// The source operand of a movement
    M,
    /// The destination operand of a movement
    N,
    /// The stack pointer
    Stack,
    /// Holds a value read from or about to be written to memory
    MemoryBuffer,
}

impl RegisterId {
    pub const ALL: [RegisterId; 11] = [
        RegisterId::BusBuffer,
        RegisterId::InstBuffer,
        RegisterId::A,
        RegisterId::B,
        RegisterId::C,
        RegisterId::D,
        RegisterId::Pc,
        RegisterId::M,
        RegisterId::N,
        RegisterId::Stack,
        RegisterId::MemoryBuffer,
    ];

    fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            RegisterId::BusBuffer => "bus",
            RegisterId::InstBuffer => "inst",
            RegisterId::A => "a",
            RegisterId::B => "b",
            RegisterId::C => "c",
            RegisterId::D => "d",
            RegisterId::Pc => "pc",
            RegisterId::M => "m",
            RegisterId::N => "n",
            RegisterId::Stack => "stack",
            RegisterId::MemoryBuffer => "mem",
        }
    }
}

impl From<GeneralRegister> for RegisterId {
    fn from(reg: GeneralRegister) -> Self {
        match reg {
            GeneralRegister::A => RegisterId::A,
            GeneralRegister::B => RegisterId::B,
            GeneralRegister::C => RegisterId::C,
            GeneralRegister::D => RegisterId::D,
        }
    }
}

/// The combinational units of the datapath.  Each computes a function of two
/// registers whenever it is read; nothing is cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CombinatorId {
    Adder,
    Subtractor,
    And,
    Or,
    Xor,
    /// `stack + m`, the address of a stack read
    StackReadAddress,
    /// `stack + n`, the address of a stack write
    StackWriteAddress,
}

impl CombinatorId {
    pub const ALL: [CombinatorId; 7] = [
        CombinatorId::Adder,
        CombinatorId::Subtractor,
        CombinatorId::And,
        CombinatorId::Or,
        CombinatorId::Xor,
        CombinatorId::StackReadAddress,
        CombinatorId::StackWriteAddress,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CombinatorId::Adder => "sum",
            CombinatorId::Subtractor => "sub",
            CombinatorId::And => "and",
            CombinatorId::Or => "or",
            CombinatorId::Xor => "xor",
            CombinatorId::StackReadAddress => "stack+m",
            CombinatorId::StackWriteAddress => "stack+n",
        }
    }

    pub fn operands(&self) -> (RegisterId, RegisterId) {
        match self {
            CombinatorId::StackReadAddress => (RegisterId::Stack, RegisterId::M),
            CombinatorId::StackWriteAddress => (RegisterId::Stack, RegisterId::N),
            _ => (RegisterId::A, RegisterId::B),
        }
    }

    /// The unmasked result
    pub fn apply(&self, x: Word, y: Word) -> i64 {
        let (x, y) = (x as i64, y as i64);
        match self {
            CombinatorId::Adder
            | CombinatorId::StackReadAddress
            | CombinatorId::StackWriteAddress => x + y,
            CombinatorId::Subtractor => x - y,
            CombinatorId::And => x & y,
            CombinatorId::Or => x | y,
            CombinatorId::Xor => x ^ y,
        }
    }

    /// Only the ALU outputs update the zero and carry flags; address
    /// computation does not.
    pub fn sets_flags(&self) -> bool {
        !matches!(
            self,
            CombinatorId::StackReadAddress | CombinatorId::StackWriteAddress
        )
    }
}

/// The register file.  Every value is kept inside the word size.
#[derive(Clone, Debug, PartialEq)]
pub struct Components {
    word_size: WordSize,
    registers: [Word; 11],
}

impl Components {
    pub fn new(word_size: WordSize) -> Components {
        Components {
            word_size,
            registers: [0; 11],
        }
    }

    pub fn get(&self, id: RegisterId) -> Word {
        self.registers[id.index()]
    }

    pub fn set(&mut self, id: RegisterId, value: Word) {
        self.registers[id.index()] = value & self.word_size.mask();
    }

    pub fn clear(&mut self) {
        self.registers = [0; 11];
    }

    /// Adds `delta` to a register, wrapping around the word size.
    pub fn offset(&mut self, id: RegisterId, delta: i64) {
        let (value, _) = self.word_size.wrap(self.get(id) as i64 + delta);
        self.set(id, value);
    }

    /// Applies a register action in place.
    pub fn apply(&mut self, op: RegisterOp, id: RegisterId) {
        let value = self.get(id);
        match op {
            RegisterOp::Increment => self.offset(id, 1),
            RegisterOp::Decrement => self.offset(id, -1),
            RegisterOp::ShiftLeft => self.set(id, value << 1),
            RegisterOp::ShiftRight => self.set(id, value >> 1),
            RegisterOp::Invert => self.set(id, !value),
        }
    }

    /// The unmasked output of a combinator
    pub fn combine(&self, c: CombinatorId) -> i64 {
        let (x, y) = c.operands();
        c.apply(self.get(x), self.get(y))
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegisterId, Word)> + '_ {
        RegisterId::ALL.iter().map(move |id| (*id, self.get(*id)))
    }
}
