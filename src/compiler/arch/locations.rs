use super::Word;

/// Every name the lexer accepts as a location keyword.  Immediate indexed
/// variants (`stack$`, `mem$`, ...) share the name of their plain form.
pub const VALID_LOCATIONS: [&str; 19] = [
    "a", "b", "c", "d", "sum", "sub", "and", "or", "xor", "stackptr", "stack", "mem", "zero",
    "m", "n", "pc", "push", "out", "nul",
];

/// Where a movement instruction reads its value from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceLocation {
    Zero,
    Sum,
    Sub,
    And,
    Or,
    Xor,
    /// Memory at the address given by the immediate operand
    MemImmediate,
    /// Memory at the address held in M
    Mem,
    /// Stack relative, offset by the immediate operand
    StackImmediate,
    /// Stack relative, offset by M
    Stack,
    A,
    B,
    C,
    D,
    /// The address of a stack slot: stack pointer plus the immediate operand
    StackPtrImmediate,
    /// The immediate operand itself (`$`)
    Immediate,
}

impl SourceLocation {
    /// All source locations in order of their code
    pub const ALL: [SourceLocation; 16] = [
        SourceLocation::Zero,
        SourceLocation::Sum,
        SourceLocation::Sub,
        SourceLocation::And,
        SourceLocation::Or,
        SourceLocation::Xor,
        SourceLocation::MemImmediate,
        SourceLocation::Mem,
        SourceLocation::StackImmediate,
        SourceLocation::Stack,
        SourceLocation::A,
        SourceLocation::B,
        SourceLocation::C,
        SourceLocation::D,
        SourceLocation::StackPtrImmediate,
        SourceLocation::Immediate,
    ];

    /// The code of this location, already shifted into bits 4-7.
    pub fn code(&self) -> Word {
        match self {
            SourceLocation::Zero => 0,
            SourceLocation::Sum => 16,
            SourceLocation::Sub => 32,
            SourceLocation::And => 48,
            SourceLocation::Or => 64,
            SourceLocation::Xor => 80,
            SourceLocation::MemImmediate => 96,
            SourceLocation::Mem => 112,
            SourceLocation::StackImmediate => 128,
            SourceLocation::Stack => 144,
            SourceLocation::A => 160,
            SourceLocation::B => 176,
            SourceLocation::C => 192,
            SourceLocation::D => 208,
            SourceLocation::StackPtrImmediate => 224,
            SourceLocation::Immediate => 240,
        }
    }

    pub fn from_code(code: Word) -> Option<SourceLocation> {
        Self::ALL.iter().find(|l| l.code() == code).copied()
    }

    /// Looks up the location named `name`.  `immediate` selects the `$`
    /// variant, which is used when the location is followed by a literal.
    pub fn from_name(name: &str, immediate: bool) -> Option<SourceLocation> {
        use SourceLocation::*;
        let loc = match (name, immediate) {
            ("zero", false) => Zero,
            ("sum", false) => Sum,
            ("sub", false) => Sub,
            ("and", false) => And,
            ("or", false) => Or,
            ("xor", false) => Xor,
            ("mem", true) => MemImmediate,
            ("mem", false) => Mem,
            ("stack", true) => StackImmediate,
            ("stack", false) => Stack,
            ("a", false) => A,
            ("b", false) => B,
            ("c", false) => C,
            ("d", false) => D,
            ("stackptr", true) => StackPtrImmediate,
            _ => return None,
        };
        Some(loc)
    }

    /// True if the instruction carries an extra word for this operand.
    pub fn is_immediate(&self) -> bool {
        matches!(
            self,
            SourceLocation::MemImmediate
                | SourceLocation::StackImmediate
                | SourceLocation::StackPtrImmediate
                | SourceLocation::Immediate
        )
    }

    /// True if the value is read through the memory buffer.
    pub fn reads_memory(&self) -> bool {
        matches!(
            self,
            SourceLocation::MemImmediate
                | SourceLocation::Mem
                | SourceLocation::StackImmediate
                | SourceLocation::Stack
        )
    }

    pub fn is_stack_relative(&self) -> bool {
        matches!(
            self,
            SourceLocation::StackImmediate | SourceLocation::Stack
        )
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SourceLocation::Zero => "zero",
            SourceLocation::Sum => "sum",
            SourceLocation::Sub => "sub",
            SourceLocation::And => "and",
            SourceLocation::Or => "or",
            SourceLocation::Xor => "xor",
            SourceLocation::MemImmediate => "mem$",
            SourceLocation::Mem => "mem",
            SourceLocation::StackImmediate => "stack$",
            SourceLocation::Stack => "stack",
            SourceLocation::A => "a",
            SourceLocation::B => "b",
            SourceLocation::C => "c",
            SourceLocation::D => "d",
            SourceLocation::StackPtrImmediate => "stackptr$",
            SourceLocation::Immediate => "$",
        };
        f.write_str(s)
    }
}

/// Where a movement instruction writes its value to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DestinationLocation {
    /// Discards the value
    Nul,
    MemImmediate,
    Mem,
    StackImmediate,
    Stack,
    Push,
    A,
    B,
    C,
    D,
    M,
    N,
    Pc,
    Out,
}

impl DestinationLocation {
    pub const ALL: [DestinationLocation; 14] = [
        DestinationLocation::Nul,
        DestinationLocation::MemImmediate,
        DestinationLocation::Mem,
        DestinationLocation::StackImmediate,
        DestinationLocation::Stack,
        DestinationLocation::Push,
        DestinationLocation::A,
        DestinationLocation::B,
        DestinationLocation::C,
        DestinationLocation::D,
        DestinationLocation::M,
        DestinationLocation::N,
        DestinationLocation::Pc,
        DestinationLocation::Out,
    ];

    /// The code of this location in bits 0-3.
    pub fn code(&self) -> Word {
        match self {
            DestinationLocation::Nul => 0,
            DestinationLocation::MemImmediate => 1,
            DestinationLocation::Mem => 2,
            DestinationLocation::StackImmediate => 3,
            DestinationLocation::Stack => 4,
            DestinationLocation::Push => 5,
            DestinationLocation::A => 6,
            DestinationLocation::B => 7,
            DestinationLocation::C => 8,
            DestinationLocation::D => 9,
            DestinationLocation::M => 10,
            DestinationLocation::N => 11,
            DestinationLocation::Pc => 12,
            DestinationLocation::Out => 13,
        }
    }

    pub fn from_code(code: Word) -> Option<DestinationLocation> {
        Self::ALL.iter().find(|l| l.code() == code).copied()
    }

    pub fn from_name(name: &str, immediate: bool) -> Option<DestinationLocation> {
        use DestinationLocation::*;
        let loc = match (name, immediate) {
            ("nul", false) => Nul,
            ("mem", true) => MemImmediate,
            ("mem", false) => Mem,
            ("stack", true) => StackImmediate,
            ("stack", false) => Stack,
            ("push", false) => Push,
            ("a", false) => A,
            ("b", false) => B,
            ("c", false) => C,
            ("d", false) => D,
            ("m", false) => M,
            ("n", false) => N,
            ("pc", false) => Pc,
            ("out", false) => Out,
            _ => return None,
        };
        Some(loc)
    }

    pub fn is_immediate(&self) -> bool {
        matches!(
            self,
            DestinationLocation::MemImmediate | DestinationLocation::StackImmediate
        )
    }

    /// True if the value is committed to memory in a separate flush step.
    pub fn writes_memory(&self) -> bool {
        matches!(
            self,
            DestinationLocation::MemImmediate
                | DestinationLocation::Mem
                | DestinationLocation::StackImmediate
                | DestinationLocation::Stack
                | DestinationLocation::Push
        )
    }
}

impl std::fmt::Display for DestinationLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DestinationLocation::Nul => "nul",
            DestinationLocation::MemImmediate => "mem$",
            DestinationLocation::Mem => "mem",
            DestinationLocation::StackImmediate => "stack$",
            DestinationLocation::Stack => "stack",
            DestinationLocation::Push => "push",
            DestinationLocation::A => "a",
            DestinationLocation::B => "b",
            DestinationLocation::C => "c",
            DestinationLocation::D => "d",
            DestinationLocation::M => "m",
            DestinationLocation::N => "n",
            DestinationLocation::Pc => "pc",
            DestinationLocation::Out => "out",
        };
        f.write_str(s)
    }
}
