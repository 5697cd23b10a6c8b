/**
 * Arch contains the description of the S9B instruction set: the bit layout
 * of an instruction word, the codes assigned to every location, condition
 * target, and action, and the arithmetic of a word of configurable width.
 * Both the assembler (which encodes) and the CPU (which decodes) read these
 * tables so the two can never disagree.
 */
pub mod locations;
pub mod opcodes;
pub mod registers;

pub use locations::{DestinationLocation, SourceLocation, VALID_LOCATIONS};
pub use opcodes::{
    ConditionTarget, ControlAction, RegisterOp, CONDITION_INVERT, CONDITION_OR, VALID_ACTIONS,
};
pub use registers::GeneralRegister;

/// A machine word.  Only the low `WordSize::bits` bits are ever set.
pub type Word = u32;

/// Type tag of a movement instruction
pub const MOVEMENT: Word = 0b1_0000_0000;
/// Type tag of a condition instruction
pub const CONDITION: Word = 0b0_1000_0000;
/// Type tag of an action instruction
pub const ACTION: Word = 0b0_0100_0000;

/// Bits of a movement instruction which hold the source location
pub const SOURCE_LOCATION_SPAN: Word = 0b1111_0000;
/// Bits of a movement instruction which hold the destination location
pub const DESTINATION_LOCATION_SPAN: Word = 0b0000_1111;

/// Bits of an action instruction which select the register operation
pub const ACTION_TYPE_SPAN: Word = 0b0001_1100;
/// Bits of an action instruction which select the target register
pub const ACTION_TARGET_SPAN: Word = 0b0000_0011;

/// The smallest word the instruction layout fits in.
pub const MIN_WORD_BITS: u32 = 9;
pub const MAX_WORD_BITS: u32 = 16;

/// The three kinds of instruction, distinguished by their type tag bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionType {
    Movement,
    Condition,
    Action,
}

impl InstructionType {
    /// Classify an instruction word by its type tag.  The tags are checked
    /// from the highest bit down, so a condition with its OR bit set is still
    /// a condition.
    pub fn classify(inst: Word) -> Option<InstructionType> {
        if inst & MOVEMENT != 0 {
            Some(InstructionType::Movement)
        } else if inst & CONDITION != 0 {
            Some(InstructionType::Condition)
        } else if inst & ACTION != 0 {
            Some(InstructionType::Action)
        } else {
            None
        }
    }
}

impl std::fmt::Display for InstructionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstructionType::Movement => f.write_str("movement"),
            InstructionType::Condition => f.write_str("condition"),
            InstructionType::Action => f.write_str("action"),
        }
    }
}

/// The width of a machine word.  The number of distinct values is always a
/// power of two so that wrapping is a mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordSize {
    bits: u32,
}

impl WordSize {
    pub fn new(bits: u32) -> Option<WordSize> {
        if (MIN_WORD_BITS..=MAX_WORD_BITS).contains(&bits) {
            Some(WordSize { bits })
        } else {
            None
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of distinct values a word can hold
    pub fn size(&self) -> Word {
        1 << self.bits
    }

    pub fn mask(&self) -> Word {
        self.size() - 1
    }

    /// Brings `value` into `[0, size)`.  The flag is true when the value had
    /// to be masked, which is how the ALU derives its carry.
    pub fn wrap(&self, value: i64) -> (Word, bool) {
        if value >= 0 && value < self.size() as i64 {
            (value as Word, false)
        } else {
            ((value & self.mask() as i64) as Word, true)
        }
    }
}

impl Default for WordSize {
    fn default() -> Self {
        WordSize {
            bits: MIN_WORD_BITS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_size_bounds() {
        assert!(WordSize::new(8).is_none());
        assert!(WordSize::new(17).is_none());
        let ws = WordSize::new(9).unwrap();
        assert_eq!(ws.size(), 512);
        assert_eq!(ws.mask(), 511);
    }

    #[test]
    fn wrap_sets_carry_outside_range() {
        let ws = WordSize::default();
        assert_eq!(ws.wrap(5), (5, false));
        assert_eq!(ws.wrap(515), (3, true));
        assert_eq!(ws.wrap(-1), (511, true));
        assert_eq!(ws.wrap(512), (0, true));
    }

    #[test]
    fn classify_by_highest_tag() {
        assert_eq!(InstructionType::classify(0b1_0000_0000), Some(InstructionType::Movement));
        assert_eq!(InstructionType::classify(0b0_1100_0001), Some(InstructionType::Condition));
        assert_eq!(InstructionType::classify(0b0_0100_0010), Some(InstructionType::Action));
        assert_eq!(InstructionType::classify(0), None);
    }
}
