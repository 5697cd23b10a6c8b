use crate::compiler::arch::Word;

/// Faults which stop the machine.  A fault never leaves the machine in an
/// inconsistent state; a reset always recovers from one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CpuFault {
    /// The word at `address` is not a valid instruction
    InvalidOpcode { address: Word, word: Word },
    AddressOutOfRange { address: Word, size: usize },
    /// A program of `words` words cannot be loaded into `size` words of memory
    ProgramTooLarge { words: usize, size: usize },
}

impl std::fmt::Display for CpuFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CpuFault::InvalidOpcode { address, word } => {
                write!(f, "Invalid opcode {:#b} at address {}", word, address)
            }
            CpuFault::AddressOutOfRange { address, size } => write!(
                f,
                "Address {} is outside of memory (size {})",
                address, size
            ),
            CpuFault::ProgramTooLarge { words, size } => write!(
                f,
                "Program of {} words does not fit in {} words of memory",
                words, size
            ),
        }
    }
}

impl std::error::Error for CpuFault {}
