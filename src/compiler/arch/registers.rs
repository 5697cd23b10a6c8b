use std::convert::TryFrom;

/// The four general purpose registers which can be the target of a register
/// action and (except `d`) the target of a condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneralRegister {
    A,
    B,
    C,
    D,
}

impl GeneralRegister {
    /// The code of this register in the target bits of a register action
    pub fn code(&self) -> u32 {
        match self {
            GeneralRegister::A => 0,
            GeneralRegister::B => 1,
            GeneralRegister::C => 2,
            GeneralRegister::D => 3,
        }
    }

    pub fn from_code(code: u32) -> Option<GeneralRegister> {
        match code {
            0 => Some(GeneralRegister::A),
            1 => Some(GeneralRegister::B),
            2 => Some(GeneralRegister::C),
            3 => Some(GeneralRegister::D),
            _ => None,
        }
    }
}

impl TryFrom<char> for GeneralRegister {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'a' => Ok(GeneralRegister::A),
            'b' => Ok(GeneralRegister::B),
            'c' => Ok(GeneralRegister::C),
            'd' => Ok(GeneralRegister::D),
            _ => Err(c),
        }
    }
}

impl std::fmt::Display for GeneralRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            GeneralRegister::A => f.write_str("a"),
            GeneralRegister::B => f.write_str("b"),
            GeneralRegister::C => f.write_str("c"),
            GeneralRegister::D => f.write_str("d"),
        }
    }
}
