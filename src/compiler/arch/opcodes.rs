use super::{GeneralRegister, Word, ACTION};

/// Combine the condition targets with OR instead of AND
pub const CONDITION_OR: Word = 0b0100_0000;
/// Invert the result of the condition
pub const CONDITION_INVERT: Word = 0b0010_0000;

/// Names of the control actions, written `!name` in source.
pub const VALID_ACTIONS: [&str; 4] = ["done", "pause", "halt", "pop"];

/// Something a condition instruction can test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConditionTarget {
    /// The zero flag
    Zero,
    /// The carry flag
    Carry,
    /// Register tests are true when the register is zero
    A,
    B,
    C,
}

impl ConditionTarget {
    pub const ALL: [ConditionTarget; 5] = [
        ConditionTarget::Zero,
        ConditionTarget::Carry,
        ConditionTarget::A,
        ConditionTarget::B,
        ConditionTarget::C,
    ];

    pub fn bit(&self) -> Word {
        match self {
            ConditionTarget::Zero => 16,
            ConditionTarget::Carry => 8,
            ConditionTarget::A => 4,
            ConditionTarget::B => 2,
            ConditionTarget::C => 1,
        }
    }

    pub fn from_char(c: char) -> Option<ConditionTarget> {
        match c {
            'Z' => Some(ConditionTarget::Zero),
            'C' => Some(ConditionTarget::Carry),
            'a' => Some(ConditionTarget::A),
            'b' => Some(ConditionTarget::B),
            'c' => Some(ConditionTarget::C),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            ConditionTarget::Zero => 'Z',
            ConditionTarget::Carry => 'C',
            ConditionTarget::A => 'a',
            ConditionTarget::B => 'b',
            ConditionTarget::C => 'c',
        }
    }

    /// Decodes the target bitmask of a condition word
    pub fn from_mask(mask: Word) -> Vec<ConditionTarget> {
        Self::ALL
            .iter()
            .filter(|t| mask & t.bit() != 0)
            .copied()
            .collect()
    }
}

/// Actions which control the execution of the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Halt,
    Done,
    Pause,
    Pop,
}

impl ControlAction {
    /// The complete instruction word, including the action tag
    pub fn code(&self) -> Word {
        ACTION
            | match self {
                ControlAction::Halt => 1,
                ControlAction::Done => 2,
                ControlAction::Pause => 3,
                ControlAction::Pop => 24,
            }
    }

    pub fn from_code(inst: Word) -> Option<ControlAction> {
        [
            ControlAction::Halt,
            ControlAction::Done,
            ControlAction::Pause,
            ControlAction::Pop,
        ]
        .iter()
        .find(|a| a.code() == inst)
        .copied()
    }

    pub fn from_name(name: &str) -> Option<ControlAction> {
        match name {
            "halt" => Some(ControlAction::Halt),
            "done" => Some(ControlAction::Done),
            "pause" => Some(ControlAction::Pause),
            "pop" => Some(ControlAction::Pop),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ControlAction::Halt => "halt",
            ControlAction::Done => "done",
            ControlAction::Pause => "pause",
            ControlAction::Pop => "pop",
        }
    }
}

impl std::fmt::Display for ControlAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An operation applied in place to one of the general registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegisterOp {
    Invert,
    Increment,
    Decrement,
    ShiftLeft,
    ShiftRight,
}

impl RegisterOp {
    pub const ALL: [RegisterOp; 5] = [
        RegisterOp::Invert,
        RegisterOp::Increment,
        RegisterOp::Decrement,
        RegisterOp::ShiftLeft,
        RegisterOp::ShiftRight,
    ];

    /// The operation code, already shifted into bits 2-4
    pub fn code(&self) -> Word {
        match self {
            RegisterOp::Increment => 4,
            RegisterOp::Decrement => 8,
            RegisterOp::Invert => 12,
            RegisterOp::ShiftLeft => 16,
            RegisterOp::ShiftRight => 20,
        }
    }

    pub fn from_code(code: Word) -> Option<RegisterOp> {
        Self::ALL.iter().find(|op| op.code() == code).copied()
    }

    pub fn symbol(&self) -> char {
        match self {
            RegisterOp::Invert => '!',
            RegisterOp::Increment => '+',
            RegisterOp::Decrement => '-',
            RegisterOp::ShiftLeft => '<',
            RegisterOp::ShiftRight => '>',
        }
    }

    pub fn from_symbol(c: char) -> Option<RegisterOp> {
        Self::ALL.iter().find(|op| op.symbol() == c).copied()
    }

    /// Encodes this operation applied to `target` as an action word.
    pub fn encode(&self, target: GeneralRegister) -> Word {
        ACTION | self.code() | target.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_action_codes() {
        for (name, code) in [("halt", 65), ("done", 66), ("pause", 67), ("pop", 88)].iter() {
            let action = ControlAction::from_name(name).unwrap();
            assert_eq!(action.code(), *code);
            assert_eq!(ControlAction::from_code(*code), Some(action));
        }
    }

    #[test]
    fn register_actions_do_not_collide_with_control_actions() {
        for op in RegisterOp::ALL.iter() {
            for reg in [
                GeneralRegister::A,
                GeneralRegister::B,
                GeneralRegister::C,
                GeneralRegister::D,
            ]
            .iter()
            {
                assert_eq!(ControlAction::from_code(op.encode(*reg)), None);
            }
        }
    }

    #[test]
    fn condition_mask_decodes() {
        let mask = ConditionTarget::Zero.bit() | ConditionTarget::B.bit();
        assert_eq!(
            ConditionTarget::from_mask(mask),
            vec![ConditionTarget::Zero, ConditionTarget::B]
        );
    }
}
