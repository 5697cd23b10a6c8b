use crate::compiler::arch::{Word, CONDITION, CONDITION_INVERT, CONDITION_OR, MOVEMENT};
use crate::compiler::ast::{Literal, StatementKind};

/// The instruction word of a statement.  Constants have none.
pub fn encode(kind: &StatementKind) -> Option<Word> {
    let word = match kind {
        StatementKind::Movement { to, from, .. } => MOVEMENT | from.code() | to.code(),
        StatementKind::Condition {
            invert,
            or,
            targets,
        } => {
            let mut word = CONDITION;
            if *or {
                word |= CONDITION_OR;
            }
            if *invert {
                word |= CONDITION_INVERT;
            }
            targets.iter().fold(word, |word, t| word | t.bit())
        }
        StatementKind::Action(action) => action.code(),
        StatementKind::RegisterAction { op, target } => op.encode(*target),
        StatementKind::Constant(..) => return None,
    };
    Some(word)
}

/// The immediate operands of an instruction, in the order the machine reads
/// them: the source operand, then the destination operand.
pub fn operands(kind: &StatementKind) -> Vec<&Literal> {
    match kind {
        StatementKind::Movement {
            to_literal,
            from_literal,
            ..
        } => from_literal.iter().chain(to_literal.iter()).collect(),
        _ => vec![],
    }
}
