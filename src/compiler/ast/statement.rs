use crate::compiler::arch::{
    ConditionTarget, ControlAction, DestinationLocation, GeneralRegister, RegisterOp,
    SourceLocation,
};
use crate::compiler::source::{SourceIr, Span};

use super::Literal;

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// The full key of the label on this statement, e.g. `0.2!loop`
    pub label: Option<String>,
    pub span: Span,
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Statement {
        Statement {
            label: None,
            span,
            kind,
        }
    }

    /// The label as written in the source, without its scope prefix
    pub fn label_name(&self) -> Option<&str> {
        self.label
            .as_ref()
            .and_then(|key| key.rsplit('!').next())
    }
}

impl SourceIr for Statement {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StatementKind {
    Movement {
        to: DestinationLocation,
        to_literal: Option<Literal>,
        from: SourceLocation,
        from_literal: Option<Literal>,
    },
    Condition {
        invert: bool,
        or: bool,
        targets: Vec<ConditionTarget>,
    },
    Action(ControlAction),
    RegisterAction {
        op: RegisterOp,
        target: GeneralRegister,
    },
    /// Named data.  It emits no instruction and is placed in memory the first
    /// time it is referenced.
    Constant(Literal),
}

impl StatementKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatementKind::Movement { .. } => "movement",
            StatementKind::Condition { .. } => "condition",
            StatementKind::Action(..) => "action",
            StatementKind::RegisterAction { .. } => "registerAction",
            StatementKind::Constant(..) => "constant",
        }
    }

    /// The number of words the instruction occupies
    pub fn width(&self) -> usize {
        match self {
            StatementKind::Movement {
                to_literal,
                from_literal,
                ..
            } => 1 + to_literal.is_some() as usize + from_literal.is_some() as usize,
            StatementKind::Constant(..) => 0,
            _ => 1,
        }
    }
}
