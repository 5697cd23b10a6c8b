use std::collections::HashMap;
use std::fmt::Display;

use crate::compiler::source::Span;

use super::{Literal, Statement, StatementKind};

/// Index of a statement in the program arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatementId(usize);

impl StatementId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Index of a reference in the program's reference table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RefId(usize);

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Not found yet.  Lookup starts in the scope named by the prefix and
    /// walks outwards.
    Unresolved { scope_prefix: Vec<u32> },
    Resolved(StatementId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    pub label: String,
    pub span: Span,
    pub resolution: Resolution,
}

/// Builds the key a label is stored under: the dotted scope path followed by
/// `!` and the label name.
pub fn label_key(prefix: &[u32], name: &str) -> String {
    let path: Vec<String> = prefix.iter().map(|p| p.to_string()).collect();
    format!("{}!{}", path.join("."), name)
}

#[derive(Debug, Default)]
pub struct Program {
    arena: Vec<Statement>,
    order: Vec<StatementId>,
    labels: HashMap<String, StatementId>,
    references: Vec<Reference>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    /// Adds a statement.  Everything except constants is also appended to
    /// the instruction order.
    pub fn push(&mut self, stmt: Statement) -> StatementId {
        let id = StatementId(self.arena.len());
        if !matches!(stmt.kind, StatementKind::Constant(..)) {
            self.order.push(id);
        }
        self.arena.push(stmt);
        id
    }

    /// Binds `key` to a statement.  If the key is taken the existing binding
    /// is returned as the error.
    pub fn add_label(&mut self, key: String, id: StatementId) -> Result<(), StatementId> {
        if let Some(existing) = self.labels.get(&key) {
            return Err(*existing);
        }
        self.arena[id.0].label = Some(key.clone());
        self.labels.insert(key, id);
        Ok(())
    }

    pub fn add_reference(&mut self, label: &str, scope_prefix: Vec<u32>, span: Span) -> RefId {
        self.references.push(Reference {
            label: label.into(),
            span,
            resolution: Resolution::Unresolved { scope_prefix },
        });
        RefId(self.references.len() - 1)
    }

    pub fn statement(&self, id: StatementId) -> &Statement {
        &self.arena[id.0]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// The executable statements in source order
    pub fn instructions(&self) -> impl Iterator<Item = (StatementId, &Statement)> {
        self.order.iter().map(move |id| (*id, &self.arena[id.0]))
    }

    pub fn label(&self, key: &str) -> Option<StatementId> {
        self.labels.get(key).copied()
    }

    /// Every label key and the statement it names
    pub fn labels(&self) -> impl Iterator<Item = (&str, StatementId)> {
        self.labels.iter().map(|(key, id)| (key.as_str(), *id))
    }

    pub fn reference(&self, id: RefId) -> &Reference {
        &self.references[id.0]
    }

    pub fn reference_mut(&mut self, id: RefId) -> &mut Reference {
        &mut self.references[id.0]
    }

    pub fn references(&self) -> impl Iterator<Item = (RefId, &Reference)> {
        self.references
            .iter()
            .enumerate()
            .map(|(idx, r)| (RefId(idx), r))
    }

    /// A one line rendering of a statement, e.g. `loop: movement pc = $ :0!end`
    pub fn display(&self, id: StatementId) -> StatementDisplay<'_> {
        StatementDisplay { program: self, id }
    }

    fn fmt_literal(&self, lit: &Literal, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match lit {
            Literal::Number(_, n) => write!(f, "{}", n),
            Literal::Text(_, text) => write!(f, "{:?}", text),
            Literal::Array(_, elements) => {
                f.write_str("[")?;
                for (idx, e) in elements.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    self.fmt_literal(e, f)?;
                }
                f.write_str("]")
            }
            Literal::Reference(_, rid) => {
                let r = self.reference(*rid);
                match &r.resolution {
                    Resolution::Unresolved { scope_prefix } => {
                        write!(f, ":{}", label_key(scope_prefix, &r.label))
                    }
                    Resolution::Resolved(target) => match &self.statement(*target).label {
                        Some(key) => write!(f, ":{}", key),
                        None => write!(f, ":#{}", target.0),
                    },
                }
            }
        }
    }
}

pub struct StatementDisplay<'a> {
    program: &'a Program,
    id: StatementId,
}

impl<'a> Display for StatementDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stmt = self.program.statement(self.id);
        if let Some(name) = stmt.label_name() {
            write!(f, "{}: ", name)?;
        }
        f.write_str(stmt.kind.name())?;
        match &stmt.kind {
            StatementKind::Movement {
                to,
                to_literal,
                from,
                from_literal,
            } => {
                write!(f, " {}", to)?;
                if let Some(lit) = to_literal {
                    f.write_str(" ")?;
                    self.program.fmt_literal(lit, f)?;
                }
                write!(f, " = {}", from)?;
                if let Some(lit) = from_literal {
                    f.write_str(" ")?;
                    self.program.fmt_literal(lit, f)?;
                }
                Ok(())
            }
            StatementKind::Condition {
                invert,
                or,
                targets,
            } => {
                if *invert {
                    f.write_str(" inv")?;
                }
                if *or {
                    f.write_str(" or")?;
                }
                for t in targets {
                    write!(f, " {}", t.as_char())?;
                }
                Ok(())
            }
            StatementKind::Action(action) => write!(f, " {}", action),
            StatementKind::RegisterAction { op, target } => {
                write!(f, " {} {}", op.symbol(), target)
            }
            StatementKind::Constant(lit) => {
                f.write_str(" ")?;
                self.program.fmt_literal(lit, f)
            }
        }
    }
}
