//! The statements of an S9B program.  Statements live in an arena owned by
//! the `Program` and refer to each other through `StatementId`s; references
//! to labels live in a side table so they can be resolved in place.

mod literal;
mod program;
mod statement;

pub use self::literal::Literal;
pub use self::program::{label_key, Program, RefId, Reference, Resolution, StatementId};
pub use self::statement::{Statement, StatementKind};
