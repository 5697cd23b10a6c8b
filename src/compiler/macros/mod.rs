/*!
Rewrites macro calls into the tokens of their bodies.

A macro is defined with `#define NAME P1 P2 { body }` and called with
`NAME(arg1 arg2)`.  Every argument is bound to its parameter as a macro with
no parameters, in a scope whose parent is the scope the called macro was
defined in, and the body is expanded in that scope.  A body therefore only
sees its own parameters and the macros defined at the top level.
*/
use crate::compiler::lexer::Token;
use crate::compiler::source::{SourceIr, Span};

mod error;
mod expander;
mod scope;

pub use error::MacroError;
pub use expander::{expand, ExpansionOutput, MAX_EXPANSION_DEPTH};
pub use scope::{MacroScopes, ScopeId};

#[derive(Clone, Debug, PartialEq)]
pub struct Macro {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Token>,
    pub span: Span,
}

impl Macro {
    /// The signature shown to the user, e.g. `INC(X)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }
}

impl SourceIr for Macro {
    fn span(&self) -> Span {
        self.span
    }
}
