use crate::compiler::{CompilerDisplay, CompilerDisplayError, Source};

/// Errors raised while expanding macro calls
#[derive(Clone, Debug, PartialEq)]
pub enum MacroError {
    UnknownMacro(String),
    /// The macro, its parameters, and the number of arguments given
    ArityMismatch(String, Vec<String>, usize),
    /// The macro and the chain of calls which led back to it
    RecursiveExpansion(String, Vec<String>),
    ExpansionTooDeep(String),
    /// A `(` inside of an argument group
    NestedGroup,
    UnterminatedArguments(String),
    /// A `(` or `)` which is not part of a call
    UnexpectedArgumentDelimiter,
}

impl CompilerDisplay for MacroError {
    fn fmt(&self, _: &Source) -> Result<String, CompilerDisplayError> {
        use MacroError::*;
        let msg = match self {
            UnknownMacro(name) => format!("Cannot find macro named {}", name),
            ArityMismatch(name, params, found) => format!(
                "Macro {} requires {} arguments ({}) but {} provided",
                name,
                params.len(),
                params.join(", "),
                found
            ),
            RecursiveExpansion(name, stack) => format!(
                "Recursive expansion of macro {} ({} -> {})",
                name,
                stack.join(" -> "),
                name
            ),
            ExpansionTooDeep(name) => format!("Expansion of macro {} is nested too deeply", name),
            NestedGroup => format!("Cannot start a group in a group"),
            UnterminatedArguments(name) => format!("Missing ) after arguments to {}", name),
            UnexpectedArgumentDelimiter => {
                format!("Unexpected character, not valid outside macro argument")
            }
        };
        Ok(msg)
    }
}
