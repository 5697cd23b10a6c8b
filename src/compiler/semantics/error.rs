use crate::compiler::{CompilerDisplay, CompilerDisplayError, Source};

/// Errors raised while binding references to labels and while laying the
/// program out in memory.
#[derive(Clone, Debug, PartialEq)]
pub enum LinkError {
    /// No enclosing scope defines the label
    LabelNotFound(String),
    /// Resolution stopped making progress before the label was found
    Unresolvable(String),
    /// The size of the image and the number of addressable words
    ProgramTooLarge(usize, usize),
}

impl CompilerDisplay for LinkError {
    fn fmt(&self, _: &Source) -> Result<String, CompilerDisplayError> {
        let msg = match self {
            LinkError::LabelNotFound(label) => format!("Could not find label {}", label),
            LinkError::Unresolvable(label) => format!("Could not resolve reference to {}", label),
            LinkError::ProgramTooLarge(size, max) => format!(
                "Program needs {} words but only {} are addressable",
                size, max
            ),
        };
        Ok(msg)
    }
}
