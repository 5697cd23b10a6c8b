//! Semantic analysis of a parsed program: binding every label reference to
//! the statement it names.

mod error;
mod resolver;
mod tests;

pub use error::LinkError;
pub use resolver::resolve;
