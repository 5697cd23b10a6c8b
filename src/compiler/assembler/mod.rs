//! Turns a resolved program into the memory image of the machine.
//!
//! Instructions are emitted in source order, each immediately followed by
//! its immediate operand words.  Label addresses and data are patched in
//! afterwards by the linker, which places named data the first time it is
//! referenced and reuses that copy for every later reference.

mod encoder;
mod linker;
mod output;
mod tests;

pub use encoder::{encode, operands};
pub use linker::link;
pub use output::{AssembledOutput, Symbol};
