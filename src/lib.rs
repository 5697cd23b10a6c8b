pub mod result;

pub mod cli;
pub mod compiler;
pub mod config;
pub mod cpu;
pub mod manifest;

pub use cli::*;
pub use manifest::Manifest;
