pub mod cli;
pub mod compiler;
pub mod diagnostics;
pub mod project;

pub use cli::*;
pub use compiler::{compile, CompileError};
pub use project::Manifest;
