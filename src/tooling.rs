//! Tooling & Integration Layer
//!
//! Command-line access to drive documents and the text formatting it uses.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands, OutputFormat};
