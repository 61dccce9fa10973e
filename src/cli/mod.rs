//! Command-line interface for Vellum.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, CompileArgs, CompletionsArgs, Commands, RenderArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
