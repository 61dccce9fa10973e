//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`], which also loads the project's template options
//! for the commands that need them.

pub mod cache;
pub mod compile;
pub mod completions;
pub mod dispatcher;
pub mod render;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
