//! Command output.
//!
//! - [`UserInterface`] trait so commands can be tested without a terminal
//! - [`ConsoleUI`] for real runs
//! - [`MockUI`] for tests

pub mod console;
pub mod mock;
pub mod output;

pub use console::ConsoleUI;
pub use mock::MockUI;
pub use output::OutputMode;

/// Trait for user-facing output.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Write rendered content verbatim, without decoration or newline.
    fn output(&mut self, text: &str) -> std::io::Result<()>;
}
