//! Mock UI implementation for testing.
//!
//! `MockUI` captures every interaction for later assertion.
//!
//! # Example
//!
//! ```
//! use vellum::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Compiling");
//! ui.output("<p>hi</p>").unwrap();
//!
//! assert!(ui.has_message("Compiling"));
//! assert_eq!(ui.rendered(), "<p>hi</p>");
//! ```

use super::{OutputMode, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    rendered: String,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Everything passed to `output`, concatenated.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Whether any message contains `msg`.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn output(&mut self, text: &str) -> std::io::Result<()> {
        self.rendered.push_str(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_each_channel() {
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        ui.message("one");
        ui.success("two");
        ui.warning("three");
        ui.error("four");
        ui.output("a").unwrap();
        ui.output("b").unwrap();

        assert_eq!(ui.output_mode(), OutputMode::Quiet);
        assert!(ui.has_message("one"));
        assert!(ui.has_success("two"));
        assert!(ui.has_warning("three"));
        assert!(ui.has_error("four"));
        assert_eq!(ui.rendered(), "ab");
    }
}
