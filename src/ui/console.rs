//! Console UI writing to stdout and stderr.

use std::io::Write;

use super::{OutputMode, UserInterface};

/// Plain console output.
///
/// Status goes to stdout; warnings and errors go to stderr so rendered
/// output piped elsewhere stays clean.
#[derive(Debug, Default)]
pub struct ConsoleUI {
    mode: OutputMode,
}

impl ConsoleUI {
    /// Create a console UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for ConsoleUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn output(&mut self, text: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }
}
