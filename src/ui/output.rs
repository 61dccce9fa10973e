//! Output verbosity.

/// How much status chatter commands print.
///
/// Rendered view output, warnings and errors are always written; modes only
/// affect status messages around them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show status and summary messages.
    #[default]
    Normal,
    /// Show warnings and errors only (`--quiet`).
    Quiet,
}

impl OutputMode {
    /// Mode selected by the global `--quiet` flag.
    pub fn from_quiet(quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Normal)
    }
}
