//! Compile command implementation.
//!
//! `vellum compile <view>` builds (or reuses) a view's artifact and reports
//! where it lives, or prints the program with `--json`.

use crate::cache::ResolvedView;
use crate::cli::args::CompileArgs;
use crate::config::TemplateOptions;
use crate::engine::Template;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The compile command implementation.
pub struct CompileCommand {
    options: TemplateOptions,
    args: CompileArgs,
}

impl CompileCommand {
    /// Create a new compile command.
    pub fn new(options: TemplateOptions, args: CompileArgs) -> Self {
        Self { options, args }
    }
}

impl Command for CompileCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let template = Template::new(self.options.clone())?;

        let resolved = template.resolve(&self.args.view)?;
        tracing::debug!("Resolved {} to {}", self.args.view, resolved.path().display());

        match resolved {
            ResolvedView::Source(path) => ui.warning(&format!(
                "Compiler disabled; {} renders as literal text",
                path.display()
            )),
            ResolvedView::Compiled(path) => {
                ui.success(&format!("Compiled {} -> {}", self.args.view, path.display()))
            }
        }

        if self.args.json {
            let program = template.program(&self.args.view)?;
            let json = serde_json::to_string_pretty(&program)
                .map_err(|e| anyhow::anyhow!("Failed to encode program: {}", e))?;
            ui.output(&json)?;
            ui.output("\n")?;
        }

        Ok(CommandResult::success())
    }
}
