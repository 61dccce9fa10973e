//! Render command implementation.
//!
//! `vellum render <view>` renders through a fresh template instance and
//! writes the result to stdout or `--output`.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::cli::args::RenderArgs;
use crate::config::TemplateOptions;
use crate::engine::Template;
use crate::error::{Result, VellumError};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The render command implementation.
pub struct RenderCommand {
    project_root: PathBuf,
    options: TemplateOptions,
    args: RenderArgs,
}

impl RenderCommand {
    /// Create a new render command.
    pub fn new(project_root: &Path, options: TemplateOptions, args: RenderArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            options,
            args,
        }
    }

    fn bind(&self, template: &mut Template) -> Result<()> {
        if let Some(file) = &self.args.vars_file {
            let path = self.project_root.join(file);
            let text = fs::read_to_string(&path)?;
            let values: Value =
                serde_yaml::from_str(&text).map_err(|e| VellumError::InvalidBindings {
                    message: format!("{}: {}", path.display(), e),
                })?;
            template.assign_serialize(&values)?;
        }

        for pair in &self.args.vars {
            let (name, value) = parse_var(pair)?;
            template.assign(name, value);
        }

        Ok(())
    }
}

impl Command for RenderCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut template = Template::new(self.options.clone())?;
        self.bind(&mut template)?;
        if let Some(layout) = &self.args.layout {
            template.layout(layout.as_str());
        }

        let html = template.render(&self.args.view)?;

        match &self.args.output {
            Some(output) => {
                let path = self.project_root.join(output);
                fs::write(&path, &html)?;
                ui.success(&format!("Rendered {} to {}", self.args.view, path.display()));
            }
            None => ui.output(&html)?,
        }

        Ok(CommandResult::success())
    }
}

/// Split `NAME=VALUE`, reading the value as JSON when it parses.
pub fn parse_var(pair: &str) -> Result<(String, Value)> {
    let Some((name, raw)) = pair.split_once('=') else {
        return Err(VellumError::InvalidBindings {
            message: format!("expected NAME=VALUE, got '{}'", pair),
        });
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(VellumError::InvalidBindings {
            message: format!("missing variable name in '{}'", pair),
        });
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}
