//! Cache command implementation.
//!
//! Provides `vellum cache list`, `vellum cache clear` and `vellum cache stats`
//! over the project's compiled directory.

use clap::{Args, Subcommand};

use crate::cache::{ArtifactEntry, ArtifactStore};
use crate::config::TemplateOptions;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Arguments for the cache command.
#[derive(Debug, Clone, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

/// Cache subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CacheSubcommand {
    /// List compiled artifacts.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Remove every compiled artifact.
    Clear,
    /// Show cache statistics.
    Stats,
}

/// The cache command implementation.
pub struct CacheCommand {
    options: TemplateOptions,
    args: CacheArgs,
}

impl CacheCommand {
    /// Create a new cache command.
    pub fn new(options: TemplateOptions, args: CacheArgs) -> Self {
        Self { options, args }
    }
}

impl Command for CacheCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = ArtifactStore::new(&self.options.compiled_directory);

        match &self.args.command {
            CacheSubcommand::List { json } => list_artifacts(&store, *json, ui)?,
            CacheSubcommand::Clear => {
                let removed = store.clear()?;
                ui.success(&format!("Removed {} compiled views", removed));
            }
            CacheSubcommand::Stats => show_stats(&store, ui)?,
        }

        Ok(CommandResult::success())
    }
}

fn list_artifacts(store: &ArtifactStore, json: bool, ui: &mut dyn UserInterface) -> Result<()> {
    let entries = store.list()?;

    if json {
        let output = serde_json::to_string_pretty(&entries)
            .map_err(|e| anyhow::anyhow!("Failed to encode entries: {}", e))?;
        ui.output(&output)?;
        ui.output("\n")?;
        return Ok(());
    }

    if entries.is_empty() {
        ui.message("No compiled views");
        return Ok(());
    }

    ui.message(&format!("{} compiled views:\n", entries.len()));
    for entry in &entries {
        ui.message(&describe(entry));
    }

    Ok(())
}

fn describe(entry: &ArtifactEntry) -> String {
    let instance = entry.instance_id.get(..8).unwrap_or(&entry.instance_id);
    let orphan = if entry.source_exists() {
        ""
    } else {
        " [source missing]"
    };
    format!(
        "  {} ({}) compiled {} ago, {} bytes{}",
        entry.source.display(),
        instance,
        format_age(entry.age()),
        entry.size_bytes,
        orphan
    )
}

fn show_stats(store: &ArtifactStore, ui: &mut dyn UserInterface) -> Result<()> {
    let entries = store.list()?;
    let total: u64 = entries.iter().map(|e| e.size_bytes).sum();
    let orphans = entries.iter().filter(|e| !e.source_exists()).count();

    ui.message(&format!("Directory: {}", store.root().display()));
    ui.message(&format!("Compiled views: {}", entries.len()));
    ui.message(&format!("Total size: {} bytes", total));
    if orphans > 0 {
        ui.warning(&format!("{} compiled views have no source", orphans));
    }

    Ok(())
}

/// Short human form of an age: `42s`, `5m`, `3h`, `2d`.
fn format_age(age: chrono::Duration) -> String {
    let secs = age.num_seconds().max(0);
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => format!("{}m", secs / 60),
        3600..=86399 => format!("{}h", secs / 3600),
        _ => format!("{}d", secs / 86400),
    }
}
