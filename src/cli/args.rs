//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use super::commands::cache::CacheArgs;

/// Vellum - compile and render tag-based view templates.
#[derive(Debug, Parser)]
#[command(name = "vellum")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to options file (overrides vellum.yml + vellum.local.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a view to stdout or a file
    Render(RenderArgs),

    /// Compile a view and report its artifact
    Compile(CompileArgs),

    /// Manage compiled artifacts
    Cache(CacheArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `render` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RenderArgs {
    /// View name, relative to the template directory and without suffix
    pub view: String,

    /// Layout view to render the view inside
    #[arg(short, long)]
    pub layout: Option<String>,

    /// Bind a variable; VALUE is parsed as JSON, falling back to a string
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// YAML or JSON file with a mapping of variables
    #[arg(long, value_name = "FILE")]
    pub vars_file: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `compile` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CompileArgs {
    /// View name
    pub view: String,

    /// Print the compiled program as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::commands::cache::CacheSubcommand;

    #[test]
    fn parses_render_with_vars() {
        let cli = Cli::parse_from([
            "vellum", "render", "hello", "--var", "name=Ada", "--var", "n=3", "-l", "layout",
        ]);
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.view, "hello");
                assert_eq!(args.vars, vec!["name=Ada", "n=3"]);
                assert_eq!(args.layout.as_deref(), Some("layout"));
            }
            other => panic!("expected render, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["vellum", "compile", "page", "--json", "--debug", "-p", "/site"]);
        assert!(cli.debug);
        assert_eq!(cli.project, Some(PathBuf::from("/site")));
        assert!(matches!(cli.command, Commands::Compile(CompileArgs { json: true, .. })));
    }

    #[test]
    fn parses_cache_subcommands() {
        let cli = Cli::parse_from(["vellum", "cache", "list", "--json"]);
        match cli.command {
            Commands::Cache(args) => {
                assert!(matches!(args.command, CacheSubcommand::List { json: true }))
            }
            other => panic!("expected cache, got {:?}", other),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["vellum"]).is_err());
    }
}
