//! Vellum - a compiling template engine for delimiter-tagged views.
//!
//! Views are plain text files with tags between delimiters (`{name|World}`,
//! `{loop items item}`, `{if cond}`, `{yield}`). Each view is compiled once
//! into a typed program, cached on disk as JSON, and interpreted against the
//! variables bound to a template instance.
//!
//! # Modules
//!
//! - [`syntax`] - Span extraction, tag rules and the tag/expression AST
//! - [`compiler`] - Compiles view sources into programs
//! - [`cache`] - Compiled artifact storage and staleness checks
//! - [`engine`] - Template instances, registry and the program executor
//! - [`config`] - Template options and YAML loading
//! - [`cli`] - Command-line interface and argument parsing
//! - [`ui`] - Command output
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use vellum::compiler::Compiler;
//! use vellum::syntax::RuleSet;
//! use std::path::Path;
//!
//! let rules = RuleSet::with_builtins();
//! let program = Compiler::new(&rules, "{", "}")
//!     .compile("id", Path::new("hello.tpl"), "Hello {name|World}!")
//!     .unwrap();
//! assert_eq!(program.nodes.len(), 3);
//! ```
//!
//! For rendering from files, see [`Template`] and the integration tests.

pub mod cache;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod syntax;
pub mod ui;

pub use config::TemplateOptions;
pub use engine::{Template, TemplateRegistry};
pub use error::{Result, VellumError};
