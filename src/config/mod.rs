//! Template options: schema, file discovery and layered loading.
//!
//! - Option schema and defaults in [`options`]
//! - `vellum.yml` / `vellum.local.yml` loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use vellum::config::load_merged_options;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("vellum.yml"), "file_suffix: tpl").unwrap();
//!
//! let options = load_merged_options(temp.path()).unwrap();
//! assert_eq!(options.file_suffix, "tpl");
//! assert_eq!(options.template_directory, temp.path().join("views"));
//! ```

pub mod loader;
pub mod options;

pub use loader::{
    load_merged_options, load_options, load_options_file, load_options_value, merge_into,
    parse_options, OptionsPaths, LOCAL_OPTIONS_FILE, OPTIONS_FILE,
};
pub use options::TemplateOptions;
