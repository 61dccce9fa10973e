//! Template instance options.

use crate::error::{Result, VellumError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Configuration for one template instance.
///
/// Every field participates in the instance id, so two instances built from
/// identical options share compiled artifacts and a registry slot.
///
/// # Example
///
/// ```
/// use vellum::config::TemplateOptions;
///
/// let options = TemplateOptions::new("/views")
///     .with_suffix("tpl")
///     .with_compiler(true);
///
/// assert_eq!(options.file_suffix, "tpl");
/// assert_eq!(options.instance_id(), options.clone().instance_id());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOptions {
    /// Directory holding view source files.
    pub template_directory: PathBuf,

    /// Extension of view files, without the dot.
    pub file_suffix: String,

    /// Opening tag delimiter.
    pub left_delimiter: String,

    /// Closing tag delimiter.
    pub right_delimiter: String,

    /// Whether tags are compiled at all.
    pub compiler_enabled: bool,

    /// Recompile when a source is newer than its artifact.
    pub debug_enabled: bool,

    /// Directory receiving compiled artifacts.
    pub compiled_directory: PathBuf,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            template_directory: PathBuf::from("views"),
            file_suffix: "phtml".to_string(),
            left_delimiter: "{".to_string(),
            right_delimiter: "}".to_string(),
            compiler_enabled: false,
            debug_enabled: true,
            compiled_directory: PathBuf::from("compiled"),
        }
    }
}

impl TemplateOptions {
    /// Create options for a view directory with default settings.
    pub fn new(template_directory: impl Into<PathBuf>) -> Self {
        Self {
            template_directory: template_directory.into(),
            ..Default::default()
        }
    }

    /// Set the view file suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = suffix.into();
        self
    }

    /// Set both tag delimiters.
    pub fn with_delimiters(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_delimiter = left.into();
        self.right_delimiter = right.into();
        self
    }

    /// Enable or disable the tag compiler.
    pub fn with_compiler(mut self, enabled: bool) -> Self {
        self.compiler_enabled = enabled;
        self
    }

    /// Enable or disable staleness checks.
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }

    /// Set the compiled artifact directory.
    pub fn with_compiled_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.compiled_directory = dir.into();
        self
    }

    /// Resolve relative directories against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        if self.template_directory.is_relative() {
            self.template_directory = base.join(&self.template_directory);
        }
        if self.compiled_directory.is_relative() {
            self.compiled_directory = base.join(&self.compiled_directory);
        }
        self
    }

    /// Check that the options can drive a template instance.
    pub fn validate(&self) -> Result<()> {
        if self.left_delimiter.is_empty() || self.right_delimiter.is_empty() {
            return Err(VellumError::ConfigValidationError {
                message: "Tag delimiters must not be empty".to_string(),
            });
        }
        if self.file_suffix.is_empty() {
            return Err(VellumError::ConfigValidationError {
                message: "File suffix must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Deterministic identifier derived from every option.
    ///
    /// Paths are hashed by their raw bytes, so non-UTF-8 directories still
    /// produce distinct ids.
    pub fn instance_id(&self) -> String {
        let fields: [&[u8]; 7] = [
            self.template_directory.as_os_str().as_encoded_bytes(),
            self.file_suffix.as_bytes(),
            self.left_delimiter.as_bytes(),
            self.right_delimiter.as_bytes(),
            &[u8::from(self.compiler_enabled)],
            &[u8::from(self.debug_enabled)],
            self.compiled_directory.as_os_str().as_encoded_bytes(),
        ];

        let mut hasher = Sha256::new();
        for field in fields {
            // Length prefix keeps ("ab", "c") apart from ("a", "bc").
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field);
        }
        hex::encode(&hasher.finalize()[..16])
    }
}
