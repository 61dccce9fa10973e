//! Options file discovery and loading.
//!
//! Options live next to the views they describe:
//! 1. `vellum.yml` (project options, required)
//! 2. `vellum.local.yml` (machine-local overrides, optional)
//!
//! Later files are deep-merged over earlier ones. Relative directories are
//! resolved against the directory holding the options files.

use crate::config::options::TemplateOptions;
use crate::error::{Result, VellumError};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Project options file name.
pub const OPTIONS_FILE: &str = "vellum.yml";

/// Local overrides file name.
pub const LOCAL_OPTIONS_FILE: &str = "vellum.local.yml";

/// Options files found for a project, in merge order.
#[derive(Debug, Clone)]
pub struct OptionsPaths {
    /// `vellum.yml`
    pub project: Option<PathBuf>,

    /// `vellum.local.yml`
    pub local: Option<PathBuf>,
}

impl OptionsPaths {
    /// Discover options files in `root`.
    pub fn discover(root: &Path) -> Self {
        let existing = |name: &str| {
            let path = root.join(name);
            path.is_file().then_some(path)
        };

        Self {
            project: existing(OPTIONS_FILE),
            local: existing(LOCAL_OPTIONS_FILE),
        }
    }

    /// Existing files in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.local.iter()).collect()
    }
}

/// Read one options file as raw YAML.
///
/// An empty file yields an empty mapping.
pub fn load_options_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            VellumError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            VellumError::Io(e)
        }
    })?;

    let value: Value =
        serde_yaml::from_str(&content).map_err(|e| VellumError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(match value {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    })
}

/// Merge `overlay` into `base` in place.
///
/// Mappings merge key by key, a null in the overlay removes the key, and
/// anything else in the overlay replaces what was there.
pub fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                if value.is_null() {
                    base_map.remove(&key);
                } else if let Some(existing) = base_map.get_mut(&key) {
                    merge_into(existing, value);
                } else {
                    base_map.insert(key, value);
                }
            }
        }
        (slot, overlay) => *slot = overlay,
    }
}

/// Turn merged YAML into validated options rooted at `base_dir`.
pub fn parse_options(value: Value, source: &Path, base_dir: &Path) -> Result<TemplateOptions> {
    let options: TemplateOptions =
        serde_yaml::from_value(value).map_err(|e| VellumError::ConfigParseError {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;
    let options = options.relative_to(base_dir);
    options.validate()?;
    Ok(options)
}

/// Load a single options file, without local overrides.
pub fn load_options_file(path: &Path) -> Result<TemplateOptions> {
    let value = load_options_value(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_options(value, path, base_dir)
}

/// Load and merge the options files of a project directory.
///
/// # Errors
///
/// Returns `ConfigNotFound` if `vellum.yml` is absent.
/// Returns `ConfigParseError` if any file is invalid.
pub fn load_merged_options(root: &Path) -> Result<TemplateOptions> {
    let paths = OptionsPaths::discover(root);
    let Some(project) = &paths.project else {
        return Err(VellumError::ConfigNotFound {
            path: root.join(OPTIONS_FILE),
        });
    };

    let mut merged = Value::Mapping(Mapping::new());
    for path in paths.all_existing() {
        tracing::debug!("Loading options from {}", path.display());
        merge_into(&mut merged, load_options_value(path)?);
    }

    parse_options(merged, project, root)
}

/// Load options with an optional explicit file.
///
/// An explicit file is loaded alone; otherwise the project files are merged.
pub fn load_options(root: &Path, override_path: Option<&Path>) -> Result<TemplateOptions> {
    match override_path {
        Some(path) => load_options_file(path),
        None => load_merged_options(root),
    }
}
