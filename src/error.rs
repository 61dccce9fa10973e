//! Error types for Vellum operations.
//!
//! This module defines [`VellumError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Missing views, unknown instances and unwritable caches are fatal and
//!   surface as distinct variants so callers can report the offending path
//! - A span that no rule recognizes is not an error; it renders verbatim
//! - Use `anyhow::Error` (via `VellumError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Vellum operations.
#[derive(Debug, Error)]
pub enum VellumError {
    /// Requested view or layout file is absent on disk.
    #[error("View file not found: {path}")]
    MissingSource { path: PathBuf },

    /// A `template`/`yield` tag or registry lookup names an unknown instance.
    #[error("No template instance registered under id {id}")]
    UnknownInstance { id: String },

    /// Compiled output could not be persisted.
    #[error("Failed to write compiled view {path}: {message}")]
    CacheWrite { path: PathBuf, message: String },

    /// Compiled output exists but cannot be decoded.
    #[error("Corrupt compiled view {path}: {message}")]
    CorruptArtifact { path: PathBuf, message: String },

    /// Tag structure in a view is malformed (unbalanced loop/if).
    #[error("Syntax error in {path}: {message}")]
    Syntax { path: PathBuf, message: String },

    /// An expression could not be parsed.
    #[error("Invalid expression '{expr}': {message}")]
    Expression { expr: String, message: String },

    /// Evaluating compiled code failed at render time.
    #[error("Render failed: {message}")]
    Render { message: String },

    /// Values passed to assign cannot be merged into bindings.
    #[error("Invalid bindings: {message}")]
    InvalidBindings { message: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Vellum operations.
pub type Result<T> = std::result::Result<T, VellumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_displays_path() {
        let err = VellumError::MissingSource {
            path: PathBuf::from("/views/hello.tpl"),
        };
        assert!(err.to_string().contains("/views/hello.tpl"));
    }

    #[test]
    fn unknown_instance_displays_id() {
        let err = VellumError::UnknownInstance {
            id: "abc123".into(),
        };
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn cache_write_displays_path_and_message() {
        let err = VellumError::CacheWrite {
            path: PathBuf::from("/compiled/x.json"),
            message: "permission denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/compiled/x.json"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn syntax_error_displays_path_and_message() {
        let err = VellumError::Syntax {
            path: PathBuf::from("list.tpl"),
            message: "unclosed loop".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("list.tpl"));
        assert!(msg.contains("unclosed loop"));
    }

    #[test]
    fn expression_error_displays_source() {
        let err = VellumError::Expression {
            expr: "a ==".into(),
            message: "unexpected end".into(),
        };
        assert!(err.to_string().contains("a =="));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: VellumError = io_err.into();
        assert!(matches!(err, VellumError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(VellumError::ConfigValidationError {
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
