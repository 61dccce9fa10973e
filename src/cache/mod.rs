//! Compiled view cache.
//!
//! Views are compiled once and the resulting [`Program`] is stored as JSON
//! under the compiled directory. Artifacts are keyed by instance id and the
//! absolute source path, so two differently configured instances never share
//! one.
//!
//! # Reuse policy
//!
//! - Debug disabled: an existing artifact is always reused ("build once").
//! - Debug enabled: an artifact older than its source is rebuilt.
//! - Compiler disabled: no artifact is involved; the source file is read as
//!   literal text.

pub mod entry;
pub mod store;
pub mod validation;

pub use entry::{ArtifactEntry, ArtifactHeader};
pub use store::ArtifactStore;
pub use validation::{ArtifactValidator, Freshness};

use crate::compiler::Program;
use crate::config::TemplateOptions;
use crate::error::{Result, VellumError};
use std::fs;
use std::path::{Path, PathBuf};

/// What a view resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedView {
    /// The source itself, when the compiler is disabled.
    Source(PathBuf),
    /// A compiled artifact.
    Compiled(PathBuf),
}

impl ResolvedView {
    /// Path to read.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedView::Source(path) | ResolvedView::Compiled(path) => path,
        }
    }
}

enum Prepared {
    Source(PathBuf),
    Cached(PathBuf),
    Built(PathBuf, Program),
}

/// Resolves views to reusable programs, compiling on demand.
pub struct ArtifactCache {
    store: ArtifactStore,
    compiler_enabled: bool,
    debug_enabled: bool,
}

impl ArtifactCache {
    /// Create a cache writing to `compiled_directory`.
    pub fn new(
        compiled_directory: impl Into<PathBuf>,
        compiler_enabled: bool,
        debug_enabled: bool,
    ) -> Self {
        Self {
            store: ArtifactStore::new(compiled_directory),
            compiler_enabled,
            debug_enabled,
        }
    }

    /// Create a cache configured by `options`.
    pub fn from_options(options: &TemplateOptions) -> Self {
        Self::new(
            options.compiled_directory.clone(),
            options.compiler_enabled,
            options.debug_enabled,
        )
    }

    /// Underlying artifact store.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Resolve `source` to the path that should be loaded, compiling it with
    /// `compile` if no reusable artifact exists.
    ///
    /// # Errors
    ///
    /// Returns `MissingSource` if `source` does not exist, even when an
    /// artifact for it is still stored, and `CacheWrite` if a fresh artifact
    /// cannot be persisted.
    pub fn resolve<F>(&self, instance_id: &str, source: &Path, compile: F) -> Result<ResolvedView>
    where
        F: FnOnce(&Path, &str) -> Result<Program>,
    {
        Ok(match self.prepare(instance_id, source, compile)? {
            Prepared::Source(path) => ResolvedView::Source(path),
            Prepared::Cached(path) | Prepared::Built(path, _) => ResolvedView::Compiled(path),
        })
    }

    /// Like [`resolve`](Self::resolve), but returns the program to execute.
    ///
    /// With the compiler disabled the whole source file becomes one literal
    /// text instruction.
    pub fn load<F>(&self, instance_id: &str, source: &Path, compile: F) -> Result<Program>
    where
        F: FnOnce(&Path, &str) -> Result<Program>,
    {
        match self.prepare(instance_id, source, compile)? {
            Prepared::Source(path) => {
                let text = fs::read_to_string(&path)?;
                Ok(Program::literal(instance_id, path, text))
            }
            Prepared::Cached(path) => self.store.read(&path),
            Prepared::Built(_, program) => Ok(program),
        }
    }

    fn prepare<F>(&self, instance_id: &str, source: &Path, compile: F) -> Result<Prepared>
    where
        F: FnOnce(&Path, &str) -> Result<Program>,
    {
        if !source.is_file() {
            return Err(VellumError::MissingSource {
                path: source.to_path_buf(),
            });
        }

        if !self.compiler_enabled {
            return Ok(Prepared::Source(source.to_path_buf()));
        }

        let source = source.canonicalize()?;
        let freshness =
            ArtifactValidator::new(&self.store).check(instance_id, &source, self.debug_enabled)?;

        if !freshness.needs_compile() {
            let path = self.store.artifact_path(instance_id, &source);
            tracing::debug!("Reusing compiled view {}", path.display());
            return Ok(Prepared::Cached(path));
        }

        tracing::debug!("Compiling {} ({:?})", source.display(), freshness);
        let text = fs::read_to_string(&source)?;
        let program = compile(&source, &text)?;
        let path = self.store.write(&program)?;
        tracing::info!("Compiled {} -> {}", source.display(), path.display());
        Ok(Prepared::Built(path, program))
    }
}
