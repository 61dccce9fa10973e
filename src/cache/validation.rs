//! Staleness checks for compiled artifacts.

use std::fs;
use std::path::Path;

use super::ArtifactStore;
use crate::error::Result;

/// Decides whether stored artifacts can be reused.
pub struct ArtifactValidator<'a> {
    store: &'a ArtifactStore,
}

/// Result of a staleness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No artifact has been written yet.
    Missing,
    /// Artifact can be used as is.
    Fresh,
    /// Artifact is older than its source.
    Stale,
}

impl Freshness {
    /// Whether the artifact must be rebuilt.
    pub fn needs_compile(self) -> bool {
        !matches!(self, Freshness::Fresh)
    }
}

impl<'a> ArtifactValidator<'a> {
    /// Create a new validator.
    pub fn new(store: &'a ArtifactStore) -> Self {
        Self { store }
    }

    /// Check the artifact for `source`.
    ///
    /// Without `debug` an existing artifact is always fresh, whatever happened
    /// to the source since. With `debug` it is stale when its modification
    /// time is strictly older than the source's.
    pub fn check(&self, instance_id: &str, source: &Path, debug: bool) -> Result<Freshness> {
        let artifact = self.store.artifact_path(instance_id, source);
        if !artifact.exists() {
            return Ok(Freshness::Missing);
        }
        if !debug {
            return Ok(Freshness::Fresh);
        }

        let built = fs::metadata(&artifact)?.modified()?;
        let edited = fs::metadata(source)?.modified()?;

        if built < edited {
            Ok(Freshness::Stale)
        } else {
            Ok(Freshness::Fresh)
        }
    }
}
