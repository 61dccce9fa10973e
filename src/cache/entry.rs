//! Artifact listing entries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Leading fields of a stored program, enough to describe it without
/// decoding its instructions.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactHeader {
    pub instance_id: String,
    pub source: PathBuf,
    pub compiled_at: DateTime<Utc>,
}

/// A compiled artifact found in the store.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactEntry {
    /// Artifact file.
    pub path: PathBuf,
    /// Instance that compiled it.
    pub instance_id: String,
    /// View source it was compiled from.
    pub source: PathBuf,
    /// Compile time.
    pub compiled_at: DateTime<Utc>,
    /// Size on disk in bytes.
    pub size_bytes: u64,
}

impl ArtifactEntry {
    /// Create an entry from a decoded header.
    pub fn new(path: PathBuf, header: ArtifactHeader, size_bytes: u64) -> Self {
        Self {
            path,
            instance_id: header.instance_id,
            source: header.source,
            compiled_at: header.compiled_at,
            size_bytes,
        }
    }

    /// Time since compilation.
    pub fn age(&self) -> Duration {
        Utc::now() - self.compiled_at
    }

    /// Whether the view source still exists.
    pub fn source_exists(&self) -> bool {
        self.source.exists()
    }
}
