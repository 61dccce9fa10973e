//! Compiled artifact storage.

use anyhow::Context;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::entry::{ArtifactEntry, ArtifactHeader};
use crate::compiler::Program;
use crate::error::{Result, VellumError};

/// Storage for compiled programs, one JSON file per (instance, source) pair.
pub struct ArtifactStore {
    /// Root directory for artifacts.
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a new artifact store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the artifact root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the artifact compiled by `instance_id` from `source`.
    ///
    /// Depends only on the two inputs, never on the source's content.
    pub fn artifact_path(&self, instance_id: &str, source: &Path) -> PathBuf {
        let key = format!("{}{}", instance_id, source.to_string_lossy());
        let hash = Sha256::digest(key.as_bytes());
        let hash_str = hex::encode(&hash[..16]);
        self.root.join(format!("{}.json", hash_str))
    }

    /// Persist a program, overwriting any previous artifact.
    pub fn write(&self, program: &Program) -> Result<PathBuf> {
        let path = self.artifact_path(&program.instance_id, &program.source);
        let write_error = |path: &Path, message: String| VellumError::CacheWrite {
            path: path.to_path_buf(),
            message,
        };

        fs::create_dir_all(&self.root).map_err(|e| write_error(&self.root, e.to_string()))?;
        let json =
            serde_json::to_string(program).map_err(|e| write_error(&path, e.to_string()))?;
        fs::write(&path, json).map_err(|e| write_error(&path, e.to_string()))?;

        Ok(path)
    }

    /// Load the program stored at `path`.
    pub fn read(&self, path: &Path) -> Result<Program> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read compiled view {:?}", path))?;
        serde_json::from_str(&json).map_err(|e| VellumError::CorruptArtifact {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Remove one artifact.
    pub fn remove(&self, instance_id: &str, source: &Path) -> Result<bool> {
        let path = self.artifact_path(instance_id, source);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        Ok(true)
    }

    /// List stored artifacts, newest first.
    ///
    /// Files that do not decode as artifacts are skipped.
    pub fn list(&self) -> Result<Vec<ArtifactEntry>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();

        let dir = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read compiled directory {:?}", self.root))?;
        for entry in dir {
            let path = entry?.path();

            if path.extension().is_some_and(|e| e == "json") {
                if let Ok(json) = fs::read_to_string(&path) {
                    match serde_json::from_str::<ArtifactHeader>(&json) {
                        Ok(header) => {
                            entries.push(ArtifactEntry::new(path, header, json.len() as u64))
                        }
                        Err(e) => tracing::warn!("Skipping unreadable artifact {:?}: {}", path, e),
                    }
                }
            }
        }

        entries.sort_by(|a, b| b.compiled_at.cmp(&a.compiled_at));
        Ok(entries)
    }

    /// Remove every stored artifact.
    ///
    /// Returns how many artifacts were actually deleted.
    pub fn clear(&self) -> Result<usize> {
        Ok(remove_entries(&self.list()?))
    }

    /// Total artifact size in bytes.
    pub fn total_size(&self) -> Result<u64> {
        let entries = self.list()?;
        Ok(entries.iter().map(|e| e.size_bytes).sum())
    }
}

fn remove_entries(entries: &[ArtifactEntry]) -> usize {
    entries
        .iter()
        .filter(|entry| match fs::remove_file(&entry.path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to remove artifact {:?}: {}", entry.path, e);
                false
            }
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Node;
    use tempfile::TempDir;

    fn program(id: &str, source: &str, text: &str) -> Program {
        Program::new(
            id,
            source,
            vec![Node::Text {
                text: text.to_string(),
            }],
        )
    }

    #[test]
    fn write_and_read() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path());

        let original = program("abc", "/views/hello.tpl", "Hello");
        let path = store.write(&original).unwrap();

        assert_eq!(path, store.artifact_path("abc", Path::new("/views/hello.tpl")));
        assert_eq!(store.read(&path).unwrap(), original);
    }

    #[test]
    fn write_creates_root() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path().join("nested/compiled"));

        store.write(&program("abc", "/v.tpl", "x")).unwrap();
        assert!(store.root().is_dir());
    }

    #[test]
    fn write_to_unwritable_root_is_cache_write_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = ArtifactStore::new(&blocker);

        let err = store.write(&program("abc", "/v.tpl", "x")).unwrap_err();
        assert!(matches!(err, VellumError::CacheWrite { .. }));
    }

    #[test]
    fn corrupt_artifact_is_reported() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path());
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = store.read(&path).unwrap_err();
        assert!(matches!(err, VellumError::CorruptArtifact { .. }));
    }

    #[test]
    fn artifact_path_is_deterministic() {
        let store = ArtifactStore::new("/compiled");

        let path1 = store.artifact_path("id", Path::new("/views/a.tpl"));
        let path2 = store.artifact_path("id", Path::new("/views/a.tpl"));
        assert_eq!(path1, path2);
        assert_eq!(path1.extension().unwrap(), "json");
        assert_eq!(path1.file_stem().unwrap().len(), 32);
    }

    #[test]
    fn artifact_path_depends_on_instance_and_source() {
        let store = ArtifactStore::new("/compiled");
        let base = store.artifact_path("id", Path::new("/views/a.tpl"));

        assert_ne!(base, store.artifact_path("other", Path::new("/views/a.tpl")));
        assert_ne!(base, store.artifact_path("id", Path::new("/views/b.tpl")));
    }

    #[test]
    fn remove_artifact() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path());
        store.write(&program("id", "/v.tpl", "x")).unwrap();

        assert!(store.remove("id", Path::new("/v.tpl")).unwrap());
        assert!(!store.remove("id", Path::new("/v.tpl")).unwrap());
    }

    #[test]
    fn list_skips_foreign_files() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path());
        store.write(&program("id", "/a.tpl", "a")).unwrap();
        store.write(&program("id", "/b.tpl", "b")).unwrap();
        std::fs::write(temp.path().join("notes.json"), "[]").unwrap();
        std::fs::write(temp.path().join("readme.txt"), "hi").unwrap();

        let entries = store.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.instance_id == "id"));
    }

    #[test]
    fn list_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path().join("absent"));
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.clear().unwrap(), 0);
    }

    #[test]
    fn clear_and_total_size() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path());
        let a = store.write(&program("id", "/a.tpl", "aaaa")).unwrap();
        let b = store.write(&program("id", "/b.tpl", "bb")).unwrap();

        let expected = std::fs::metadata(&a).unwrap().len() + std::fs::metadata(&b).unwrap().len();
        assert_eq!(store.total_size().unwrap(), expected);

        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn failed_removals_are_not_counted() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path());
        store.write(&program("id", "/a.tpl", "a")).unwrap();
        store.write(&program("id", "/b.tpl", "b")).unwrap();

        let entries = store.list().unwrap();
        std::fs::remove_file(&entries[0].path).unwrap();

        assert_eq!(remove_entries(&entries), 1);
        assert!(store.list().unwrap().is_empty());
    }
}
