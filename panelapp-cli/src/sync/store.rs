//! Storage backends for version markers
//!
//! A store holds one string per entity id. `put` replaces the whole value
//! and readers never observe a partial write.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;
use tempfile::NamedTempFile;

use super::error::{SyncError, SyncResult};

/// File name of the marker inside each entity directory
pub const VERSION_FILE_NAME: &str = "version_created.txt";

/// Key-addressed storage for a single marker string per entity
pub trait VersionStore: Send + Sync {
    /// Raw stored value, or None if nothing was ever written
    fn get(&self, entity_id: &str) -> SyncResult<Option<String>>;

    /// Replace the stored value for an entity
    fn put(&self, entity_id: &str, value: &str) -> SyncResult<()>;
}

/// Marker files laid out as `<root>/<entity_id>/version_created.txt`
#[derive(Debug, Clone)]
pub struct FileVersionStore {
    root: PathBuf,
}

impl FileVersionStore {
    /// Create a store rooted at the directory holding per-entity folders
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the marker for an entity
    pub fn entity_dir(&self, entity_id: &str) -> SyncResult<PathBuf> {
        validate_entity_id(entity_id)?;
        Ok(self.root.join(entity_id))
    }

    /// Path of the marker file for an entity
    pub fn marker_path(&self, entity_id: &str) -> SyncResult<PathBuf> {
        Ok(self.entity_dir(entity_id)?.join(VERSION_FILE_NAME))
    }
}

impl VersionStore for FileVersionStore {
    fn get(&self, entity_id: &str) -> SyncResult<Option<String>> {
        let path = self.marker_path(entity_id)?;

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // Non UTF-8 content is a malformed marker, not a broken store
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                debug!("Marker file {} is not valid UTF-8", path.display());
                Ok(Some(String::new()))
            }
            Err(e) => Err(SyncError::storage(entity_id, Some(path), e)),
        }
    }

    fn put(&self, entity_id: &str, value: &str) -> SyncResult<()> {
        let dir = self.entity_dir(entity_id)?;
        let path = dir.join(VERSION_FILE_NAME);

        fs::create_dir_all(&dir)
            .map_err(|e| SyncError::storage(entity_id, Some(dir.clone()), e))?;

        // Write beside the target, then rename over it
        let mut tmp = NamedTempFile::new_in(&dir)
            .map_err(|e| SyncError::storage(entity_id, Some(dir.clone()), e))?;
        tmp.write_all(value.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| SyncError::storage(entity_id, Some(tmp.path().to_path_buf()), e))?;
        tmp.persist(&path)
            .map_err(|e| SyncError::storage(entity_id, Some(path.clone()), e.error))?;

        debug!("Wrote marker {} for {}", value, entity_id);
        Ok(())
    }
}

/// In-memory store, for tests and callers that need no persistence
#[derive(Debug, Default)]
pub struct MemoryVersionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a marker
    pub fn with_marker(self, entity_id: &str, value: &str) -> Self {
        self.lock().insert(entity_id.to_string(), value.to_string());
        self
    }

    /// Number of stored markers
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl VersionStore for MemoryVersionStore {
    fn get(&self, entity_id: &str) -> SyncResult<Option<String>> {
        Ok(self.lock().get(entity_id).cloned())
    }

    fn put(&self, entity_id: &str, value: &str) -> SyncResult<()> {
        validate_entity_id(entity_id)?;
        self.lock().insert(entity_id.to_string(), value.to_string());
        Ok(())
    }
}

/// Ids become directory names, so reject anything that could escape the root
fn validate_entity_id(entity_id: &str) -> SyncResult<()> {
    let invalid = entity_id.trim().is_empty()
        || entity_id == "."
        || entity_id == ".."
        || entity_id.contains(['/', '\\', '\0']);

    if invalid {
        return Err(SyncError::InvalidEntityId {
            entity_id: entity_id.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::tracker::VersionTracker;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileVersionStore::new(dir.path());
        assert_eq!(store.get("137").unwrap(), None);
    }

    #[test]
    fn test_file_store_put_creates_entity_dir() {
        let dir = TempDir::new().unwrap();
        let store = FileVersionStore::new(dir.path().join("panels"));

        store.put("137", "2024-03-01T00:00:00Z").unwrap();

        let path = dir.path().join("panels").join("137").join(VERSION_FILE_NAME);
        assert_eq!(fs::read_to_string(path).unwrap(), "2024-03-01T00:00:00Z");
        assert_eq!(
            store.get("137").unwrap().as_deref(),
            Some("2024-03-01T00:00:00Z")
        );
    }

    #[test]
    fn test_file_store_put_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FileVersionStore::new(dir.path());

        store.put("7", "2024-03-01T00:00:00Z-with-a-long-tail").unwrap();
        store.put("7", "2024-04-01T00:00:00Z").unwrap();

        assert_eq!(store.get("7").unwrap().as_deref(), Some("2024-04-01T00:00:00Z"));

        // No leftover temp files next to the marker
        let entries: Vec<_> = fs::read_dir(dir.path().join("7")).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_file_store_rejects_path_like_ids() {
        let dir = TempDir::new().unwrap();
        let store = FileVersionStore::new(dir.path());

        for id in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                store.put(id, "2024-03-01T00:00:00Z"),
                Err(SyncError::InvalidEntityId { .. })
            ));
        }
    }

    #[test]
    fn test_file_store_unreadable_marker_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = FileVersionStore::new(dir.path());

        // A directory where the marker file should be cannot be read as a file
        fs::create_dir_all(dir.path().join("9").join(VERSION_FILE_NAME)).unwrap();

        assert!(matches!(
            store.get("9"),
            Err(SyncError::StorageUnavailable { .. })
        ));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryVersionStore::new().with_marker("1", "2024-01-01T00:00:00Z");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("2").unwrap(), None);

        store.put("2", "2024-02-01T00:00:00Z").unwrap();
        assert_eq!(store.get("2").unwrap().as_deref(), Some("2024-02-01T00:00:00Z"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_file_store_concurrent_writes_are_never_partial() {
        let dir = TempDir::new().unwrap();
        let store = FileVersionStore::new(dir.path());
        // Different lengths so a torn write would show up as an unknown value
        let values: Vec<String> = (0..4)
            .map(|i| format!("2024-0{}-01T00:00:00Z{}", i + 1, " ".repeat(i * 512)))
            .collect();
        store.put("7", &values[0]).unwrap();

        thread::scope(|scope| {
            for value in &values {
                let store = &store;
                scope.spawn(move || {
                    for _ in 0..50 {
                        store.put("7", value).unwrap();
                    }
                });
            }
            for _ in 0..2 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let seen = store.get("7").unwrap().unwrap();
                        assert!(values.contains(&seen), "torn read: {:?}", seen.len());
                    }
                });
            }
        });

        assert!(values.contains(&store.get("7").unwrap().unwrap()));
        let entries: Vec<_> = fs::read_dir(dir.path().join("7")).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_file_store_non_utf8_marker_is_stale() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("3")).unwrap();
        fs::write(
            dir.path().join("3").join(VERSION_FILE_NAME),
            [0xff, 0xfe, 0x00, 0x80],
        )
        .unwrap();

        let tracker = VersionTracker::new(FileVersionStore::new(dir.path()));
        assert_eq!(tracker.read("3").unwrap(), None);
        assert!(tracker.is_stale("3", "2024-03-01T00:00:00Z").unwrap());
    }
}
