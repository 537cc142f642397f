//! Persistent travel-time cache.
//!
//! A lowercase station name maps to resolved minutes to the hub. The file
//! is read once at construction and flushed after every insert, so a
//! committed value survives the process and is never re-queried. The cache
//! assumes single-instance, sequential use; there is no file locking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Errors writing the cache file.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem failure
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure
    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Disk-backed travel-time cache keyed by lowercased station name.
#[derive(Debug)]
pub struct CommuteCache {
    path: PathBuf,
    entries: HashMap<String, u32>,
}

impl CommuteCache {
    /// Open the cache at `path`, reading any existing entries.
    ///
    /// A missing file starts empty; an unreadable or corrupt file is
    /// logged and treated as empty rather than aborting.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("ignoring corrupt commute cache at {}: {err}", path.display());
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self { path, entries }
    }

    /// Cached minutes for a station, if any. Keys are case-insensitive.
    pub fn get(&self, station_name: &str) -> Option<u32> {
        self.entries.get(&station_name.to_lowercase()).copied()
    }

    /// Commit a resolved value and flush to disk.
    ///
    /// Once written, the value is authoritative for this key.
    pub fn insert(&mut self, station_name: &str, minutes: u32) -> Result<(), CacheError> {
        self.entries.insert(station_name.to_lowercase(), minutes);
        self.flush()
    }

    fn flush(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn keys_are_case_insensitive() {
        let dir = tempdir().unwrap();
        let mut cache = CommuteCache::open(dir.path().join("times.json"));

        cache.insert("St Albans City", 20).unwrap();

        assert_eq!(cache.get("st albans city"), Some(20));
        assert_eq!(cache.get("ST ALBANS CITY"), Some(20));
        assert_eq!(cache.get("Hitchin"), None);
    }

    #[test]
    fn survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("times.json");

        let mut cache = CommuteCache::open(&path);
        cache.insert("Hitchin", 32).unwrap();
        drop(cache);

        let reopened = CommuteCache::open(&path);
        assert_eq!(reopened.get("Hitchin"), Some(32));
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let cache = CommuteCache::open(dir.path().join("absent.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("times.json");
        std::fs::write(&path, "not json at all").unwrap();

        let cache = CommuteCache::open(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("cache").join("times.json");

        let mut cache = CommuteCache::open(&path);
        cache.insert("Bedford", 40).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn insert_overwrites() {
        let dir = tempdir().unwrap();
        let mut cache = CommuteCache::open(dir.path().join("times.json"));

        cache.insert("Luton", 25).unwrap();
        cache.insert("Luton", 28).unwrap();

        assert_eq!(cache.get("Luton"), Some(28));
        assert_eq!(cache.len(), 1);
    }
}
