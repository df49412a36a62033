// Cache store for the shop snapshot.
// Reads and writes the JSON array of shops; every failure degrades to a cache miss.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::Result;
use crate::shops::{ShopRecord, decode};

/// Local JSON snapshot of the shop list.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: Option<PathBuf>,
}

impl CacheStore {
    /// A store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store in the platform cache directory.
    ///
    /// When no cache directory can be resolved the store behaves as
    /// permanently empty and silently drops writes.
    pub fn default_location() -> Self {
        Self {
            path: super::paths::shops_path(),
        }
    }

    /// The snapshot file, if one could be resolved.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load the snapshot. Missing or unreadable files count as a miss.
    pub fn load(&self) -> Option<Vec<ShopRecord>> {
        let path = self.path.as_deref()?;

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no shop cache");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read shop cache");
                return None;
            }
        };

        match decode::decode_snapshot(&bytes) {
            Ok(shops) => {
                tracing::debug!(path = %path.display(), count = shops.len(), "loaded shop cache");
                Some(shops)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable shop cache");
                None
            }
        }
    }

    /// Write the snapshot. Failures are logged and otherwise ignored.
    pub fn save(&self, shops: &[ShopRecord]) {
        let Some(path) = self.path.as_deref() else {
            return;
        };

        if let Err(e) = write_json(path, shops) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write shop cache");
        }
    }

    /// Delete the snapshot so the next read goes to the network.
    pub fn clear(&self) -> Result<()> {
        if let Some(path) = self.path.as_deref() {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Modification time of the snapshot file.
    pub fn modified_at(&self) -> Option<SystemTime> {
        let path = self.path.as_deref()?;
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

/// Write JSON atomically via a temp file in the same directory.
pub(crate) fn write_json<T: serde::Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("nested").join("shops.json"));

        store.save(&[ShopRecord::sample()]);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Hani Honey Company");
        assert_eq!(loaded[0].coordinates, vec![27.1942, -80.2498]);
        assert!(store.modified_at().is_some());
    }

    #[test]
    fn test_file_is_plain_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shops.json");
        let store = CacheStore::new(&path);

        store.save(&[ShopRecord::sample()]);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let entries = raw.as_array().unwrap();
        assert_eq!(entries[0]["description"], ShopRecord::sample().details);
        assert!(entries[0].get("fetched_at").is_none());
    }

    #[test]
    fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("nonexistent.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_corrupt_file_is_miss() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shops.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(CacheStore::new(&path).load().is_none());
    }

    #[test]
    fn test_save_failure_swallowed() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let store = CacheStore::new(blocker.join("shops.json"));
        store.save(&[ShopRecord::sample()]);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("shops.json"));

        store.clear().unwrap();
        store.save(&[ShopRecord::sample()]);
        assert!(store.load().is_some());

        store.clear().unwrap();
        assert!(store.load().is_none());
    }
}
