use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use super::model::StorageResult;

/// String key/value storage in the manner of browser local storage.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Keeps each key in `<dir>/<key>.json`.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.dir)?;
        // Write then rename so a crash never leaves half a file behind.
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.values().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_backend() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path().join("nested"));

        assert_eq!(backend.get("k").unwrap(), None);
        backend.set("k", "[1,2]").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.path().join("nested/k.json").exists());

        backend.remove("k").unwrap();
        assert_eq!(backend.get("k").unwrap(), None);
        backend.remove("k").unwrap();
    }

    #[test]
    fn test_memory_backend() {
        let backend = MemoryBackend::new();
        backend.set("a", "1").unwrap();
        assert_eq!(backend.get("a").unwrap().as_deref(), Some("1"));
        backend.remove("a").unwrap();
        assert_eq!(backend.get("a").unwrap(), None);
    }
}
