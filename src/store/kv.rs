use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::StoreError;

/// Minimal string key-value persistence, the shape of browser local storage.
///
/// Values are whole documents: callers read, modify and write back the
/// complete value. There is no partial write and no cross-process locking.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One file per key, `<dir>/<key>.json`.
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    /// Open (or create) the directory holding the key files.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|source| StoreError::Io { path, source })
    }
}

/// Process-local key-value map for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Async-safe handle to a key-value store.
///
/// Wraps the store behind `Arc<Mutex>` and runs every access on tokio's
/// blocking thread pool via `spawn_blocking`, so file I/O never ties up an
/// async worker thread.
#[derive(Clone)]
pub struct KvHandle {
    inner: Arc<std::sync::Mutex<Box<dyn KeyValueStore>>>,
}

impl KvHandle {
    pub fn new(kv: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Arc::new(std::sync::Mutex::new(Box::new(kv))),
        }
    }

    /// Run a closure with exclusive access to the store on a blocking thread.
    /// All data passed into `f` must be owned (`'static`).
    pub async fn call<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut dyn KeyValueStore) -> Result<R, StoreError> + Send + 'static,
        R: Send + 'static,
    {
        let kv = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = kv.lock().map_err(|_| StoreError::LockPoisoned)?;
            f(&mut **guard)
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kv_missing_key_is_none() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let kv = FileKv::open(dir.path())?;
        assert_eq!(kv.get("projects")?, None);
        Ok(())
    }

    #[test]
    fn test_file_kv_set_then_get() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut kv = FileKv::open(dir.path())?;
        kv.set("issues", "[]")?;
        assert_eq!(kv.get("issues")?.as_deref(), Some("[]"));
        assert!(dir.path().join("issues.json").exists());
        Ok(())
    }

    #[test]
    fn test_file_kv_creates_nested_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("a").join("b");
        let kv = FileKv::open(&nested)?;
        assert_eq!(kv.dir(), nested.as_path());
        assert!(nested.is_dir());
        Ok(())
    }

    #[test]
    fn test_memory_kv_overwrites() -> anyhow::Result<()> {
        let mut kv = MemoryKv::new();
        kv.set("projects", "[1]")?;
        kv.set("projects", "[2]")?;
        assert_eq!(kv.get("projects")?.as_deref(), Some("[2]"));
        Ok(())
    }

    #[tokio::test]
    async fn test_kv_handle_runs_closure() -> anyhow::Result<()> {
        let handle = KvHandle::new(MemoryKv::new());
        handle.call(|kv| kv.set("k", "v")).await?;
        let value = handle.call(|kv| kv.get("k")).await?;
        assert_eq!(value.as_deref(), Some("v"));
        Ok(())
    }
}
