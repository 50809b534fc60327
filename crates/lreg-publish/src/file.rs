//! File-backed cache and a cache that is never reachable.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{KvError, Result};
use crate::traits::KeyValueStore;

/// A [`KeyValueStore`] persisted as one JSON object on disk.
///
/// Every `set` rewrites the whole file through a temporary file in the same
/// directory followed by a rename, so readers never see a torn file.
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKvStore {
    /// Open (without creating) a cache file. The file is created on the
    /// first `set`; its parent directory must exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| KvError::Serialization(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let encoded = serde_json::to_vec_pretty(values)
            .map_err(|e| KvError::Serialization(e.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&encoded)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| KvError::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| KvError::Unreachable(format!("lock poisoned: {e}")))?;
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.store(&values)?;
        debug!(key, path = %self.path.display(), "cache value written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// A [`KeyValueStore`] whose every call fails as unreachable.
///
/// Stands in for a cache that is not configured or not running.
#[derive(Debug, Clone)]
pub struct UnreachableKvStore {
    endpoint: Option<String>,
}

impl UnreachableKvStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
        }
    }

    /// No backend at all; failures are reported as [`KvError::NotConfigured`].
    pub fn not_configured() -> Self {
        Self { endpoint: None }
    }

    fn error(&self) -> KvError {
        match &self.endpoint {
            Some(endpoint) => KvError::Unreachable(endpoint.clone()),
            None => KvError::NotConfigured,
        }
    }
}

impl KeyValueStore for UnreachableKvStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(self.error())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(self.error())
    }

    fn describe(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("unreachable:{endpoint}"),
            None => "none".into(),
        }
    }
}
