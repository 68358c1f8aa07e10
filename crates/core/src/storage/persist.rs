use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::resource::json_type_name;

/// Durable key-value store the session is persisted into.
///
/// Values are opaque strings (the session stores JSON in them).
pub trait PersistStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// Process-local store. Nothing survives a restart; used in tests and for
/// one-shot sessions.
#[derive(Debug, Default)]
pub struct MemoryPersistStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryPersistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistStore for MemoryPersistStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// One JSON object on disk, `{ key: value, ... }`.
///
/// Every write rewrites the whole file; a missing file reads as empty.
#[derive(Debug)]
pub struct FilePersistStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePersistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries on disk, plus whether the file was intact. An unparsable
    /// file or one that is not a JSON object reads as empty and is
    /// overwritten on the next write.
    fn read_all(&self) -> Result<(Map<String, Value>, bool), CoreError> {
        if !self.path.exists() {
            return Ok((Map::new(), true));
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok((Map::new(), true));
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok((map, true)),
            Ok(other) => {
                tracing::warn!(
                    path = %self.path.display(),
                    found = json_type_name(&other),
                    "session file is not a JSON object, discarding"
                );
                Ok((Map::new(), false))
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "session file is corrupt, discarding"
                );
                Ok((Map::new(), false))
            }
        }
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<(), CoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl PersistStore for FilePersistStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let _guard = self.lock.lock();
        let (entries, _) = self.read_all()?;
        Ok(entries
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let _guard = self.lock.lock();
        let (mut entries, _) = self.read_all()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let _guard = self.lock.lock();
        let (mut entries, intact) = self.read_all()?;
        if entries.remove(key).is_some() || !intact {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
