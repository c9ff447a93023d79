use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    Parse(String),

    #[error("settings lock poisoned")]
    Poisoned,
}

/// Persisted user preferences, owned by the host application.
pub trait SettingsStore: Send + Sync {
    fn get_boolean(&self, key: &str, default: bool) -> Result<bool, SettingsError>;
}

/// In-memory implementation of the Settings Store.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    values: RwLock<HashMap<String, bool>>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_boolean(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        let mut values = self.values.write().map_err(|_| SettingsError::Poisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

impl SettingsStore for InMemorySettings {
    fn get_boolean(&self, key: &str, default: bool) -> Result<bool, SettingsError> {
        let values = self.values.read().map_err(|_| SettingsError::Poisoned)?;
        Ok(values.get(key).copied().unwrap_or(default))
    }
}

/// File-based implementation of the Settings Store.
///
/// The file is a flat JSON object. It is read on every lookup so edits made
/// by other processes are seen immediately; a missing file means "all
/// defaults".
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read-modify-write of a single key. The new document is written to a
    /// sibling temp file and renamed over the old one, so readers see either
    /// the previous or the new content, never a truncated file. Concurrent
    /// writers can still lose each other's updates.
    pub fn set_boolean(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        let mut doc = self.load()?;
        doc.insert(key.to_string(), Value::Bool(value));
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| SettingsError::Parse(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| SettingsError::Io(e.error))?;
        Ok(())
    }

    fn load(&self) -> Result<serde_json::Map<String, Value>, SettingsError> {
        if !self.path.exists() {
            return Ok(serde_json::Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| SettingsError::Parse(e.to_string()))
    }
}

impl SettingsStore for FileSettings {
    fn get_boolean(&self, key: &str, default: bool) -> Result<bool, SettingsError> {
        let doc = self.load()?;
        match doc.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(SettingsError::Parse(format!(
                "key '{}' is not a boolean: {}",
                key, other
            ))),
        }
    }
}
