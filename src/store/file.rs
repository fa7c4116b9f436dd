//! File-backed and in-memory key-value stores
//!
//! `FileStore` keeps one JSON file per key in an XDG-compliant data directory,
//! `MemoryStore` keeps everything in a map for tests and throwaway sessions.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::KeyValueStore;

/// Stores each key as `<key>.json` in a directory
///
/// Uses `~/.local/share/himla/` on Linux, or the equivalent platform data path.
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where value files are stored
    data_dir: PathBuf,
}

impl FileStore {
    /// Creates a new FileStore in the platform data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "himla")?;
        let data_dir = project_dirs.data_dir().to_path_buf();
        Some(Self { data_dir })
    }

    /// Creates a new FileStore with a custom directory
    pub fn with_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Directory the values live in
    pub fn dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the path to the file for the given key
    fn value_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.value_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::write(self.value_path(key), value)
    }
}

/// Keeps values in memory only
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "memory store poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
