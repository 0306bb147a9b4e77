//! JSON file-backed key-value store.
//!
//! All keys live in one JSON object on disk. Every `set` rewrites the file
//! through a temporary sibling and a rename, so a crash never leaves a torn
//! file behind.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use shello_core::{KeyValueStore, StoreError};

/// File name under the user config directory.
const STATE_FILE: &str = "state.json";

/// Key-value store persisted as a JSON object.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Default location: `<config dir>/shello/state.json`. `None` if the
    /// platform has no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shello").join(STATE_FILE))
    }

    /// Open the store at `path`, loading existing contents. A missing file is
    /// an empty store.
    ///
    /// # Errors
    ///
    /// - `StoreError::Io` if the file exists but cannot be read
    /// - `StoreError::Serialization` if it is not a JSON object of strings
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "opened state file");
        Ok(Self { path, values })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp = self.path.with_extension("tmp");
        fs::write(&temp, serde_json::to_string_pretty(&self.values)?)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}
