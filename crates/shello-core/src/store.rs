//! Persistent key-value seam.
//!
//! The engine only ever stores JSON strings under a handful of keys; what
//! holds them (a file, a browser store, memory) is up to the frontend.

use std::collections::HashMap;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::StoreError;

/// Key of the [`crate::SessionSnapshot`].
pub const SESSION_KEY: &str = "session";

/// Key of the name-indexed saved theme map.
pub const THEMES_KEY: &str = "themes";

/// String key-value persistence.
pub trait KeyValueStore {
    /// Value stored under `key`. `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Decode the JSON value under `key`. `None` if absent.
///
/// # Errors
///
/// - `StoreError::Serialization` if the stored text is not the expected JSON
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    store.get(key)?.map(|text| serde_json::from_str(&text)).transpose().map_err(StoreError::from)
}

/// Encode `value` as JSON under `key`.
pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.set(key, serde_json::to_string(value)?)
}

/// In-memory store. Contents are lost on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
