use super::files::{atomic_write, read_file};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Key holding the active task list
pub const TODOS_KEY: &str = "todos";
/// Key holding the archived task list
pub const ARCHIVED_KEY: &str = "archivedTodos";
/// Key holding theme/audio/timer preferences
pub const SETTINGS_KEY: &str = "settings";

/// String key-value storage, the equivalent of browser local storage.
/// Each key holds one JSON document, written whole.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Shared handle so the task store and settings can write to the same backend
pub type SharedStore = Arc<dyn KeyValueStore>;

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        read_file(self.path_for(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        atomic_write(self.path_for(key), value)
    }
}

/// In-memory storage for tests. Clones share the same map.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<std::sync::Mutex<std::collections::HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(inner.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        inner.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read and decode a key; a missing key yields None
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) if !raw.trim().is_empty() => {
            let value = serde_json::from_str(&raw)
                .with_context(|| format!("Stored value for '{}' is not valid JSON", key))?;
            Ok(Some(value))
        }
        _ => Ok(None),
    }
}

/// Encode and write a key
pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(store.get(TODOS_KEY).unwrap().is_none());
        store.set(TODOS_KEY, "[]").unwrap();
        assert_eq!(store.get(TODOS_KEY).unwrap().as_deref(), Some("[]"));
        assert!(temp_dir.path().join("todos.json").exists());
    }

    #[test]
    fn test_key_file_names() {
        let store = FileStore::new("/data");
        assert_eq!(store.path_for(TODOS_KEY), PathBuf::from("/data/todos.json"));
        assert_eq!(store.path_for(ARCHIVED_KEY), PathBuf::from("/data/archivedTodos.json"));
        assert_eq!(store.path_for(SETTINGS_KEY), PathBuf::from("/data/settings.json"));
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_load_json_missing_and_blank() {
        let store = MemoryStore::new();
        let missing: Option<Vec<u32>> = load_json(&store, "nums").unwrap();
        assert!(missing.is_none());

        store.set("nums", "  ").unwrap();
        let blank: Option<Vec<u32>> = load_json(&store, "nums").unwrap();
        assert!(blank.is_none());
    }

    #[test]
    fn test_load_json_rejects_garbage() {
        let store = MemoryStore::new();
        store.set("nums", "{not json").unwrap();
        let result: Result<Option<Vec<u32>>> = load_json(&store, "nums");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_then_load_json() {
        let store = MemoryStore::new();
        save_json(&store, "nums", &vec![1u32, 2, 3]).unwrap();
        let loaded: Option<Vec<u32>> = load_json(&store, "nums").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }
}
