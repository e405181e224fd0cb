use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

use crate::errors::StoreError;

pub const CHAT_HISTORY_KEY: &str = "chat-history";
pub const MOOD_HISTORY_KEY: &str = "mood-history";

/// Envelope version written by [`SessionStore::save`]
const STORE_VERSION: u32 = 1;

/// Raw string storage addressed by key, one isolated instance per device
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a key that is not present is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized = key.replace(|c: char| !c.is_alphanumeric() && c != '-' && c != '_', "_");
        self.dir.join(format!("{}.json", sanitized))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        fs::write(&path, value)?;
        debug!(path = %path.display(), bytes = value.len(), "Wrote store entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store for tests and runs that should leave nothing behind
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|e| {
            StoreError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|e| {
            StoreError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|e| {
            StoreError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        entries.remove(key);
        Ok(())
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    entries: &'a [T],
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    version: Option<u32>,
    entries: Vec<T>,
}

/// Typed, versioned collections on top of a [`KeyValueStore`].
///
/// Loads never fail: anything missing, unreadable or of an unknown version
/// comes back as an empty collection. Saves overwrite the whole collection.
#[derive(Debug)]
pub struct SessionStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "No stored entry, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to read stored entry, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Envelope<T>>(&raw) {
            Ok(envelope) if envelope.version == Some(STORE_VERSION) => envelope.entries,
            Ok(envelope) => {
                warn!(key, version = ?envelope.version, "Unsupported store version, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(key, error = %e, "Malformed stored entry, starting empty");
                Vec::new()
            }
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, entries: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_string(&EnvelopeRef {
            version: STORE_VERSION,
            entries,
        })?;
        self.backend.set(key, &json)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, Message, Mood, MoodEntry, Sender};
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    fn transcript() -> Vec<Message> {
        let start = Utc::now();
        vec![
            Message::new(1, "Hello! I'm CURA.", Sender::Assistant, start, None),
            Message::new(
                2,
                "I'm feeling anxious today.",
                Sender::User,
                start + Duration::seconds(1),
                Some(Classification::Mood),
            ),
            Message::new(
                3,
                "Let's breathe together.",
                Sender::Assistant,
                start + Duration::seconds(2),
                Some(Classification::Normal),
            ),
        ]
    }

    #[test]
    fn test_round_trip_in_memory() {
        let store = SessionStore::new(InMemoryStore::new());
        let messages = transcript();

        store.save(CHAT_HISTORY_KEY, &messages).unwrap();
        let loaded: Vec<Message> = store.load(CHAT_HISTORY_KEY);
        assert_eq!(loaded, messages);

        // Saving what was loaded changes nothing
        store.save(CHAT_HISTORY_KEY, &loaded).unwrap();
        let reloaded: Vec<Message> = store.load(CHAT_HISTORY_KEY);
        assert_eq!(reloaded, messages);
    }

    #[test]
    fn test_round_trip_file_store() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(FileStore::new(dir.path().join("cura")));
        let moods = vec![MoodEntry {
            id: 1,
            mood: Mood::Calm,
            timestamp: Utc::now(),
            note: Some("after a walk".to_string()),
        }];

        store.save(MOOD_HISTORY_KEY, &moods).unwrap();
        assert!(dir.path().join("cura").join("mood-history.json").exists());

        let loaded: Vec<MoodEntry> = store.load(MOOD_HISTORY_KEY);
        assert_eq!(loaded, moods);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(FileStore::new(dir.path()));
        let loaded: Vec<Message> = store.load(CHAT_HISTORY_KEY);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_malformed_entry_is_empty() {
        let backend = InMemoryStore::new();
        backend.set(CHAT_HISTORY_KEY, "{not json").unwrap();
        let store = SessionStore::new(backend);

        let loaded: Vec<Message> = store.load(CHAT_HISTORY_KEY);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_unversioned_or_unknown_version_is_empty() {
        let backend = InMemoryStore::new();
        backend.set(CHAT_HISTORY_KEY, "[]").unwrap();
        backend
            .set(MOOD_HISTORY_KEY, r#"{"version": 2, "entries": []}"#)
            .unwrap();
        let store = SessionStore::new(backend);

        assert!(store.load::<Message>(CHAT_HISTORY_KEY).is_empty());
        assert!(store.load::<MoodEntry>(MOOD_HISTORY_KEY).is_empty());
    }

    #[test]
    fn test_wrong_shape_is_empty() {
        let backend = InMemoryStore::new();
        backend
            .set(MOOD_HISTORY_KEY, r#"{"version": 1, "entries": [{"mood": "elated"}]}"#)
            .unwrap();
        let store = SessionStore::new(backend);

        assert!(store.load::<MoodEntry>(MOOD_HISTORY_KEY).is_empty());
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(FileStore::new(dir.path()));
        store.save(CHAT_HISTORY_KEY, &transcript()).unwrap();

        store.remove(CHAT_HISTORY_KEY).unwrap();
        assert!(store.backend().get(CHAT_HISTORY_KEY).unwrap().is_none());

        // Already gone
        store.remove(CHAT_HISTORY_KEY).unwrap();
    }

    #[test]
    fn test_keys_are_independent() {
        let store = SessionStore::new(InMemoryStore::new());
        store.save(CHAT_HISTORY_KEY, &transcript()).unwrap();
        store.remove(MOOD_HISTORY_KEY).unwrap();

        assert_eq!(store.load::<Message>(CHAT_HISTORY_KEY).len(), 3);
    }
}
