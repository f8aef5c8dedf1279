// src/client/cache.rs

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use super::ClientError;
use crate::models::question::Question;

/// Key prefix shared by every subject entry.
pub const SUBJECT_KEY_PREFIX: &str = "questions_";

/// String key-value storage, the shape of browser localStorage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), ClientError>;
    fn remove(&mut self, key: &str) -> Result<(), ClientError>;
    fn keys(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), ClientError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ClientError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// A JSON object on disk, rewritten after every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable cache file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    /// Sibling file the next snapshot is written to before it replaces `path`.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Writes the full snapshot to a staging file, then renames it over the
    /// old one, so the file on disk is always a complete snapshot.
    fn persist(&self) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        let staging = self.staging_path();
        fs::write(&staging, raw)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), ClientError> {
        self.entries.insert(key.to_string(), value);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), ClientError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Most recently fetched question list per subject.
///
/// Entries never expire; they go away only through [`SubjectCache::clear`].
#[derive(Debug, Clone)]
pub struct SubjectCache<S> {
    store: S,
}

impl<S: KeyValueStore> SubjectCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn key(subject: &str) -> String {
        format!("{}{}", SUBJECT_KEY_PREFIX, subject)
    }

    /// Cached list for `subject`. An unreadable entry counts as a miss.
    pub fn get(&self, subject: &str) -> Option<Vec<Question>> {
        let raw = self.store.get(&Self::key(subject))?;
        match serde_json::from_str(&raw) {
            Ok(questions) => Some(questions),
            Err(e) => {
                tracing::warn!("Discarding unreadable cache entry for '{}': {}", subject, e);
                None
            }
        }
    }

    pub fn put(&mut self, subject: &str, questions: &[Question]) -> Result<(), ClientError> {
        let raw = serde_json::to_string(questions)?;
        self.store.set(&Self::key(subject), raw)
    }

    /// Removes every subject entry, leaving unrelated keys alone.
    /// Returns how many entries were removed.
    pub fn clear(&mut self) -> Result<usize, ClientError> {
        let keys: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(SUBJECT_KEY_PREFIX))
            .collect();
        for key in &keys {
            self.store.remove(key)?;
        }
        Ok(keys.len())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
