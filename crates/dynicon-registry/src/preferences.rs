//! Durable key-value preference storage
//!
//! A namespaced string store, the platform's private shared preferences.
//! [`PreferenceStore::put_string`] reports whether the write was committed;
//! callers treat `Ok(false)` as a persist failure.

use dynicon_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Durable string store keyed by (namespace, key)
pub trait PreferenceStore: Send + Sync {
    fn get_string(&self, namespace: &str, key: &str) -> Result<Option<String>>;

    /// Write a value, returning whether the write was committed
    fn put_string(&self, namespace: &str, key: &str, value: &str) -> Result<bool>;

    /// Remove a key, returning whether the removal was committed
    fn remove(&self, namespace: &str, key: &str) -> Result<bool>;
}

/// In-process preference store
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    entries: Mutex<HashMap<String, BTreeMap<String, String>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, BTreeMap<String, String>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_string(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries()
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned())
    }

    fn put_string(&self, namespace: &str, key: &str, value: &str) -> Result<bool> {
        self.entries()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(true)
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<bool> {
        if let Some(ns) = self.entries().get_mut(namespace) {
            ns.remove(key);
        }
        Ok(true)
    }
}

/// On-disk shape of a namespace file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct PreferenceFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Preference store writing one TOML file per namespace
#[derive(Debug)]
pub struct FilePreferences {
    dir: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FilePreferences {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{}.toml", namespace))
    }

    fn load(&self, namespace: &str) -> Result<PreferenceFile> {
        let path = self.namespace_path(namespace);
        if !path.exists() {
            return Ok(PreferenceFile::default());
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {:?}: {}", path, e)))
    }

    fn save(&self, namespace: &str, file: &PreferenceFile) -> Result<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)
                .map_err(|e| Error::config(format!("Failed to create {:?}: {}", self.dir, e)))?;
        }

        let path = self.namespace_path(namespace);
        let temp_path = self.dir.join(format!(".{}.toml.tmp", namespace));

        let content = toml::to_string_pretty(file)
            .map_err(|e| Error::config(format!("Failed to serialize preferences: {}", e)))?;

        // Atomic write: write to temp, then rename
        std::fs::write(&temp_path, content)
            .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;
        std::fs::rename(&temp_path, &path)
            .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

        debug!("Saved preferences to {:?}", path);
        Ok(())
    }

    fn update<F>(&self, namespace: &str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut PreferenceFile),
    {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = self.load(namespace).unwrap_or_else(|e| {
            warn!("Discarding unreadable preferences for {}: {}", namespace, e);
            PreferenceFile::default()
        });
        f(&mut file);

        match self.save(namespace, &file) {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!("Preference write for {} not committed: {}", namespace, e);
                Ok(false)
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PreferenceStore for FilePreferences {
    fn get_string(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        Ok(self.load(namespace)?.entries.get(key).cloned())
    }

    fn put_string(&self, namespace: &str, key: &str, value: &str) -> Result<bool> {
        self.update(namespace, |file| {
            file.entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<bool> {
        self.update(namespace, |file| {
            file.entries.remove(key);
        })
    }
}
