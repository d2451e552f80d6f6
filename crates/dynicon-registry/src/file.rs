//! File-backed component registry
//!
//! Enablement overrides survive process restarts in `component_state.json`.
//! Components in `Default` state are not written; the manifest decides them.

use crate::manifest::Manifest;
use crate::store::{CatalogQuery, ComponentTable, EnablementStore};
use dynicon_core::prelude::*;
use dynicon_core::{ComponentId, EnablementState, IconComponent};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const STATE_FILENAME: &str = "component_state.json";

/// Component registry persisted under a state directory
#[derive(Debug)]
pub struct FileRegistry {
    package: String,
    path: PathBuf,
    table: Mutex<ComponentTable>,
}

impl FileRegistry {
    /// Open the registry, loading any overrides already on disk
    pub fn open(manifest: Manifest, state_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_dir)?;
        let path = state_dir.join(STATE_FILENAME);

        let mut table = ComponentTable::new(manifest);
        for (id, state) in load_overrides(&path) {
            if let Err(e) = table.set(&id, state) {
                warn!("Ignoring stale enablement entry for {}: {}", id, e);
            }
        }

        Ok(Self {
            package: table.manifest().package().to_string(),
            path,
            table: Mutex::new(table),
        })
    }

    /// Path of the persisted state file
    pub fn state_path(&self) -> &Path {
        &self.path
    }

    fn table(&self) -> std::sync::MutexGuard<'_, ComponentTable> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, table: &ComponentTable) -> Result<()> {
        let overrides: BTreeMap<&str, EnablementState> = table
            .overrides()
            .iter()
            .map(|(id, state)| (id.as_str(), *state))
            .collect();
        let content = serde_json::to_string_pretty(&overrides)?;

        // Open file with exclusive lock for concurrent write protection
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.lock_exclusive()?;

        let mut file = file;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        // Lock is released when the file is dropped
        Ok(())
    }
}

fn load_overrides(path: &Path) -> Vec<(ComponentId, EnablementState)> {
    if !path.exists() {
        debug!("No enablement state at {:?}, starting from manifest", path);
        return Vec::new();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<BTreeMap<String, EnablementState>>(&content) {
            Ok(map) => map
                .into_iter()
                .map(|(id, state)| (ComponentId::new(id), state))
                .collect(),
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Vec::new()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Vec::new()
        }
    }
}

impl EnablementStore for FileRegistry {
    fn package_name(&self) -> &str {
        &self.package
    }

    fn set_enablement(&self, id: &ComponentId, state: EnablementState) -> Result<()> {
        let mut table = self.table();
        let previous = table.state(id)?;
        table.set(id, state)?;

        if let Err(e) = self.persist(&table) {
            // Keep memory and disk in agreement
            let _ = table.set(id, previous);
            return Err(Error::component_mutation(id.as_str(), e.to_string()));
        }
        Ok(())
    }

    fn enablement_state(&self, id: &ComponentId) -> Result<EnablementState> {
        self.table().state(id)
    }

    fn list_components(&self, query: CatalogQuery) -> Result<Vec<IconComponent>> {
        Ok(self.table().list(query))
    }
}
