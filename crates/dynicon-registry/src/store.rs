//! Component enablement store
//!
//! [`EnablementStore`] is the seam to the platform's component registry: it
//! records a tri-state enablement flag per declared component and answers
//! catalog queries. [`MemoryRegistry`] keeps the flags in process memory.

use crate::manifest::Manifest;
use dynicon_core::prelude::*;
use dynicon_core::{ComponentId, EnablementState, IconComponent};
use std::collections::HashMap;
use std::sync::Mutex;

/// Catalog query flags
///
/// The platform omits disabled components from catalog queries unless the
/// caller explicitly asks for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogQuery {
    pub include_disabled: bool,
}

impl CatalogQuery {
    pub fn including_disabled() -> Self {
        Self {
            include_disabled: true,
        }
    }
}

/// Platform component registry
pub trait EnablementStore: Send + Sync {
    /// Package namespace the catalog belongs to
    fn package_name(&self) -> &str;

    /// Set the enablement flag of a declared component without restarting the app
    fn set_enablement(&self, id: &ComponentId, state: EnablementState) -> Result<()>;

    /// Raw tri-state flag; `Default` means the manifest decides
    fn enablement_state(&self, id: &ComponentId) -> Result<EnablementState>;

    /// Declared components in manifest order
    fn list_components(&self, query: CatalogQuery) -> Result<Vec<IconComponent>>;
}

/// Manifest plus explicit enablement overrides
///
/// Shared by the memory and file backends; components without an override
/// are in `Default` state.
#[derive(Debug, Clone)]
pub(crate) struct ComponentTable {
    manifest: Manifest,
    overrides: HashMap<ComponentId, EnablementState>,
}

impl ComponentTable {
    pub(crate) fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            overrides: HashMap::new(),
        }
    }

    pub(crate) fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub(crate) fn overrides(&self) -> &HashMap<ComponentId, EnablementState> {
        &self.overrides
    }

    pub(crate) fn set(&mut self, id: &ComponentId, state: EnablementState) -> Result<()> {
        if !self.manifest.contains(id) {
            return Err(Error::unknown_component(id.as_str()));
        }
        match state {
            EnablementState::Default => {
                self.overrides.remove(id);
            }
            _ => {
                self.overrides.insert(id.clone(), state);
            }
        }
        Ok(())
    }

    pub(crate) fn state(&self, id: &ComponentId) -> Result<EnablementState> {
        if !self.manifest.contains(id) {
            return Err(Error::unknown_component(id.as_str()));
        }
        Ok(self.overrides.get(id).copied().unwrap_or_default())
    }

    pub(crate) fn list(&self, query: CatalogQuery) -> Vec<IconComponent> {
        self.manifest
            .components()
            .iter()
            .filter(|c| {
                query.include_disabled
                    || self
                        .overrides
                        .get(&c.id)
                        .copied()
                        .unwrap_or_default()
                        .resolve(c.enabled_by_default)
            })
            .cloned()
            .collect()
    }
}

/// In-process component registry
#[derive(Debug)]
pub struct MemoryRegistry {
    package: String,
    table: Mutex<ComponentTable>,
}

impl MemoryRegistry {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            package: manifest.package().to_string(),
            table: Mutex::new(ComponentTable::new(manifest)),
        }
    }

    fn table(&self) -> std::sync::MutexGuard<'_, ComponentTable> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl EnablementStore for MemoryRegistry {
    fn package_name(&self) -> &str {
        &self.package
    }

    fn set_enablement(&self, id: &ComponentId, state: EnablementState) -> Result<()> {
        trace!("set {} -> {}", id, state);
        self.table().set(id, state)
    }

    fn enablement_state(&self, id: &ComponentId) -> Result<EnablementState> {
        self.table().state(id)
    }

    fn list_components(&self, query: CatalogQuery) -> Result<Vec<IconComponent>> {
        Ok(self.table().list(query))
    }
}
