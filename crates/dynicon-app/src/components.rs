//! Enablement store adapter
//!
//! Wraps an [`EnablementStore`] with the semantics the switcher relies on:
//! mutations never propagate errors (each returns a [`MutationOutcome`]),
//! DEFAULT state is resolved against the manifest, and catalog reads always
//! include disabled components.

use dynicon_core::prelude::*;
use serde::Serialize;
use dynicon_core::{ComponentId, EnablementState, IconComponent};
use dynicon_registry::{CatalogQuery, EnablementStore};

/// Which way a component was switched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationAction {
    Enable,
    Disable,
}

impl MutationAction {
    fn target_state(self) -> EnablementState {
        match self {
            MutationAction::Enable => EnablementState::Enabled,
            MutationAction::Disable => EnablementState::Disabled,
        }
    }
}

/// Result of a single enable/disable call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub id: ComponentId,
    pub action: MutationAction,
    /// Error message when the registry rejected the change
    pub error: Option<String>,
}

impl MutationOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Fire-and-forget view over the platform registry
#[derive(Clone, Copy)]
pub struct ComponentRegistry<'a> {
    store: &'a dyn EnablementStore,
}

impl<'a> ComponentRegistry<'a> {
    pub fn new(store: &'a dyn EnablementStore) -> Self {
        Self { store }
    }

    pub fn enable(&self, id: &ComponentId) -> MutationOutcome {
        self.mutate(id, MutationAction::Enable)
    }

    pub fn disable(&self, id: &ComponentId) -> MutationOutcome {
        self.mutate(id, MutationAction::Disable)
    }

    fn mutate(&self, id: &ComponentId, action: MutationAction) -> MutationOutcome {
        debug!("{:?} component: {}", action, id);
        let error = match self.store.set_enablement(id, action.target_state()) {
            Ok(()) => None,
            Err(e) => {
                warn!("Error changing component {} ({:?}): {}", id, action, e);
                Some(e.to_string())
            }
        };
        MutationOutcome {
            id: id.clone(),
            action,
            error,
        }
    }

    /// Raw tri-state flag, `None` if the registry could not answer
    pub fn enablement_state(&self, id: &ComponentId) -> Option<EnablementState> {
        match self.store.enablement_state(id) {
            Ok(state) => Some(state),
            Err(e) => {
                debug!("Could not read enablement of {}: {}", id, e);
                None
            }
        }
    }

    /// Resolved on/off state
    ///
    /// DEFAULT consults the manifest flag; unknown components and unreadable
    /// catalogs resolve to disabled.
    pub fn is_enabled(&self, id: &ComponentId) -> bool {
        match self.enablement_state(id) {
            Some(EnablementState::Enabled) => true,
            Some(EnablementState::Disabled) | None => false,
            Some(EnablementState::Default) => self
                .list_all_components()
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.enabled_by_default)
                .unwrap_or(false),
        }
    }

    /// Every declared component, disabled ones included
    pub fn list_all_components(&self) -> Vec<IconComponent> {
        match self.store.list_components(CatalogQuery::including_disabled()) {
            Ok(components) => components,
            Err(e) => {
                error!("Package not found: {}", e);
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for ComponentRegistry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("package", &self.store.package_name())
            .finish()
    }
}
