//! Pending icon selection
//!
//! The last requested icon name, kept in the durable preference store so the
//! deferred path can apply it after the request that wrote it has returned.

use dynicon_core::prelude::*;
use dynicon_registry::PreferenceStore;

/// Preference namespace owned by the plugin
pub const PREFERENCES_NAMESPACE: &str = "flutter_dynamic_icon_plus";

/// Key of the pending icon name
pub const PENDING_ICON_KEY: &str = "app_icon";

/// Single durable slot holding the last requested icon name
#[derive(Clone, Copy)]
pub struct PendingSelection<'a> {
    store: &'a dyn PreferenceStore,
}

impl<'a> PendingSelection<'a> {
    pub fn new(store: &'a dyn PreferenceStore) -> Self {
        Self { store }
    }

    /// Store `name`, failing with [`Error::PersistFailure`] unless committed
    pub fn set(&self, name: &str) -> Result<()> {
        match self
            .store
            .put_string(PREFERENCES_NAMESPACE, PENDING_ICON_KEY, name)
        {
            Ok(true) => {
                debug!("Saved pending icon: {}", name);
                Ok(())
            }
            Ok(false) => Err(Error::persist_failure(name)),
            Err(e) => {
                error!("Failed to save pending icon {}: {}", name, e);
                Err(Error::persist_failure(name))
            }
        }
    }

    /// Current value; unreadable storage reads as empty
    pub fn get(&self) -> Option<String> {
        match self.store.get_string(PREFERENCES_NAMESPACE, PENDING_ICON_KEY) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Failed to read pending icon: {}", e);
                None
            }
        }
    }

    /// Remove the slot, failing with [`Error::PersistFailure`] unless committed
    pub fn remove(&self) -> Result<()> {
        match self.store.remove(PREFERENCES_NAMESPACE, PENDING_ICON_KEY) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::persist_failure("null")),
            Err(e) => {
                error!("Failed to remove pending icon: {}", e);
                Err(Error::persist_failure("null"))
            }
        }
    }

    /// Remove the slot; failures are logged
    pub fn clear(&self) {
        match self.store.remove(PREFERENCES_NAMESPACE, PENDING_ICON_KEY) {
            Ok(true) => debug!("Removed stored app icon preference"),
            Ok(false) => warn!("Removing stored app icon preference was not committed"),
            Err(e) => warn!("Failed to remove stored app icon preference: {}", e),
        }
    }
}
