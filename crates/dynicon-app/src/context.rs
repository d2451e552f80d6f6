//! Host context handed to every icon operation
//!
//! The host owns the platform collaborators and the device identity; each
//! call borrows them for its duration instead of the plugin holding a
//! long-lived reference to an attached activity.

use dynicon_core::DeviceIdentity;
use dynicon_registry::{EnablementStore, PreferenceStore};

/// Borrowed platform collaborators for one call
#[derive(Clone, Copy)]
pub struct HostContext<'a> {
    pub store: &'a dyn EnablementStore,
    pub preferences: &'a dyn PreferenceStore,
    pub device: &'a DeviceIdentity,
}

impl<'a> HostContext<'a> {
    pub fn new(
        store: &'a dyn EnablementStore,
        preferences: &'a dyn PreferenceStore,
        device: &'a DeviceIdentity,
    ) -> Self {
        Self {
            store,
            preferences,
            device,
        }
    }

    /// Package namespace used to qualify requested icon names
    pub fn package_namespace(&self) -> &'a str {
        self.store.package_name()
    }
}

impl std::fmt::Debug for HostContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("package", &self.store.package_name())
            .field("device", self.device)
            .finish()
    }
}
