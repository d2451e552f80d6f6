//! Icon name resolution
//!
//! Maps a requested icon name to a fully-qualified component identifier and
//! locates components in the declared catalog.

use crate::components::ComponentRegistry;
use dynicon_core::prelude::*;
use dynicon_core::{ComponentId, IconComponent};

/// Qualify a requested icon name with the package namespace
///
/// - already starts with the namespace: unchanged
/// - starts with `.`: namespace + name
/// - otherwise: namespace + `.` + name
pub fn resolve_full_identifier(requested: &str, package_namespace: &str) -> ComponentId {
    if requested.starts_with(package_namespace) {
        ComponentId::new(requested)
    } else if requested.starts_with('.') {
        ComponentId::new(format!("{}{}", package_namespace, requested))
    } else {
        ComponentId::new(format!("{}.{}", package_namespace, requested))
    }
}

/// Exact match among the declared aliases
pub fn find_alias<'c>(id: &ComponentId, components: &'c [IconComponent]) -> Option<&'c IconComponent> {
    components.iter().find(|c| c.is_alias() && &c.id == id)
}

/// Declared aliases in catalog order
pub fn aliases(components: &[IconComponent]) -> impl Iterator<Item = &IconComponent> {
    components.iter().filter(|c| c.is_alias())
}

/// The single non-alias component
pub fn main_entry_point(components: &[IconComponent]) -> Option<&IconComponent> {
    components.iter().find(|c| !c.is_alias())
}

/// Enabled aliases found by a catalog scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledAliasScan {
    /// Last enabled alias in catalog order
    pub current: Option<IconComponent>,
    /// Other aliases that are also enabled; non-empty only for corrupted state
    pub extra: Vec<IconComponent>,
}

impl EnabledAliasScan {
    /// More than one alias is enabled at once
    pub fn is_ambiguous(&self) -> bool {
        !self.extra.is_empty()
    }

    pub fn current_id(&self) -> Option<&ComponentId> {
        self.current.as_ref().map(|c| &c.id)
    }
}

/// Scan the aliases for the one currently enabled
///
/// When several are enabled the last one in catalog order wins and the rest
/// are reported in [`EnabledAliasScan::extra`].
pub fn currently_enabled_alias(
    registry: &ComponentRegistry<'_>,
    components: &[IconComponent],
) -> EnabledAliasScan {
    let mut enabled: Vec<IconComponent> = aliases(components)
        .filter(|alias| registry.is_enabled(&alias.id))
        .cloned()
        .collect();

    let current = enabled.pop();
    if let Some(ref alias) = current {
        debug!("Found enabled alias: {}", alias.id);
    }
    if !enabled.is_empty() {
        warn!(
            "Multiple aliases enabled at once; treating {:?} as current, extra: {:?}",
            current.as_ref().map(|c| c.id.as_str()),
            enabled.iter().map(|c| c.id.as_str()).collect::<Vec<_>>()
        );
    }

    EnabledAliasScan {
        current,
        extra: enabled,
    }
}
