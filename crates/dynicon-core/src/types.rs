//! Domain types for launcher icon components
//!
//! Defines:
//! - `ComponentId` - Fully-qualified component name within a package
//! - `IconComponent` - A manifest-declared entry point (main activity or alias)
//! - `EnablementState` - Tri-state enablement flag exposed by the platform
//! - `DeviceIdentity` - Brand/manufacturer/model triplet of the running device
//! - `BlacklistFilter` - Per-axis device patterns that force deferred switching

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully-qualified name of a component (e.g. `com.example.app.IconRed`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for ComponentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ComponentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A component declared by the application manifest
///
/// Aliases point at a target activity and carry an alternate icon; the single
/// non-alias component is the main entry point.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IconComponent {
    pub id: ComponentId,

    /// Activity an alias routes to. `None` for the main entry point.
    #[serde(default)]
    pub target_activity: Option<String>,

    /// Static `enabled` flag from the manifest, consulted for DEFAULT state
    #[serde(default = "default_enabled")]
    pub enabled_by_default: bool,
}

fn default_enabled() -> bool {
    true
}

impl IconComponent {
    /// Main entry point, enabled by default
    pub fn main(id: impl Into<ComponentId>) -> Self {
        Self {
            id: id.into(),
            target_activity: None,
            enabled_by_default: true,
        }
    }

    /// Alias routing to `target`, disabled by default
    pub fn alias(id: impl Into<ComponentId>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target_activity: Some(target.into()),
            enabled_by_default: false,
        }
    }

    pub fn with_enabled_by_default(mut self, enabled: bool) -> Self {
        self.enabled_by_default = enabled;
        self
    }

    /// Whether this component is a switchable icon variant
    pub fn is_alias(&self) -> bool {
        self.target_activity.is_some()
    }
}

/// Enablement flag the platform stores per component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnablementState {
    Enabled,
    Disabled,
    /// Inherit from the manifest declaration
    #[default]
    Default,
}

impl EnablementState {
    /// Resolve to a concrete on/off value given the manifest's static flag
    pub fn resolve(self, enabled_by_default: bool) -> bool {
        match self {
            EnablementState::Enabled => true,
            EnablementState::Disabled => false,
            EnablementState::Default => enabled_by_default,
        }
    }
}

impl fmt::Display for EnablementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnablementState::Enabled => write!(f, "enabled"),
            EnablementState::Disabled => write!(f, "disabled"),
            EnablementState::Default => write!(f, "default"),
        }
    }
}

/// Identity of the device the host is running on
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct DeviceIdentity {
    pub brand: String,
    pub manufacturer: String,
    pub model: String,
}

impl DeviceIdentity {
    pub fn new(
        brand: impl Into<String>,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            manufacturer: manufacturer.into(),
            model: model.into(),
        }
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "brand={}, manufacturer={}, model={}",
            self.brand, self.manufacturer, self.model
        )
    }
}

/// Device patterns for which icon switches are deferred
///
/// Each axis is an independent list; an empty axis places no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlacklistFilter {
    pub brands: Vec<String>,
    pub manufacturers: Vec<String>,
    pub models: Vec<String>,
}

impl BlacklistFilter {
    /// Build a filter from the comma-delimited strings sent by the caller
    pub fn from_delimited(
        brands: Option<&str>,
        manufacturers: Option<&str>,
        models: Option<&str>,
    ) -> Self {
        Self {
            brands: split_axis(brands),
            manufacturers: split_axis(manufacturers),
            models: split_axis(models),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty() && self.manufacturers.is_empty() && self.models.is_empty()
    }
}

fn split_axis(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
