//! Configuration types for the dynicon host
//!
//! Defines:
//! - `Settings` - Host settings loaded from `.dynicon/config.toml`
//! - `HostSettings` - Manifest and state locations
//! - `DeviceSettings` - Device identity override

use dynicon_core::DeviceIdentity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables consulted for empty device fields
pub const DEVICE_BRAND_ENV: &str = "DYNICON_DEVICE_BRAND";
pub const DEVICE_MANUFACTURER_ENV: &str = "DYNICON_DEVICE_MANUFACTURER";
pub const DEVICE_MODEL_ENV: &str = "DYNICON_DEVICE_MODEL";

const UNKNOWN_DEVICE_FIELD: &str = "unknown";

/// Host settings (.dynicon/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub host: HostSettings,

    #[serde(default)]
    pub device: DeviceSettings,
}

impl Settings {
    /// Manifest path, resolved against the project directory
    pub fn manifest_path(&self, project_path: &Path) -> PathBuf {
        project_path.join(&self.host.manifest)
    }

    /// State directory, resolved against the project directory
    pub fn state_dir(&self, project_path: &Path) -> PathBuf {
        project_path.join(&self.host.state_dir)
    }
}

/// Where the host finds its catalog and keeps its state
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HostSettings {
    /// Component catalog, relative to the project
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Enablement and preference files, relative to the project
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// Start with a host activity attached
    #[serde(default = "default_true")]
    pub attach_on_start: bool,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            state_dir: default_state_dir(),
            attach_on_start: true,
        }
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("manifest.toml")
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".dynicon").join("state")
}

fn default_true() -> bool {
    true
}

/// Device identity override; empty fields fall back to the environment
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DeviceSettings {
    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub manufacturer: String,

    #[serde(default)]
    pub model: String,
}

impl DeviceSettings {
    /// Resolve the device identity from settings and process environment
    pub fn identity(&self) -> DeviceIdentity {
        self.identity_with(|key| std::env::var(key).ok())
    }

    /// Resolve the device identity with a custom environment lookup
    pub fn identity_with<F>(&self, lookup: F) -> DeviceIdentity
    where
        F: Fn(&str) -> Option<String>,
    {
        let field = |configured: &str, env_key: &str| {
            if !configured.trim().is_empty() {
                return configured.trim().to_string();
            }
            lookup(env_key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_DEVICE_FIELD.to_string())
        };

        DeviceIdentity::new(
            field(&self.brand, DEVICE_BRAND_ENV),
            field(&self.manufacturer, DEVICE_MANUFACTURER_ENV),
            field(&self.model, DEVICE_MODEL_ENV),
        )
    }
}
