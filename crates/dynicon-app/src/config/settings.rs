//! Settings parser for .dynicon/config.toml

use super::types::Settings;
use dynicon_core::prelude::*;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.toml";
const DYNICON_DIR: &str = ".dynicon";
const MANIFEST_FILENAME: &str = "manifest.toml";

// ─────────────────────────────────────────────────────────────────────────────
// Settings Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from .dynicon/config.toml
///
/// Returns default settings if file doesn't exist or can't be parsed.
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = project_path.join(DYNICON_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Init Directory
// ─────────────────────────────────────────────────────────────────────────────

/// Create default config files in .dynicon/ and a sample manifest
///
/// Existing files are left untouched.
pub fn init_config_dir(project_path: &Path, package: &str) -> Result<()> {
    let dynicon_dir = project_path.join(DYNICON_DIR);

    if !dynicon_dir.exists() {
        std::fs::create_dir_all(&dynicon_dir)
            .map_err(|e| Error::config(format!("Failed to create .dynicon dir: {}", e)))?;
    }

    let config_path = dynicon_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, generate_default_config())
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created {:?}", config_path);
    }

    let manifest_path = project_path.join(MANIFEST_FILENAME);
    if !manifest_path.exists() {
        std::fs::write(&manifest_path, generate_sample_manifest(package))
            .map_err(|e| Error::config(format!("Failed to write manifest.toml: {}", e)))?;
        info!("Created {:?}", manifest_path);
    }

    Ok(())
}

fn generate_default_config() -> String {
    r#"# dynicon host configuration

[host]
manifest = "manifest.toml"      # Component catalog, relative to the project
state_dir = ".dynicon/state"    # Enablement and preference files
attach_on_start = true          # Start with a host activity attached

[device]
# Device identity used for blacklist matching.
# Empty values fall back to DYNICON_DEVICE_BRAND / _MANUFACTURER / _MODEL.
brand = ""
manufacturer = ""
model = ""
"#
    .to_string()
}

fn generate_sample_manifest(package: &str) -> String {
    format!(
        r#"# Components declared by the application
# Entries with target_activity are icon aliases.
package = "{package}"

[[components]]
name = ".MainActivity"
enabled = true

[[components]]
name = ".IconRed"
target_activity = ".MainActivity"
enabled = false

[[components]]
name = ".IconBlue"
target_activity = ".MainActivity"
enabled = false
"#
    )
}
