//! Manifest catalog parsing
//!
//! The manifest declares every component the package ships: exactly one main
//! entry point and any number of activity aliases. It is read once and never
//! changes for the lifetime of the process.

use dynicon_core::prelude::*;
use dynicon_core::{ComponentId, IconComponent};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Validated component catalog for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    package: String,
    components: Vec<IconComponent>,
}

/// On-disk shape of `manifest.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct ManifestFile {
    package: String,

    #[serde(default)]
    components: Vec<ComponentEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct ComponentEntry {
    name: String,

    #[serde(default)]
    target_activity: Option<String>,

    /// Omitted means enabled, matching the platform default
    #[serde(default)]
    enabled: Option<bool>,
}

impl Manifest {
    /// Build and validate a manifest from already-qualified components
    pub fn new(package: impl Into<String>, components: Vec<IconComponent>) -> Result<Self> {
        let manifest = Self {
            package: package.into(),
            components,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse a manifest from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ManifestFile = toml::from_str(content)
            .map_err(|e| Error::manifest(format!("Failed to parse manifest: {}", e)))?;

        if file.package.trim().is_empty() {
            return Err(Error::manifest("package name is empty"));
        }

        let package = file.package.trim().to_string();
        let components = file
            .components
            .into_iter()
            .map(|entry| {
                let id = qualify(&package, &entry.name);
                let target = entry.target_activity.map(|t| qualify(&package, &t));
                IconComponent {
                    id: ComponentId::new(id),
                    enabled_by_default: entry.enabled.unwrap_or(true),
                    target_activity: target,
                }
            })
            .collect();

        Self::new(package, components)
    }

    /// Load a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let manifest = Self::from_toml_str(&content)?;
        debug!(
            "Loaded manifest for {} with {} components from {:?}",
            manifest.package,
            manifest.components.len(),
            path
        );
        Ok(manifest)
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// All declared components in declaration order
    pub fn components(&self) -> &[IconComponent] {
        &self.components
    }

    pub fn component(&self, id: &ComponentId) -> Option<&IconComponent> {
        self.components.iter().find(|c| &c.id == id)
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.component(id).is_some()
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for component in &self.components {
            if !seen.insert(component.id.as_str()) {
                return Err(Error::manifest(format!(
                    "component {} declared twice",
                    component.id
                )));
            }
        }

        let mains = self.components.iter().filter(|c| !c.is_alias()).count();
        if mains != 1 {
            return Err(Error::manifest(format!(
                "expected exactly one main entry point, found {}",
                mains
            )));
        }

        for alias in self.components.iter().filter(|c| c.is_alias()) {
            let target = alias.target_activity.as_deref().unwrap_or_default();
            let declared = self
                .components
                .iter()
                .any(|c| !c.is_alias() && c.id.as_str() == target);
            if !declared {
                return Err(Error::manifest(format!(
                    "alias {} targets undeclared activity {}",
                    alias.id, target
                )));
            }
        }

        Ok(())
    }
}

/// Expand a manifest class name the way the platform does
///
/// `.Foo` and bare `Foo` are relative to the package; anything else containing
/// a dot is already qualified.
fn qualify(package: &str, name: &str) -> String {
    let name = name.trim();
    if name.starts_with('.') {
        format!("{}{}", package, name)
    } else if !name.contains('.') {
        format!("{}.{}", package, name)
    } else {
        name.to_string()
    }
}
