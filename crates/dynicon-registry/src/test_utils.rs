//! Test utilities for registry types
//!
//! Provides helper functions for building manifests and stores.

use crate::{Manifest, MemoryRegistry, PreferenceStore};
use dynicon_core::prelude::*;
use dynicon_core::IconComponent;

/// Package namespace used by the fixtures
pub const TEST_PACKAGE: &str = "com.example.app";

/// Main entry point of the fixture manifest
pub const TEST_MAIN: &str = "com.example.app.MainActivity";

/// Creates a manifest with a main activity and one alias per short name.
///
/// # Arguments
/// * `aliases` - Short alias names (e.g. "IconRed"), qualified with [`TEST_PACKAGE`]
pub fn test_manifest(aliases: &[&str]) -> Manifest {
    let mut components = vec![IconComponent::main(TEST_MAIN)];
    components.extend(
        aliases
            .iter()
            .map(|name| IconComponent::alias(format!("{}.{}", TEST_PACKAGE, name), TEST_MAIN)),
    );
    // Fixture input is always well-formed
    Manifest::new(TEST_PACKAGE, components).unwrap_or_else(|e| panic!("bad fixture: {}", e))
}

/// Creates an in-memory registry over [`test_manifest`].
pub fn test_registry(aliases: &[&str]) -> MemoryRegistry {
    MemoryRegistry::new(test_manifest(aliases))
}

/// Preference store whose writes are never committed
#[derive(Debug, Default)]
pub struct UncommittedPreferences;

impl PreferenceStore for UncommittedPreferences {
    fn get_string(&self, _namespace: &str, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn put_string(&self, _namespace: &str, _key: &str, _value: &str) -> Result<bool> {
        Ok(false)
    }

    fn remove(&self, _namespace: &str, _key: &str) -> Result<bool> {
        Ok(false)
    }
}
