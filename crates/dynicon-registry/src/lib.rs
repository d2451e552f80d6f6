//! # dynicon-registry - Platform Storage Seams
//!
//! The platform collaborators the icon switcher talks to, each behind a trait
//! with an in-memory and a file-backed implementation.
//!
//! Depends on [`dynicon_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Component Registry
//! - [`EnablementStore`] - Tri-state enablement flags and catalog queries
//! - [`CatalogQuery`] - Whether disabled components are included in a listing
//! - [`MemoryRegistry`] - In-process registry
//! - [`FileRegistry`] - Registry persisted to `component_state.json`
//!
//! ### Manifest
//! - [`Manifest`] - Validated component catalog loaded from `manifest.toml`
//!
//! ### Preferences
//! - [`PreferenceStore`] - Namespaced durable string store
//! - [`MemoryPreferences`], [`FilePreferences`] - Store implementations

pub mod file;
pub mod manifest;
pub mod preferences;
pub mod store;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Public API re-exports
pub use file::FileRegistry;
pub use manifest::Manifest;
pub use preferences::{FilePreferences, MemoryPreferences, PreferenceStore};
pub use store::{CatalogQuery, EnablementStore, MemoryRegistry};
