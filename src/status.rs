//! `dynicon status` - component table and pending selection

use std::fmt::Write as _;
use std::path::Path;

use dynicon_app::config::load_settings;
use dynicon_app::resolver::currently_enabled_alias;
use dynicon_app::{ComponentRegistry, PendingSelection};
use dynicon_core::prelude::*;
use dynicon_registry::{EnablementStore, FilePreferences, FileRegistry, Manifest, PreferenceStore};

/// Print the status of the project's configured backends to stdout
pub fn run_status(project_path: &Path) -> Result<()> {
    let settings = load_settings(project_path);
    let manifest = Manifest::load(&settings.manifest_path(project_path))
        .context("Loading manifest for status")?;
    let state_dir = settings.state_dir(project_path);

    let registry =
        FileRegistry::open(manifest, &state_dir).context("Opening state for status")?;
    let preferences = FilePreferences::new(&state_dir);

    print!("{}", render_status(&registry, &preferences));
    Ok(())
}

/// Render the component table with resolved states
///
/// The component currently shown as the launcher icon is marked with `*`.
pub fn render_status(store: &dyn EnablementStore, preferences: &dyn PreferenceStore) -> String {
    let registry = ComponentRegistry::new(store);
    let components = registry.list_all_components();
    let scan = currently_enabled_alias(&registry, &components);

    let width = components
        .iter()
        .map(|c| c.id.as_str().len())
        .max()
        .unwrap_or(0)
        .max("COMPONENT".len());

    let mut out = String::new();
    let _ = writeln!(out, "Package: {}", store.package_name());
    let _ = writeln!(out, "  {:<width$}  {:<5}  {:<8}  SETTING", "COMPONENT", "KIND", "STATE");

    for component in &components {
        let active = match scan.current_id() {
            Some(id) => *id == component.id,
            None => !component.is_alias() && registry.is_enabled(&component.id),
        };
        let setting = registry
            .enablement_state(&component.id)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "?".to_string());
        let state = if registry.is_enabled(&component.id) {
            "enabled"
        } else {
            "disabled"
        };

        let _ = writeln!(
            out,
            "{} {:<width$}  {:<5}  {:<8}  {}",
            if active { '*' } else { ' ' },
            component.id,
            if component.is_alias() { "alias" } else { "main" },
            state,
            setting,
        );
    }

    if scan.is_ambiguous() {
        let _ = writeln!(
            out,
            "Warning: {} aliases enabled at once",
            scan.extra.len() + 1
        );
    }

    let pending = PendingSelection::new(preferences).get();
    let _ = writeln!(out, "Pending: {}", pending.as_deref().unwrap_or("(none)"));
    out
}
