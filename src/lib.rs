//! dynicon - headless host for runtime launcher-icon switching
//!
//! Wires the file-backed registry and preference store from
//! `dynicon-registry` to the plugin surface in `dynicon-app`, and exposes it
//! as a JSON-lines protocol on stdin/stdout.

pub mod host;
pub mod status;

// Re-export main entry points
pub use host::{run_host, Host};
pub use status::{render_status, run_status};
