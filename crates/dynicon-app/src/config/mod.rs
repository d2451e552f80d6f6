//! Configuration file parsing for the dynicon host
//!
//! Supports:
//! - `.dynicon/config.toml` - Host and device settings
//! - `manifest.toml` - Sample component catalog written by `init_config_dir`

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings};
pub use types::*;
