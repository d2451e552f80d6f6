//! # dynicon-core - Core Domain Types
//!
//! Foundation crate for dynamic launcher icons. Provides the component model,
//! device identity, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`ComponentId`] - Fully-qualified component name
//! - [`IconComponent`] - Main entry point or activity alias from the manifest
//! - [`EnablementState`] - Enabled / Disabled / Default-from-manifest
//! - [`DeviceIdentity`] - Brand, manufacturer and model of the device
//! - [`BlacklistFilter`] - Device patterns that force deferred switching
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum split into surfaced and absorbed failures
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use dynicon_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod prelude;
pub mod types;

pub use error::{Error, Result, ResultExt, CHANNEL_ERROR_CODE};
pub use types::{BlacklistFilter, ComponentId, DeviceIdentity, EnablementState, IconComponent};
