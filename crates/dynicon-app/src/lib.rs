//! dynicon-app - Icon switching for dynamic launcher icons
//!
//! This crate implements the icon-selection state machine on top of the
//! platform seams from `dynicon-registry`, the deferred trigger contract, the
//! method-call surface the UI layer talks to, and host configuration loading.

pub mod blacklist;
pub mod channel;
pub mod components;
pub mod config;
pub mod context;
pub mod deferred;
pub mod pending;
pub mod resolver;
pub mod switcher;

// Re-export primary types
pub use channel::{DynamicIconPlugin, MethodCall, MethodResponse, CHANNEL_NAME};
pub use components::{ComponentRegistry, MutationAction, MutationOutcome};
pub use context::HostContext;
pub use deferred::{take_latest, ChannelTrigger, DeferredTask, DeferredTrigger};
#[cfg(any(test, feature = "test-helpers"))]
pub use deferred::RecordingTrigger;
pub use pending::PendingSelection;
pub use switcher::{IconSwitcher, SwitchOutcome, SwitchReport};
