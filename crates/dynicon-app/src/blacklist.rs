//! Device blacklist evaluation
//!
//! Some launchers misbehave when components are toggled while the app is in
//! the foreground; devices matching the caller's filters get the switch
//! deferred until the app closes.

use dynicon_core::prelude::*;
use dynicon_core::{BlacklistFilter, DeviceIdentity};

/// Whether `device` matches any pattern on any axis of `filter`
///
/// Matching is exact and case-insensitive. An empty axis never matches.
pub fn is_blacklisted(filter: &BlacklistFilter, device: &DeviceIdentity) -> bool {
    let axes = [
        ("brand", &filter.brands, &device.brand),
        ("manufacturer", &filter.manufacturers, &device.manufacturer),
        ("model", &filter.models, &device.model),
    ];

    for (axis, patterns, value) in axes {
        let value_lower = value.to_lowercase();
        if let Some(pattern) = patterns.iter().find(|p| p.to_lowercase() == value_lower) {
            debug!("Device {} '{}' matches blacklist entry '{}'", axis, value, pattern);
            return true;
        }
    }

    false
}
