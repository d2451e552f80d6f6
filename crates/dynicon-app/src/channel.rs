//! Method-call surface
//!
//! [`DynamicIconPlugin`] answers the three calls the UI layer makes over the
//! plugin channel. The host passes its context per call; `None` means no
//! activity is attached.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::HostContext;
use crate::switcher::{IconSwitcher, SwitchOutcome};
use dynicon_core::prelude::*;
use dynicon_core::{BlacklistFilter, CHANNEL_ERROR_CODE};

/// Channel name, shared with the preference namespace
pub const CHANNEL_NAME: &str = "flutter_dynamic_icon_plus";

/// Method names understood by the plugin
pub mod method_names {
    pub const SET_ALTERNATE_ICON_NAME: &str = "setAlternateIconName";
    pub const SUPPORTS_ALTERNATE_ICONS: &str = "supportsAlternateIcons";
    pub const GET_ALTERNATE_ICON_NAME: &str = "getAlternateIconName";
}

/// Argument keys of `setAlternateIconName`
pub mod arguments {
    pub const ICON_NAME: &str = "iconName";
    pub const BRANDS: &str = "brands";
    pub const MANUFACTURES: &str = "manufactures";
    pub const MODELS: &str = "models";
}

/// A method invocation from the UI layer
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MethodCall {
    pub method: String,

    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// String argument; missing, null and non-string values read as `None`
    pub fn argument_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }
}

/// Reply to a [`MethodCall`]
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Success(Value),
    Error {
        code: String,
        message: String,
        details: Option<String>,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MethodResponse::Success(_))
    }
}

impl From<&Error> for MethodResponse {
    fn from(err: &Error) -> Self {
        Self::Error {
            code: err.channel_code().unwrap_or(CHANNEL_ERROR_CODE).to_string(),
            message: err.to_string(),
            details: err.channel_details().map(str::to_string),
        }
    }
}

/// Dispatches method calls to the icon switcher
#[derive(Debug, Clone)]
pub struct DynamicIconPlugin {
    switcher: Arc<IconSwitcher>,
}

impl DynamicIconPlugin {
    pub fn new(switcher: Arc<IconSwitcher>) -> Self {
        Self { switcher }
    }

    pub fn switcher(&self) -> &Arc<IconSwitcher> {
        &self.switcher
    }

    pub fn handle(&self, call: &MethodCall, ctx: Option<&HostContext<'_>>) -> MethodResponse {
        match call.method.as_str() {
            method_names::SET_ALTERNATE_ICON_NAME => self.set_alternate_icon_name(call, ctx),
            method_names::SUPPORTS_ALTERNATE_ICONS => self.supports_alternate_icons(ctx),
            method_names::GET_ALTERNATE_ICON_NAME => self.get_alternate_icon_name(ctx),
            other => {
                debug!("Method not implemented: {}", other);
                MethodResponse::NotImplemented
            }
        }
    }

    fn set_alternate_icon_name(
        &self,
        call: &MethodCall,
        ctx: Option<&HostContext<'_>>,
    ) -> MethodResponse {
        let Some(ctx) = ctx else {
            error!("Activity is null");
            return MethodResponse::from(&Error::MissingHostContext);
        };

        let icon_name = call.argument_str(arguments::ICON_NAME);
        let filter = BlacklistFilter::from_delimited(
            call.argument_str(arguments::BRANDS),
            call.argument_str(arguments::MANUFACTURES),
            call.argument_str(arguments::MODELS),
        );
        debug!(
            "setAlternateIconName called with iconName: {:?}, blacklist: {:?}",
            icon_name, filter
        );

        let result = match icon_name {
            Some(name) if !name.is_empty() => self.switcher.apply_switch(ctx, name, &filter),
            _ => {
                debug!("iconName is null/empty, resetting to default icon");
                self.switcher.request_reset(ctx, &filter)
            }
        };

        match result {
            Ok(report) => {
                if report.outcome == SwitchOutcome::UnknownIcon {
                    let identifier = report
                        .target
                        .as_ref()
                        .map(|t| t.to_string())
                        .unwrap_or_default();
                    error!("{}; state unchanged", Error::unknown_icon(identifier));
                }
                MethodResponse::Success(Value::Bool(true))
            }
            Err(e) => {
                error!("setAlternateIconName failed: {}", e);
                MethodResponse::from(&e)
            }
        }
    }

    fn supports_alternate_icons(&self, ctx: Option<&HostContext<'_>>) -> MethodResponse {
        let supported = ctx
            .map(|ctx| self.switcher.supports_alternate_icons(ctx))
            .unwrap_or(false);
        MethodResponse::Success(Value::Bool(supported))
    }

    fn get_alternate_icon_name(&self, ctx: Option<&HostContext<'_>>) -> MethodResponse {
        let Some(ctx) = ctx else {
            return MethodResponse::from(&Error::MissingHostContext);
        };

        let current = self.switcher.current_alias(ctx);
        debug!("getAlternateIconName: {:?}", current);
        MethodResponse::Success(
            current
                .map(|id| Value::String(id.into_string()))
                .unwrap_or(Value::Null),
        )
    }
}
