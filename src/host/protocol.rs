//! Host protocol - JSON lines exchanged over stdin/stdout
//!
//! Requests:
//!
//! ```json
//! {"id":1,"method":"setAlternateIconName","arguments":{"iconName":"IconRed"}}
//! {"event":"appClosing"}
//! ```
//!
//! Replies:
//!
//! ```json
//! {"id":1,"result":true}
//! {"id":1,"error":{"code":"500","message":"Activity not found","details":"Activity didn't attached"}}
//! {"id":1,"notImplemented":true}
//! {"event":"appClosing","outcome":"applied","applied":["com.example.app.IconRed"],"failed":[]}
//! ```

use dynicon_app::{MethodResponse, SwitchOutcome, SwitchReport};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error code for lines that are not a valid host message
pub const MALFORMED_CODE: &str = "400";

/// A line read from the host's stdin
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HostMessage {
    /// Method call on the plugin channel
    Call {
        id: u64,
        method: String,
        #[serde(default)]
        arguments: Value,
    },
    /// Host activity lifecycle notification
    Event { event: LifecycleEvent },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleEvent {
    /// Last activity is being destroyed; deferred work runs now
    AppClosing,
    ActivityAttached,
    ActivityDetached,
}

/// A line written to the host's stdout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HostReply {
    Result {
        id: u64,
        result: Value,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
        error: ReplyError,
    },
    NotImplemented {
        id: u64,
        #[serde(rename = "notImplemented")]
        not_implemented: bool,
    },
    Lifecycle(LifecycleSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// What a lifecycle event did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleSummary {
    pub event: LifecycleEvent,

    /// Outcome of the deferred task run on app close, if any was queued
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SwitchOutcome>,

    /// Components switched successfully (app close only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<Vec<String>>,

    /// Components the registry refused to switch (app close only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<Vec<String>>,

    /// Attachment state after the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached: Option<bool>,
}

impl HostReply {
    pub fn from_response(id: u64, response: MethodResponse) -> Self {
        match response {
            MethodResponse::Success(result) => HostReply::Result { id, result },
            MethodResponse::Error {
                code,
                message,
                details,
            } => HostReply::Error {
                id: Some(id),
                error: ReplyError {
                    code,
                    message,
                    details,
                },
            },
            MethodResponse::NotImplemented => HostReply::NotImplemented {
                id,
                not_implemented: true,
            },
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        HostReply::Error {
            id: None,
            error: ReplyError {
                code: MALFORMED_CODE.to_string(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Summary of an `appClosing` event; `report` is `None` when nothing was queued
    pub fn closing(report: Option<&SwitchReport>) -> Self {
        let (applied, failed) = match report {
            Some(report) => report.mutations.iter().fold(
                (Vec::new(), Vec::new()),
                |(mut applied, mut failed), m| {
                    if m.succeeded() {
                        applied.push(m.id.to_string());
                    } else {
                        failed.push(m.id.to_string());
                    }
                    (applied, failed)
                },
            ),
            None => (Vec::new(), Vec::new()),
        };

        HostReply::Lifecycle(LifecycleSummary {
            event: LifecycleEvent::AppClosing,
            outcome: report.map(|r| r.outcome),
            applied: Some(applied),
            failed: Some(failed),
            attached: None,
        })
    }

    pub fn attachment(event: LifecycleEvent, attached: bool) -> Self {
        HostReply::Lifecycle(LifecycleSummary {
            event,
            outcome: None,
            applied: None,
            failed: None,
            attached: Some(attached),
        })
    }
}
