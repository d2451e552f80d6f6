//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error code reported on the method channel for surfaced failures.
pub const CHANNEL_ERROR_CODE: &str = "500";

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Host Errors (surfaced to the caller)
    // ─────────────────────────────────────────────────────────────
    #[error("Activity not found")]
    MissingHostContext,

    #[error("Failed store {value} to local storage")]
    PersistFailure { value: String },

    // ─────────────────────────────────────────────────────────────
    // Component Registry Errors (absorbed internally)
    // ─────────────────────────────────────────────────────────────
    #[error("Icon alias not declared: {identifier}")]
    UnknownIcon { identifier: String },

    #[error("Component {id} not declared in the manifest")]
    UnknownComponent { id: String },

    #[error("Failed to change enablement of {id}: {message}")]
    ComponentMutation { id: String, message: String },

    #[error("Package catalog not found: {package}")]
    PackageCatalogNotFound { package: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid manifest: {message}")]
    Manifest { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn persist_failure(value: impl Into<String>) -> Self {
        Self::PersistFailure {
            value: value.into(),
        }
    }

    pub fn unknown_icon(identifier: impl Into<String>) -> Self {
        Self::UnknownIcon {
            identifier: identifier.into(),
        }
    }

    pub fn unknown_component(id: impl Into<String>) -> Self {
        Self::UnknownComponent { id: id.into() }
    }

    pub fn component_mutation(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ComponentMutation {
            id: id.into(),
            message: message.into(),
        }
    }

    pub fn catalog_not_found(package: impl Into<String>) -> Self {
        Self::PackageCatalogNotFound {
            package: package.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
        }
    }

    /// Whether this error is reported back over the method channel.
    ///
    /// Everything raised by the component registry is absorbed and logged;
    /// only a missing host activity and an unconfirmed persist reach the caller.
    pub fn is_surfaced(&self) -> bool {
        matches!(
            self,
            Error::MissingHostContext | Error::PersistFailure { .. }
        )
    }

    /// Channel error code for surfaced errors
    pub fn channel_code(&self) -> Option<&'static str> {
        self.is_surfaced().then_some(CHANNEL_ERROR_CODE)
    }

    /// Extra diagnostic text sent alongside the channel error message
    pub fn channel_details(&self) -> Option<&'static str> {
        match self {
            Error::MissingHostContext => Some("Activity didn't attached"),
            Error::PersistFailure { .. } => Some(
                "When failed store to local storage we will provide wrong value on method getAlternateIconName",
            ),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        assert_eq!(Error::MissingHostContext.to_string(), "Activity not found");

        let err = Error::persist_failure("IconRed");
        assert_eq!(err.to_string(), "Failed store IconRed to local storage");

        let err = Error::unknown_icon("com.example.app.IconBlue");
        assert!(err.to_string().contains("com.example.app.IconBlue"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_only_host_errors_are_surfaced() {
        assert!(Error::MissingHostContext.is_surfaced());
        assert!(Error::persist_failure("x").is_surfaced());

        assert!(!Error::unknown_icon("x").is_surfaced());
        assert!(!Error::component_mutation("x", "denied").is_surfaced());
        assert!(!Error::catalog_not_found("com.example").is_surfaced());
    }

    #[test]
    fn test_channel_code() {
        assert_eq!(Error::MissingHostContext.channel_code(), Some("500"));
        assert_eq!(Error::persist_failure("x").channel_code(), Some("500"));
        assert_eq!(Error::unknown_icon("x").channel_code(), None);
    }

    #[test]
    fn test_channel_details() {
        assert_eq!(
            Error::MissingHostContext.channel_details(),
            Some("Activity didn't attached")
        );
        assert!(Error::persist_failure("x").channel_details().is_some());
        assert!(Error::config("bad").channel_details().is_none());
    }

    #[test]
    fn test_context_keeps_original_error() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        let err = result.context("Opening state directory").unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        let result: Result<()> = Err(Error::ConfigNotFound {
            path: PathBuf::from("/project/manifest.toml"),
        });
        let err = result
            .with_context(|| format!("Loading {}", "manifest"))
            .unwrap_err();
        assert!(err.to_string().contains("/project/manifest.toml"));
    }
}
