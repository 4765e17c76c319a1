//! Error types for retort operations.
//!
//! This module defines [`RetortError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `RetortError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `RetortError::Other`) for unexpected errors
//! - Structural configuration errors always name the offending section/key

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for retort operations.
#[derive(Debug, Error)]
pub enum RetortError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Structural violation of the configuration grammar.
    #[error("Malformed configuration at {location}: {message}")]
    Malformed { location: String, message: String },

    /// Requested environment matches no section and no usable default.
    #[error("Unknown environment: {name}")]
    UnknownEnvironment { name: String },

    /// A substitution token with no known binding.
    #[error("Unresolved token {{{token}}} in value: {value}")]
    UnresolvedToken { token: String, value: String },

    /// A command exited non-zero or could not be spawned.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A dependency line could not be installed.
    #[error("Failed to install '{dep}': {message}")]
    InstallFailed { dep: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RetortError {
    /// Build a `Malformed` error for a section-level violation.
    pub fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for retort operations.
pub type Result<T> = std::result::Result<T, RetortError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = RetortError::ConfigNotFound {
            path: PathBuf::from("/proj/retort.ini"),
        };
        assert!(err.to_string().contains("/proj/retort.ini"));
    }

    #[test]
    fn malformed_displays_location_and_message() {
        let err = RetortError::malformed("[env:py311] line 4", "duplicate key 'deps'");
        let msg = err.to_string();
        assert!(msg.contains("[env:py311] line 4"));
        assert!(msg.contains("duplicate key 'deps'"));
    }

    #[test]
    fn unknown_environment_displays_name() {
        let err = RetortError::UnknownEnvironment {
            name: "py99".into(),
        };
        assert!(err.to_string().contains("py99"));
    }

    #[test]
    fn unresolved_token_displays_token_in_braces() {
        let err = RetortError::UnresolvedToken {
            token: "basedir".into(),
            value: "{basedir}/run".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("{basedir}"));
        assert!(msg.contains("{basedir}/run"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = RetortError::CommandFailed {
            command: "pytest -x".into(),
            code: Some(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("pytest -x"));
        assert!(msg.contains("2"));
    }

    #[test]
    fn install_failed_displays_dep() {
        let err = RetortError::InstallFailed {
            dep: "coverage".into(),
            message: "exit code 1".into(),
        };
        assert!(err.to_string().contains("coverage"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: RetortError = io_err.into();
        assert!(matches!(err, RetortError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(RetortError::UnknownEnvironment { name: "x".into() })
        }
        assert!(returns_error().is_err());
    }
}
