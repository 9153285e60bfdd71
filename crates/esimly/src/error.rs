//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text.

use miette::Diagnostic;
use thiserror::Error;

use esimly_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(
        code(esimly::not_signed_in),
        help("Sign in first: esimly login <email>")
    )]
    NotSignedIn,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(esimly::auth_failed),
        help("Your session may have expired. Sign in again: esimly login <email>")
    )]
    AuthFailed { message: String },

    #[error("This command requires the {required} role")]
    #[diagnostic(
        code(esimly::forbidden),
        help("Sign in with an account that has the {required} role.")
    )]
    Forbidden { required: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(esimly::validation))]
    Validation { field: String, reason: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(esimly::not_found),
        help("Run: esimly {list_command} to see available entries")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Cannot reach the backend")]
    #[diagnostic(
        code(esimly::backend_unreachable),
        help(
            "Check your network and the profile's api_url.\n\
             Current profile: {profile}"
        )
    )]
    BackendUnreachable { profile: String, reason: String },

    #[error("The backend rejected the request: {message}")]
    #[diagnostic(code(esimly::rejected))]
    Rejected { message: String },

    // ── Local ────────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    #[diagnostic(code(esimly::config))]
    Config(#[from] esimly_config::ConfigError),

    #[error("IO error: {0}")]
    #[diagnostic(code(esimly::io))]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    #[diagnostic(code(esimly::other))]
    Other { message: String },
}

impl CliError {
    /// Exit code for the shell.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotSignedIn | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::Validation { .. } => exit_code::USAGE,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::BackendUnreachable { .. } => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }

    /// Map a core error, attaching the active profile for diagnostics.
    pub fn from_core(err: CoreError, profile: &str) -> Self {
        match err {
            CoreError::NotAuthenticated => Self::NotSignedIn,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Forbidden { required } => Self::Forbidden { required },
            CoreError::Validation { field, message } => Self::Validation {
                field,
                reason: message,
            },
            CoreError::VerificationExpired { message } => Self::Rejected {
                message: format!("{message} -- request a new link with: esimly resend-verification"),
            },
            CoreError::BackendUnreachable { reason } => Self::BackendUnreachable {
                profile: profile.to_owned(),
                reason,
            },
            CoreError::NotFound { entity, identifier } => Self::NotFound {
                resource_type: entity,
                identifier,
                list_command: "admin users list".into(),
            },
            CoreError::Rejected { message } | CoreError::OperationFailed { message } => {
                Self::Rejected { message }
            }
            CoreError::Storage(message) | CoreError::Internal(message) => {
                Self::Other { message }
            }
        }
    }
}
