// ── Core error types ──
//
// User-facing errors from esimly-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<esimly_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("This action requires the {required} role")]
    Forbidden { required: String },

    #[error("Verification link expired: {message}")]
    VerificationExpired { message: String },

    // ── Validation (pre-network) ─────────────────────────────────────
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the backend: {reason}")]
    BackendUnreachable { reason: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected: {message}")]
    Rejected { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    // ── Storage (session vault) ──────────────────────────────────────
    #[error("Session storage error: {0}")]
    Storage(String),

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Convenience constructor for field-level validation failures.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error should send the user back to the login screen.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::NotAuthenticated
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<esimly_api::Error> for CoreError {
    fn from(err: esimly_api::Error) -> Self {
        match err {
            esimly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            esimly_api::Error::TokenExpired { message } => {
                CoreError::VerificationExpired { message }
            }
            esimly_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::BackendUnreachable {
                        reason: "network error, please try again".into(),
                    }
                } else {
                    CoreError::OperationFailed {
                        message: e.to_string(),
                    }
                }
            }
            esimly_api::Error::InvalidUrl(e) => CoreError::Internal(format!("invalid URL: {e}")),
            esimly_api::Error::Tls(msg) => CoreError::BackendUnreachable { reason: msg },
            esimly_api::Error::Api { message, status } => {
                if status == 404 {
                    CoreError::NotFound {
                        entity: "resource".into(),
                        identifier: message,
                    }
                } else {
                    CoreError::Rejected { message }
                }
            }
            esimly_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
        }
    }
}
