// ── Core error types ──
//
// User-facing errors from cimcly-core. Consumers never see HTTP client
// errors or XML parse failures directly: `remap` translates api-layer
// failures into these variants with the target and operation attached.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport errors ─────────────────────────────────────────────
    #[error("{operation} on {target} timed out after {timeout_secs}s")]
    TransportTimeout {
        target: String,
        operation: String,
        timeout_secs: u64,
    },

    #[error("Cannot reach {target} during {operation}: {reason}")]
    TransportConnection {
        target: String,
        operation: String,
        reason: String,
    },

    // ── Protocol errors ──────────────────────────────────────────────
    /// The device rejected the command (`errorCode`), or its answer could
    /// not be read (`invalid-response`).
    #[error("{operation} on {target} failed with error {code}: {description}")]
    Protocol {
        target: String,
        operation: String,
        code: String,
        description: String,
    },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Session error: {message}")]
    Session { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Protocol code used when a response body is not a readable document.
pub const INVALID_RESPONSE: &str = "invalid-response";

impl CoreError {
    pub(crate) fn not_found(entity_type: &str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_owned(),
            identifier: identifier.into(),
        }
    }

    /// `true` when a mutating command may or may not have been applied:
    /// the request was sent but no answer arrived in time.
    pub fn outcome_unknown(&self) -> bool {
        matches!(self, Self::TransportTimeout { .. })
    }

    /// `true` for failed logins and missing sessions.
    pub fn is_authentication(&self) -> bool {
        match self {
            Self::NotAuthenticated => true,
            Self::Protocol { operation, .. } => operation == "login",
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::TransportTimeout { .. } | Self::TransportConnection { .. }
        )
    }
}
