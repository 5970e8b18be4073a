use std::time::Duration;

use thiserror::Error;

use crate::session::SessionState;

/// Top-level error type for the `cimcly-api` crate.
///
/// Covers every failure mode of the XML API: transport, protocol
/// (`errorCode` responses), malformed bodies, and session misuse.
/// `cimcly-core` maps these into its smaller domain taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request did not complete within its timeout class.
    #[error("Request to {target} timed out after {}s", timeout.as_secs())]
    Timeout { target: String, timeout: Duration },

    /// Host unreachable, connection refused, or TLS handshake failure.
    #[error("Could not connect to {target}: {reason}")]
    Connection { target: String, reason: String },

    /// Any other HTTP client failure (body read, redirect loop, etc.)
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate loading error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// The device answered with an `errorCode` attribute on the response root.
    #[error("Server returned error {code}: {description}")]
    Protocol { code: String, description: String },

    /// The response body could not be parsed as an XML document.
    #[error("Malformed response{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    MalformedResponse {
        message: String,
        status: Option<u16>,
        body: String,
    },

    /// A command could not be serialized to XML.
    #[error("Failed to serialize command: {0}")]
    Serialization(String),

    // ── Session ─────────────────────────────────────────────────────
    /// An operation that needs a session cookie was issued before login.
    #[error("No authenticated session -- login first")]
    NotAuthenticated,

    /// A lifecycle transition that the session state machine forbids.
    #[error("Cannot {action} while session is {state}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },
}

impl Error {
    /// Returns `true` for network-level failures (timeout or connect).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connection { .. })
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// The device error code, if this is a protocol error.
    pub fn protocol_code(&self) -> Option<&str> {
        match self {
            Self::Protocol { code, .. } => Some(code),
            _ => None,
        }
    }
}
