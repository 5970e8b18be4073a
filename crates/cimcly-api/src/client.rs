// XML API HTTP client
//
// Wraps `reqwest::Client` with the device's single-endpoint wire protocol:
// every command is POSTed as raw XML to `/nuova` and every response is an
// XML document classified by `Response`. Session lifecycle lives in
// `auth.rs`, resolve/configure helpers in `resolve.rs`, both as inherent
// methods on this type.

use std::error::Error as _;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::session::{Session, SessionState};
use crate::transport::{CONTENT_TYPE, TimeoutClass, Timeouts, TransportConfig, endpoint_url};
use crate::xml::{Command, Response};

/// Commands whose responses carry secrets (`outCookie`); their bodies are
/// never traced.
const CREDENTIAL_COMMANDS: &[&str] = &["aaaLogin", "aaaRefresh"];

/// Stateful client for one device.
///
/// Holds the credentials and at most one authenticated session. Methods
/// that change the session take `&mut self`, so a client cannot be shared
/// across concurrent operations.
pub struct CimcClient {
    http: reqwest::Client,
    endpoint: Url,
    host: String,
    username: String,
    password: SecretString,
    timeouts: Timeouts,
    pub(crate) state: SessionState,
    pub(crate) session: Option<Session>,
    pub(crate) status_message: Option<String>,
}

impl CimcClient {
    /// Create a client for `host` from a `TransportConfig`.
    ///
    /// `host` is an address or hostname; a value with an explicit scheme
    /// (`http://127.0.0.1:9000`) is used as the base URL unchanged.
    pub fn new(
        host: &str,
        username: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, host, username, password, transport.timeouts)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        host: &str,
        username: impl Into<String>,
        password: SecretString,
        timeouts: Timeouts,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            endpoint: endpoint_url(host)?,
            host: host.to_owned(),
            username: username.into(),
            password,
            timeouts,
            state: SessionState::Unauthenticated,
            session: None,
            status_message: None,
        })
    }

    /// The target host as given at construction.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The current session, if authenticated.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Human-readable outcome of the last failed logout, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a command with the session cookie, using the request timeout.
    pub async fn execute(&self, command: &Command) -> Result<Response, Error> {
        self.execute_with(command, TimeoutClass::Request).await
    }

    /// Send a command with the session cookie and an explicit timeout class.
    ///
    /// Fails with `NotAuthenticated` (without touching the network) when
    /// there is no session.
    pub async fn execute_with(
        &self,
        command: &Command,
        class: TimeoutClass,
    ) -> Result<Response, Error> {
        let session = match (&self.state, &self.session) {
            (SessionState::Authenticated, Some(session)) => session,
            _ => return Err(Error::NotAuthenticated),
        };
        let command = command.with_cookie(session.cookie.expose_secret());
        self.exchange(&command, class).await
    }

    /// One request/response cycle, exactly as given (no cookie injection).
    pub async fn exchange(&self, command: &Command, class: TimeoutClass) -> Result<Response, Error> {
        let timeout = self.timeouts.get(class);
        let body = command.to_xml()?;

        debug!(target_host = %self.host, command = command.name(), "POST {}", self.endpoint);
        trace!(body = %command.redacted_xml(), "request body");

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .timeout(timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e, timeout))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| self.transport_error(e, timeout))?;

        if CREDENTIAL_COMMANDS.contains(&command.name()) {
            trace!(status = status.as_u16(), "response body withheld");
        } else {
            trace!(status = status.as_u16(), body = %text, "response body");
        }

        Response::from_http(status.as_u16(), text)
    }

    /// Classify a reqwest failure: timeouts and connect failures get their
    /// own variants; everything else stays an HTTP error.
    fn transport_error(&self, err: reqwest::Error, timeout: Duration) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                target: self.host.clone(),
                timeout,
            }
        } else if err.is_connect() {
            Error::Connection {
                target: self.host.clone(),
                reason: error_chain(&err),
            }
        } else {
            Error::Http(err)
        }
    }
}

impl std::fmt::Debug for CimcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CimcClient")
            .field("host", &self.host)
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.username)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Flatten an error and its sources into one line. reqwest's top-level
/// message for connect failures is just "error sending request".
fn error_chain(err: &reqwest::Error) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        reason.push_str(": ");
        reason.push_str(&inner.to_string());
        source = inner.source();
    }
    reason
}
