// Transport configuration for building the reqwest::Client used by
// `CimcClient`.
//
// The device exposes a single endpoint (`/nuova`); every command is a POST
// of raw XML to it. Timeouts are applied per request from a timeout class
// rather than globally on the client.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Path of the XML API endpoint on every device.
pub const ENDPOINT_PATH: &str = "nuova";

/// Content type sent with every command. The body is raw XML, but devices
/// expect the form label.
pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate. BMCs ship self-signed certificates, so this
    /// is the default.
    #[default]
    DangerAcceptInvalid,
}

/// Which timeout applies to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutClass {
    /// `aaaLogin`.
    Login,
    /// Ordinary reads and writes.
    Request,
    /// Drive configuration, which the controller applies synchronously.
    LongRunning,
}

/// Per-class timeout durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub login: Duration,
    pub request: Duration,
    pub long_running: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            login: Duration::from_secs(10),
            request: Duration::from_secs(30),
            long_running: Duration::from_secs(60),
        }
    }
}

impl Timeouts {
    pub fn get(&self, class: TimeoutClass) -> Duration {
        match class {
            TimeoutClass::Login => self.login,
            TimeoutClass::Request => self.request,
            TimeoutClass::LongRunning => self.long_running,
        }
    }
}

/// Transport configuration for building HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeouts: Timeouts,
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.timeouts.login)
            .user_agent(concat!("cimcly/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Endpoint URL for a host: `https://<host>/nuova`.
///
/// A host that already carries a scheme (`http://127.0.0.1:8080`) is used
/// as the base as-is.
pub fn endpoint_url(host: &str) -> Result<Url, Error> {
    let host = host.trim().trim_end_matches('/');
    let base = if host.contains("://") {
        format!("{host}/")
    } else {
        format!("https://{host}/")
    };
    Ok(Url::parse(&base)?.join(ENDPOINT_PATH)?)
}
