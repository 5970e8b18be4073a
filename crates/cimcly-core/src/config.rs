// ── Runtime connection configuration ──
//
// These types describe *how* to reach one device. They carry credential
// data and connection tuning, but never touch disk. The CLI builds a
// `ServerConfig` per target and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use cimcly_api::{TimeoutClass, Timeouts, TlsMode, TransportConfig};
use secrecy::SecretString;

/// Username/password pair for `aaaLogin`.
#[derive(Debug, Clone)]
pub struct AuthCredentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for BMCs.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for talking to a single device.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address or hostname. A value with a scheme is used as the base URL.
    pub host: String,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    /// `aaaLogin` timeout.
    pub login_timeout: Duration,
    /// Timeout for ordinary commands.
    pub timeout: Duration,
    /// Timeout for drive configuration.
    pub long_timeout: Duration,
}

impl ServerConfig {
    /// Config with default TLS mode and timeouts.
    pub fn new(host: impl Into<String>, auth: AuthCredentials) -> Self {
        let timeouts = Timeouts::default();
        Self {
            host: host.into(),
            auth,
            tls: TlsVerification::default(),
            login_timeout: timeouts.get(TimeoutClass::Login),
            timeout: timeouts.get(TimeoutClass::Request),
            long_timeout: timeouts.get(TimeoutClass::LongRunning),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: tls_to_transport(&self.tls),
            timeouts: Timeouts {
                login: self.login_timeout,
                request: self.timeout,
                long_running: self.long_timeout,
            },
        }
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
