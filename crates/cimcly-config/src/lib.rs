//! Configuration for the cimcly CLI.
//!
//! TOML config (target list, defaults, per-address credentials), credential
//! resolution (env + keyring + plaintext), and translation to
//! `cimcly_core::ServerConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use cimcly_core::{AuthCredentials, ServerConfig, TlsVerification};

/// Credentials key that applies to every address without its own entry.
pub const WILDCARD: &str = "0.0.0.0";

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "cimcly";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for {host} (and no '{WILDCARD}' entry)")]
    NoCredentials { host: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Targets used when none are given on the command line.
    #[serde(default)]
    pub servers: Vec<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Credentials by address; `0.0.0.0` is the fallback entry.
    #[serde(default)]
    pub credentials: BTreeMap<String, CredentialEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Accept self-signed certificates. BMCs ship them, hence the default.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// CA bundle for devices with managed certificates. Takes precedence
    /// over `insecure`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// `aaaLogin` timeout in seconds.
    #[serde(default = "default_login_timeout")]
    pub login_timeout: u64,

    /// Command timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Drive configuration timeout in seconds.
    #[serde(default = "default_long_timeout")]
    pub long_timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: default_insecure(),
            ca_cert: None,
            login_timeout: default_login_timeout(),
            timeout: default_timeout(),
            long_timeout: default_long_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_insecure() -> bool {
    true
}
fn default_login_timeout() -> u64 {
    10
}
fn default_timeout() -> u64 {
    30
}
fn default_long_timeout() -> u64 {
    60
}

/// Login credentials for one address (or the wildcard).
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct CredentialEntry {
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable name containing the password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "cimcly", "cimcly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("cimcly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment. A missing file yields defaults.
///
/// Environment overrides use `CIMCLY_` with `__` as the nesting separator,
/// e.g. `CIMCLY_DEFAULTS__LOGIN_TIMEOUT=20`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CIMCLY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// The credentials entry for `host`: its own, else the wildcard.
pub fn credential_entry<'a>(config: &'a Config, host: &str) -> Option<(&'a str, &'a CredentialEntry)> {
    config
        .credentials
        .get_key_value(host)
        .or_else(|| config.credentials.get_key_value(WILDCARD))
        .map(|(key, entry)| (key.as_str(), entry))
}

/// Keyring account holding the password for a credentials entry.
pub fn keyring_account(entry_key: &str) -> String {
    format!("{entry_key}/password")
}

/// Resolve credentials for `host` from env, keyring and config.
pub fn resolve_credentials(config: &Config, host: &str) -> Result<AuthCredentials, ConfigError> {
    let fallback = CredentialEntry::default();
    let (key, entry) = credential_entry(config, host).unwrap_or((WILDCARD, &fallback));

    resolve_credentials_with(
        entry,
        key,
        host,
        |name| std::env::var(name).ok(),
        |account| {
            keyring::Entry::new(KEYRING_SERVICE, account)
                .and_then(|e| e.get_password())
                .ok()
        },
    )
}

/// Credential chain with injectable lookups.
///
/// Username: entry, then `CIMCLY_USERNAME`. Password: the entry's
/// `password_env`, then `CIMCLY_PASSWORD`, then the keyring, then plaintext.
pub fn resolve_credentials_with(
    entry: &CredentialEntry,
    entry_key: &str,
    host: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<AuthCredentials, ConfigError> {
    let no_credentials = || ConfigError::NoCredentials { host: host.into() };

    let username = entry
        .username
        .clone()
        .or_else(|| env("CIMCLY_USERNAME"))
        .ok_or_else(no_credentials)?;

    let password = entry
        .password_env
        .as_deref()
        .and_then(&env)
        .or_else(|| env("CIMCLY_PASSWORD"))
        .or_else(|| keyring(&keyring_account(entry_key)))
        .or_else(|| entry.password.clone())
        .ok_or_else(no_credentials)?;

    Ok(AuthCredentials {
        username,
        password: SecretString::from(password),
    })
}

/// Store a password in the system keyring for a credentials entry.
pub fn store_password(entry_key: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_account(entry_key))?.set_password(password)?;
    Ok(())
}

// ── ServerConfig translation ────────────────────────────────────────

/// Build a `ServerConfig` for `host` from config defaults and credentials.
pub fn server_config(config: &Config, host: &str) -> Result<ServerConfig, ConfigError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: "empty address".into(),
        });
    }

    let auth = resolve_credentials(config, host)?;
    Ok(server_config_with_auth(&config.defaults, host, auth))
}

/// `server_config` with credentials already resolved.
///
/// A configured `ca_cert` wins over `insecure`, which defaults to on.
pub fn server_config_with_auth(defaults: &Defaults, host: &str, auth: AuthCredentials) -> ServerConfig {
    let tls = if let Some(ref ca_path) = defaults.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else if defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    ServerConfig {
        host: host.into(),
        auth,
        tls,
        login_timeout: Duration::from_secs(defaults.login_timeout),
        timeout: Duration::from_secs(defaults.timeout),
        long_timeout: Duration::from_secs(defaults.long_timeout),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
servers = ["10.0.0.10", "10.0.0.11"]

[defaults]
output = "json"
timeout = 45

[credentials."0.0.0.0"]
username = "admin"
password_env = "CIMC_TEST_PASSWORD"

[credentials."10.0.0.11"]
username = "ops"
password = "plaintext"
"#;

    fn sample() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        load_config_from(&path).unwrap()
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_file_over_defaults() {
        let config = sample();
        assert_eq!(config.servers, ["10.0.0.10", "10.0.0.11"]);
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.timeout, 45);
        assert_eq!(config.defaults.login_timeout, 10);
        assert!(config.defaults.insecure);
        assert_eq!(config.credentials.len(), 2);
    }

    #[test]
    fn missing_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.servers.is_empty());
        assert_eq!(config.defaults.long_timeout, 60);
    }

    #[test]
    fn per_address_entry_wins_over_wildcard() {
        let config = sample();
        let (key, entry) = credential_entry(&config, "10.0.0.11").unwrap();
        assert_eq!(key, "10.0.0.11");
        assert_eq!(entry.username.as_deref(), Some("ops"));

        let (key, _) = credential_entry(&config, "10.0.0.99").unwrap();
        assert_eq!(key, WILDCARD);
    }

    #[test]
    fn no_entry_without_wildcard() {
        let config = Config::default();
        assert!(credential_entry(&config, "10.0.0.10").is_none());
    }

    #[test]
    fn password_env_comes_first() {
        let config = sample();
        let (key, entry) = credential_entry(&config, "10.0.0.10").unwrap();
        let auth = resolve_credentials_with(
            entry,
            key,
            "10.0.0.10",
            lookup(&[("CIMC_TEST_PASSWORD", "from-env"), ("CIMCLY_PASSWORD", "generic")]),
            lookup(&[("0.0.0.0/password", "from-keyring")]),
        )
        .unwrap();
        assert_eq!(auth.username, "admin");
        assert_eq!(auth.password.expose_secret(), "from-env");
    }

    #[test]
    fn keyring_before_plaintext() {
        let config = sample();
        let (key, entry) = credential_entry(&config, "10.0.0.11").unwrap();
        let auth = resolve_credentials_with(
            entry,
            key,
            "10.0.0.11",
            lookup(&[]),
            lookup(&[("10.0.0.11/password", "from-keyring")]),
        )
        .unwrap();
        assert_eq!(auth.password.expose_secret(), "from-keyring");

        let auth =
            resolve_credentials_with(entry, key, "10.0.0.11", lookup(&[]), lookup(&[])).unwrap();
        assert_eq!(auth.password.expose_secret(), "plaintext");
    }

    #[test]
    fn missing_password_is_no_credentials() {
        let entry = CredentialEntry {
            username: Some("admin".into()),
            ..CredentialEntry::default()
        };
        let result = resolve_credentials_with(&entry, WILDCARD, "10.0.0.10", lookup(&[]), lookup(&[]));
        assert!(matches!(result, Err(ConfigError::NoCredentials { ref host }) if host == "10.0.0.10"));
    }

    #[test]
    fn username_falls_back_to_env() {
        let entry = CredentialEntry::default();
        let auth = resolve_credentials_with(
            &entry,
            WILDCARD,
            "10.0.0.10",
            lookup(&[("CIMCLY_USERNAME", "svc"), ("CIMCLY_PASSWORD", "pw")]),
            lookup(&[]),
        )
        .unwrap();
        assert_eq!(auth.username, "svc");
    }

    #[test]
    fn tls_follows_defaults() {
        let auth = || AuthCredentials {
            username: "admin".into(),
            password: SecretString::from("pw"),
        };
        let mut defaults = Defaults::default();
        let cfg = server_config_with_auth(&defaults, "10.0.0.10", auth());
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.login_timeout, Duration::from_secs(10));

        defaults.insecure = false;
        assert_eq!(
            server_config_with_auth(&defaults, "10.0.0.10", auth()).tls,
            TlsVerification::SystemDefaults
        );

        defaults.ca_cert = Some("/etc/ssl/cimc.pem".into());
        assert_eq!(
            server_config_with_auth(&defaults, "10.0.0.10", auth()).tls,
            TlsVerification::CustomCa("/etc/ssl/cimc.pem".into())
        );
    }

    #[test]
    fn ca_cert_without_insecure_key_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nca_cert = \"/etc/ssl/cimc-ca.pem\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert!(config.defaults.insecure);
        let auth = AuthCredentials {
            username: "admin".into(),
            password: SecretString::from("pw"),
        };
        assert_eq!(
            server_config_with_auth(&config.defaults, "10.0.0.10", auth).tls,
            TlsVerification::CustomCa("/etc/ssl/cimc-ca.pem".into())
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut config = Config::default();
        config.servers.push("10.0.0.12".into());
        save_config(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.servers, ["10.0.0.12"]);
    }
}
