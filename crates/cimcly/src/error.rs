//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use cimcly_config::ConfigError;
use cimcly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach {target} during {operation}")]
    #[diagnostic(
        code(cimcly::connection_failed),
        help(
            "{reason}\n\
             Check that the management controller is up and reachable over HTTPS.\n\
             For self-signed certificates use --insecure (-k)."
        )
    )]
    ConnectionFailed {
        target: String,
        operation: String,
        reason: String,
    },

    #[error("{operation} on {target} timed out after {seconds}s")]
    #[diagnostic(
        code(cimcly::timeout),
        help(
            "Increase the timeout with --timeout or in the config defaults.\n\
             A timed-out change may or may not have been applied; check the device state."
        )
    )]
    Timeout {
        target: String,
        operation: String,
        seconds: u64,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login to {target} failed: {message}")]
    #[diagnostic(
        code(cimcly::auth_failed),
        help(
            "Verify the username and password for this address.\n\
             Run: cimcly config set-password {target}"
        )
    )]
    AuthFailed { target: String, message: String },

    #[error("No credentials configured for {host}")]
    #[diagnostic(
        code(cimcly::no_credentials),
        help(
            "Add a [credentials.\"{host}\"] or [credentials.\"0.0.0.0\"] entry to the config,\n\
             or set CIMCLY_USERNAME and CIMCLY_PASSWORD."
        )
    )]
    NoCredentials { host: String },

    #[error("Session error: {message}")]
    #[diagnostic(code(cimcly::session))]
    Session { message: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(cimcly::not_found),
        help("Run: cimcly {list_command} to see what the device has")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{operation} on {target} failed ({code}): {description}")]
    #[diagnostic(code(cimcly::device_error))]
    DeviceError {
        target: String,
        operation: String,
        code: String,
        description: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cimcly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No target servers given")]
    #[diagnostic(
        code(cimcly::no_targets),
        help(
            "Pass --server <ADDR> (repeatable) or list `servers` in the config.\n\
             Config file: {path}"
        )
    )]
    NoTargets { path: String },

    #[error(transparent)]
    #[diagnostic(code(cimcly::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(cimcly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Aborted")]
    Aborted,

    // ── Multi-target ─────────────────────────────────────────────────
    #[error("{failed} of {total} targets failed")]
    #[diagnostic(code(cimcly::targets_failed))]
    TargetsFailed {
        failed: usize,
        total: usize,
        code: i32,
    },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::NoTargets { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::TargetsFailed { code, .. } => *code,
            _ => exit_code::GENERAL,
        }
    }
}

/// The listing command that shows candidates for a missing entity.
fn list_command(entity_type: &str) -> &'static str {
    match entity_type {
        "user" | "user slot" => "users list",
        "physical drive" | "virtual drive" => "drives list",
        _ => "inventory --full",
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TransportTimeout {
                target,
                operation,
                timeout_secs,
            } => Self::Timeout {
                target,
                operation,
                seconds: timeout_secs,
            },

            CoreError::TransportConnection {
                target,
                operation,
                reason,
            } => Self::ConnectionFailed {
                target,
                operation,
                reason,
            },

            CoreError::Protocol {
                target,
                operation,
                code,
                description,
            } => {
                if operation == "login" {
                    Self::AuthFailed {
                        target,
                        message: format!("{description} ({code})"),
                    }
                } else {
                    Self::DeviceError {
                        target,
                        operation,
                        code,
                        description,
                    }
                }
            }

            CoreError::NotAuthenticated => Self::Session {
                message: "not logged in".into(),
            },

            CoreError::Session { message } => Self::Session { message },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: list_command(&entity_type).into(),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Validation { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => Self::Validation {
                field: "server".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { host } => Self::NoCredentials { host },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
