//! CLI configuration: a thin wrapper around `cimcly_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--server,
//! --insecure, --timeout, --output, --color).

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use cimcly_core::{ServerConfig, TlsVerification};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use cimcly_config::{Config, config_path, load_config_from, save_config};

/// Config file in effect: `--config` / `CIMCLY_CONFIG`, else the platform path.
pub fn effective_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config_from(&effective_path(global))?)
}

/// Targets from `--server`, else the config's `servers`. Order kept,
/// repeats dropped.
pub fn targets(global: &GlobalOpts, config: &Config) -> Result<Vec<String>, CliError> {
    let source = if global.server.is_empty() {
        &config.servers
    } else {
        &global.server
    };

    let mut targets: Vec<String> = Vec::with_capacity(source.len());
    for host in source.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !targets.iter().any(|t| t == host) {
            targets.push(host.to_owned());
        }
    }

    if targets.is_empty() {
        return Err(CliError::NoTargets {
            path: effective_path(global).display().to_string(),
        });
    }
    Ok(targets)
}

/// `ServerConfig` for one target with flag overrides applied.
pub fn server_config(
    global: &GlobalOpts,
    config: &Config,
    host: &str,
) -> Result<ServerConfig, CliError> {
    let mut server = cimcly_config::server_config(config, host)?;
    if global.insecure {
        server.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        server.timeout = Duration::from_secs(secs);
    }
    Ok(server)
}

/// `--output`, else the config default, else table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

/// `--color`, else the config default, else auto.
pub fn color_mode(global: &GlobalOpts, config: &Config) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&config.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["cimcly"];
        argv.extend_from_slice(args);
        argv.push("chassis");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_servers(servers: &[&str]) -> Config {
        Config {
            servers: servers.iter().map(|s| (*s).to_owned()).collect(),
            ..Config::default()
        }
    }

    #[test]
    fn flags_replace_config_targets() {
        let config = config_with_servers(&["10.0.0.10"]);
        let g = global(&["-s", "10.0.0.20", "-s", "10.0.0.21,10.0.0.20"]);
        assert_eq!(targets(&g, &config).unwrap(), ["10.0.0.20", "10.0.0.21"]);
    }

    #[test]
    fn config_targets_when_no_flags() {
        let config = config_with_servers(&["10.0.0.10", " ", "10.0.0.11"]);
        let g = global(&["--config", "/nonexistent/cimcly.toml"]);
        assert_eq!(targets(&g, &config).unwrap(), ["10.0.0.10", "10.0.0.11"]);
    }

    #[test]
    fn no_targets_is_usage_error() {
        let g = global(&["--config", "/nonexistent/cimcly.toml"]);
        let err = targets(&g, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoTargets { ref path } if path == "/nonexistent/cimcly.toml"));
    }

    #[test]
    fn output_falls_back_to_config() {
        let mut config = Config::default();
        config.defaults.output = "yaml".into();
        assert_eq!(output_format(&global(&[]), &config), OutputFormat::Yaml);
        assert_eq!(output_format(&global(&["-o", "json"]), &config), OutputFormat::Json);

        config.defaults.output = "bogus".into();
        assert_eq!(output_format(&global(&[]), &config), OutputFormat::Table);
    }
}
