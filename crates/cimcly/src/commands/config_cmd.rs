//! Config command handlers. None of these talk to a device.

use secrecy::ExposeSecret;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util;

const MASK: &str = "********";

/// Replace plaintext passwords so the config can be shown safely.
fn mask_secrets(mut cfg: Config) -> Config {
    for entry in cfg.credentials.values_mut() {
        if entry.password.is_some() {
            entry.password = Some(MASK.into());
        }
    }
    cfg
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = mask_secrets(config::load(global)?);
            let format = config::output_format(global, &cfg);
            let rendered = match output::render_structured(format, &cfg)? {
                Some(rendered) => rendered,
                None if format == OutputFormat::Plain => cfg.servers.join("\n"),
                None => toml::to_string_pretty(&cfg).map_err(|e| CliError::Render(e.to_string()))?,
            };
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::effective_path(global).display().to_string(), false);
            Ok(())
        }

        ConfigCommand::SetPassword { entry } => {
            let cfg = config::load(global)?;
            if !cfg.credentials.contains_key(&entry) {
                eprintln!(
                    "note: no [credentials.\"{entry}\"] entry in {}; the password is stored anyway",
                    config::effective_path(global).display()
                );
            }

            let password = util::password_or_prompt(None, &format!("Password for {entry}"))?;
            cimcly_config::store_password(&entry, password.expose_secret())?;
            if !global.quiet {
                eprintln!("✓ Password stored in system keyring for '{entry}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cimcly_config::CredentialEntry;

    use super::*;

    #[test]
    fn show_masks_plaintext_passwords_only() {
        let mut cfg = Config::default();
        cfg.credentials.insert(
            "10.0.0.11".into(),
            CredentialEntry {
                username: Some("ops".into()),
                password: Some("hunter2".into()),
                password_env: None,
            },
        );
        cfg.credentials.insert(
            "0.0.0.0".into(),
            CredentialEntry {
                username: Some("admin".into()),
                password: None,
                password_env: Some("CIMC_PASSWORD".into()),
            },
        );

        let masked = mask_secrets(cfg);
        assert_eq!(masked.credentials["10.0.0.11"].password.as_deref(), Some(MASK));
        assert_eq!(masked.credentials["0.0.0.0"].password, None);
        assert_eq!(
            masked.credentials["0.0.0.0"].password_env.as_deref(),
            Some("CIMC_PASSWORD")
        );
    }
}
