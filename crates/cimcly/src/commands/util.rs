//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::str::FromStr;

use clap::ValueEnum;
use secrecy::SecretString;

use crate::error::CliError;

use super::Context;

/// Ask before a destructive change, auto-approving with `--yes`.
///
/// Without a terminal to ask on, `--yes` is required.
pub fn confirm(ctx: &Context, action: &str) -> Result<(), CliError> {
    if ctx.global.yes {
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }

    let prompt = format!("{action} on {}?", ctx.targets.join(", "));
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    if confirmed { Ok(()) } else { Err(CliError::Aborted) }
}

/// Use `given`, or prompt twice on the terminal.
pub fn password_or_prompt(given: Option<String>, what: &str) -> Result<SecretString, CliError> {
    if let Some(password) = given {
        return Ok(SecretString::from(password));
    }
    let first = rpassword::prompt_password(format!("{what}: "))?;
    let second = rpassword::prompt_password(format!("Repeat {what}: "))?;
    if first != second {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "entries do not match".into(),
        });
    }
    Ok(SecretString::from(first))
}

/// Bridge a CLI value enum to the device vocabulary type with the same
/// string forms.
pub fn device_value<A: ValueEnum, T: FromStr>(arg: &A) -> Result<T, CliError> {
    let name = arg
        .to_possible_value()
        .map(|v| v.get_name().to_owned())
        .unwrap_or_default();
    name.parse::<T>().map_err(|_| CliError::Validation {
        field: "value".into(),
        reason: format!("'{name}' is not understood by the device layer"),
    })
}
