//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Device objects carry
//! open-ended attribute sets, so tables are built column-by-column with
//! `tabled::builder::Builder` instead of derived rows.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use cimcly_core::ManagedObject;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Section header printed above each target's output.
pub fn target_header(host: &str, color: bool) -> String {
    let label = format!("── {host} ──");
    if color {
        label.bold().cyan().to_string()
    } else {
        label
    }
}

/// One-line result of a write on one target.
pub fn status_line(host: &str, message: &str, color: bool) -> String {
    if color {
        format!("{} {}: {message}", "✓".green(), host.bold())
    } else {
        format!("{host}: {message}")
    }
}

// ── Structured renderers ─────────────────────────────────────────────

/// JSON and YAML, which serialize values rather than draw them.
pub fn is_structured(format: OutputFormat) -> bool {
    matches!(
        format,
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml
    )
}

/// Serialize `data` in a structured format. `None` for table and plain.
pub fn render_structured<T: serde::Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<Option<String>, CliError> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).map_err(render_err)?,
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(render_err)?,
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(render_err)?,
        OutputFormat::Table | OutputFormat::Plain => return Ok(None),
    };
    Ok(Some(rendered))
}

fn render_err(e: impl std::fmt::Display) -> CliError {
    CliError::Render(e.to_string())
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Table renderers ──────────────────────────────────────────────────

/// Derived-row table.
pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// One row per object with the given attribute columns. Missing
/// attributes render as empty cells.
pub fn objects_table(objects: &[ManagedObject], columns: &[&str]) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| (*c).to_owned()));
    for object in objects {
        builder.push_record(columns.iter().map(|c| object.get_or_empty(c).to_owned()));
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Key/value detail view of one object, attributes in device order.
pub fn object_detail(object: &ManagedObject) -> String {
    let width = object
        .attributes()
        .keys()
        .map(String::len)
        .max()
        .unwrap_or_default();
    object
        .attributes()
        .iter()
        .map(|(k, v)| format!("{k:<width$}  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Distinguished names, one per line.
pub fn object_dns(objects: &[ManagedObject]) -> String {
    objects
        .iter()
        .map(|o| o.get_or_empty("dn"))
        .collect::<Vec<_>>()
        .join("\n")
}
