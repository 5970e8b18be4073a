//! Command dispatch: runs each command against every target with its own
//! scoped session, then renders results in the selected format.
//!
//! A failure on one target is reported and the run moves on to the next;
//! the process still exits non-zero at the end.

pub mod boot;
pub mod config_cmd;
pub mod drives;
pub mod inventory;
pub mod mgmt;
pub mod system;
pub mod users;
pub mod util;

use std::borrow::Borrow;

use indexmap::IndexMap;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::debug;

use cimcly_core::{CoreError, Server};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Context ─────────────────────────────────────────────────────────

/// Everything a handler needs besides its own arguments.
pub struct Context {
    pub global: GlobalOpts,
    pub config: Config,
    pub targets: Vec<String>,
    pub format: OutputFormat,
    pub color: bool,
}

impl Context {
    pub fn new(global: GlobalOpts) -> Result<Self, CliError> {
        let config = config::load(&global)?;
        let targets = config::targets(&global, &config)?;
        let format = config::output_format(&global, &config);
        let color = output::should_color(config::color_mode(&global, &config));
        Ok(Self {
            global,
            config,
            targets,
            format,
            color,
        })
    }

    fn multi(&self) -> bool {
        self.targets.len() > 1
    }
}

/// Table and plain renderings of one target's result, taken by borrow so a
/// `Vec<T>` result renders through a `[T]` view. Structured formats
/// serialize the value itself.
pub struct View<V: ?Sized> {
    pub table: fn(&str, &V) -> String,
    pub plain: fn(&str, &V) -> String,
}

// ── Dispatch ────────────────────────────────────────────────────────

/// Dispatch a device-bound command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Inventory(args) => inventory::handle(ctx, &args).await,
        Command::Adapters => inventory::adapters(ctx).await,
        Command::Chassis => system::chassis(ctx).await,
        Command::Cimc => system::cimc(ctx).await,
        Command::Pci => system::pci(ctx).await,
        Command::Psu => system::psu(ctx).await,
        Command::Firmware => system::firmware(ctx).await,
        Command::Bios => system::bios(ctx).await,
        Command::Power(args) => system::power(ctx, &args).await,
        Command::Sol(args) => system::sol(ctx, &args).await,
        Command::Boot(args) => boot::handle(ctx, args).await,
        Command::Drives(args) => drives::handle(ctx, args).await,
        Command::Users(args) => users::handle(ctx, args).await,
        Command::Mgmt(args) => mgmt::handle(ctx, args).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "handled before connecting".into(),
        }),
    }
}

// ── Per-target runners ──────────────────────────────────────────────

/// Run a read on every target and render the results.
///
/// Table and plain output is printed as each target completes. Structured
/// output is printed once at the end: the bare value for one target, a
/// map keyed by target otherwise.
pub async fn query<T, V>(
    ctx: &Context,
    view: &View<V>,
    op: impl AsyncFn(&mut Server) -> Result<T, CoreError>,
) -> Result<(), CliError>
where
    T: Serialize + Borrow<V>,
    V: ?Sized,
{
    let structured = output::is_structured(ctx.format);
    let mut collected: IndexMap<String, T> = IndexMap::new();
    let mut failures = Failures::default();

    for host in &ctx.targets {
        match on_target(ctx, host, &op).await {
            Ok(value) if structured => {
                collected.insert(host.clone(), value);
            }
            Ok(value) => {
                if ctx.multi() && ctx.format == OutputFormat::Table {
                    output::print_output(&output::target_header(host, ctx.color), ctx.global.quiet);
                }
                let value: &V = value.borrow();
                let rendered = match ctx.format {
                    OutputFormat::Plain => (view.plain)(host, value),
                    _ => (view.table)(host, value),
                };
                output::print_output(&rendered, ctx.global.quiet);
            }
            Err(err) => failures.record(ctx, host, err)?,
        }
    }

    let rendered = if ctx.multi() {
        output::render_structured(ctx.format, &collected)?
    } else {
        match collected.first() {
            Some((_, value)) => output::render_structured(ctx.format, value)?,
            None => None,
        }
    };
    if let Some(rendered) = rendered {
        output::print_output(&rendered, ctx.global.quiet);
    }

    failures.finish(ctx)
}

/// Run a write on every target, printing one status line per success.
pub async fn apply(
    ctx: &Context,
    done: &str,
    op: impl AsyncFn(&mut Server) -> Result<(), CoreError>,
) -> Result<(), CliError> {
    let mut failures = Failures::default();
    for host in &ctx.targets {
        match on_target(ctx, host, &op).await {
            Ok(()) => output::print_output(&output::status_line(host, done, ctx.color), ctx.global.quiet),
            Err(err) => failures.record(ctx, host, err)?,
        }
    }
    failures.finish(ctx)
}

async fn on_target<T>(
    ctx: &Context,
    host: &str,
    op: &impl AsyncFn(&mut Server) -> Result<T, CoreError>,
) -> Result<T, CliError> {
    let server_config = config::server_config(&ctx.global, &ctx.config, host)?;
    debug!(target_host = host, "opening session");
    Ok(Server::scoped(&server_config, async |server| op(server).await).await?)
}

// ── Failure accounting ──────────────────────────────────────────────

#[derive(Default)]
struct Failures {
    count: usize,
    first_code: Option<i32>,
}

impl Failures {
    /// With one target the error is returned as-is; with several it is
    /// reported and counted.
    fn record(&mut self, ctx: &Context, host: &str, err: CliError) -> Result<(), CliError> {
        if !ctx.multi() {
            return Err(err);
        }
        self.count += 1;
        self.first_code.get_or_insert(err.exit_code());
        if ctx.color {
            eprintln!("{} {}", "✗".red(), host.bold());
        } else {
            eprintln!("{host}: failed");
        }
        eprintln!("{:?}", miette::Report::new(err));
        Ok(())
    }

    fn finish(self, ctx: &Context) -> Result<(), CliError> {
        match self.first_code {
            None => Ok(()),
            Some(code) => Err(CliError::TargetsFailed {
                failed: self.count,
                total: ctx.targets.len(),
                code,
            }),
        }
    }
}
