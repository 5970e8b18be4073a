//! Rack unit, controller and hardware listings; power and SOL writes.

use tabled::Tabled;

use cimcly_core::{
    BiosSettings, ChassisSummary, ComPort, FirmwareVersions, ManagedObject, PowerState, SolSpeed,
    SolState,
};

use crate::cli::{PowerArgs, SolArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, View, apply, query, util};

const PCI_COLUMNS: &[&str] = &["id", "model", "vendor", "version", "smbiosId"];
const PSU_COLUMNS: &[&str] = &["id", "model", "serial", "operability", "power", "presence"];

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct FirmwareRow {
    #[tabled(rename = "Component")]
    dn: String,
    #[tabled(rename = "Version")]
    version: String,
}

#[derive(Tabled)]
struct BiosRow {
    #[tabled(rename = "Setting")]
    rn: String,
    #[tabled(rename = "Values")]
    values: String,
}

fn chassis_detail(_host: &str, mo: &ManagedObject) -> String {
    let s = ChassisSummary::from(mo);
    [
        format!("Name:         {}", s.name),
        format!("Model:        {}", s.model),
        format!("Serial:       {}", s.serial),
        format!("Total memory: {}", s.total_memory),
        format!("Power:        {}", s.oper_power),
    ]
    .join("\n")
}

fn firmware_table(_host: &str, fw: &FirmwareVersions) -> String {
    let rows: Vec<FirmwareRow> = fw
        .iter()
        .map(|(dn, version)| FirmwareRow {
            dn: dn.clone(),
            version: version.clone(),
        })
        .collect();
    output::render_table(&rows)
}

fn bios_table(_host: &str, bios: &BiosSettings) -> String {
    let rows: Vec<BiosRow> = bios
        .iter()
        .map(|(rn, attrs)| BiosRow {
            rn: rn.clone(),
            values: attrs
                .iter()
                .filter(|(k, _)| k.as_str() != "dn")
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("\n"),
        })
        .collect();
    output::render_table(&rows)
}

// ── Reads ───────────────────────────────────────────────────────────

pub async fn chassis(ctx: &Context) -> Result<(), CliError> {
    let view = View {
        table: chassis_detail,
        plain: |_, mo: &ManagedObject| mo.get_or_empty("serial").to_owned(),
    };
    query(ctx, &view, async |server| server.chassis().await).await
}

pub async fn cimc(ctx: &Context) -> Result<(), CliError> {
    let view = View {
        table: |_, mo: &ManagedObject| output::object_detail(mo),
        plain: |_, mo: &ManagedObject| mo.get_or_empty("extIp").to_owned(),
    };
    query(ctx, &view, async |server| server.cimc().await).await
}

pub async fn pci(ctx: &Context) -> Result<(), CliError> {
    let view = View {
        table: |_, slots: &[ManagedObject]| output::objects_table(slots, PCI_COLUMNS),
        plain: |_, slots: &[ManagedObject]| output::object_dns(slots),
    };
    query(ctx, &view, async |server| server.pci().await).await
}

pub async fn psu(ctx: &Context) -> Result<(), CliError> {
    let view = View {
        table: |_, psus: &[ManagedObject]| output::objects_table(psus, PSU_COLUMNS),
        plain: |_, psus: &[ManagedObject]| output::object_dns(psus),
    };
    query(ctx, &view, async |server| server.psus().await).await
}

pub async fn firmware(ctx: &Context) -> Result<(), CliError> {
    let view = View {
        table: firmware_table,
        plain: |_, fw: &FirmwareVersions| {
            fw.iter()
                .map(|(dn, v)| format!("{dn} {v}"))
                .collect::<Vec<_>>()
                .join("\n")
        },
    };
    query(ctx, &view, async |server| server.firmware().await).await
}

pub async fn bios(ctx: &Context) -> Result<(), CliError> {
    let view = View {
        table: bios_table,
        plain: |_, bios: &BiosSettings| bios.keys().cloned().collect::<Vec<_>>().join("\n"),
    };
    query(ctx, &view, async |server| server.bios_settings().await).await
}

// ── Writes ──────────────────────────────────────────────────────────

pub async fn power(ctx: &Context, args: &PowerArgs) -> Result<(), CliError> {
    let state: PowerState = util::device_value(&args.state)?;
    if state != PowerState::Up {
        util::confirm(ctx, &format!("Power action '{state}'"))?;
    }
    apply(ctx, &format!("power {state} requested"), async |server| {
        server.set_power_state(state).await
    })
    .await
}

pub async fn sol(ctx: &Context, args: &SolArgs) -> Result<(), CliError> {
    let state: SolState = util::device_value(&args.state)?;
    let speed: SolSpeed = util::device_value(&args.speed)?;
    let comport: ComPort = util::device_value(&args.comport)?;
    apply(ctx, &format!("SOL {state} at {speed} on {comport}"), async |server| {
        server.set_sol(state, speed, comport).await
    })
    .await
}
