//! Interface inventory and full inventory snapshots.

use clap::ValueEnum;
use tabled::Tabled;

use cimcly_core::{Adapter, Inventory, InventoryCategory, ManagedObject};

use crate::cli::{InventoryArgs, InventoryCategoryArg};
use crate::error::CliError;
use crate::output;

use super::{Context, View, query, util};

// ── Interface report ────────────────────────────────────────────────

/// `addr,SLOT-<pciSlot>,port-<portId>,<adminSpeed>,<linkState>,<vnic>,<mac>...`
/// with every adapter, port and vNIC in device order.
pub fn interface_line(host: &str, adapters: &[Adapter]) -> String {
    let mut line = host.to_owned();
    for adapter in adapters {
        line.push_str(",SLOT-");
        line.push_str(adapter.pci_slot());
        for port in &adapter.port {
            line.push_str(&format!(
                ",port-{},{},{}",
                port.port_id(),
                port.get("adminSpeed").unwrap_or_default(),
                port.get("linkState").unwrap_or_default(),
            ));
            for vnic in &port.vnic {
                line.push_str(&format!(
                    ",{},{}",
                    vnic.get_or_empty("name"),
                    vnic.get_or_empty("mac")
                ));
            }
        }
    }
    line
}

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "vNICs")]
    vnics: String,
}

fn adapter_table(_host: &str, adapters: &[Adapter]) -> String {
    let mut rows = Vec::new();
    for adapter in adapters {
        for port in &adapter.port {
            rows.push(PortRow {
                slot: adapter.pci_slot().to_owned(),
                model: adapter.get("model").unwrap_or_default().to_owned(),
                port: port.port_id().to_owned(),
                speed: port.get("adminSpeed").unwrap_or_default().to_owned(),
                link: port.get("linkState").unwrap_or_default().to_owned(),
                vnics: port
                    .vnic
                    .iter()
                    .map(|v| format!("{} {}", v.get_or_empty("name"), v.get_or_empty("mac")))
                    .collect::<Vec<_>>()
                    .join("\n"),
            });
        }
    }
    output::render_table(&rows)
}

pub async fn adapters(ctx: &Context) -> Result<(), CliError> {
    let view = View {
        table: adapter_table,
        plain: |host, adapters: &[Adapter]| interface_line(host, adapters),
    };
    query(ctx, &view, async |server| server.adapters().await).await
}

// ── Inventory ───────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: &InventoryArgs) -> Result<(), CliError> {
    if !args.full {
        let view = View {
            table: |host, adapters: &[Adapter]| interface_line(host, adapters),
            plain: |host, adapters: &[Adapter]| interface_line(host, adapters),
        };
        return query(ctx, &view, async |server| server.adapters().await).await;
    }

    let categories = categories(&args.category)?;
    let view = View {
        table: |_, inventory: &Inventory| inventory_detail(inventory),
        plain: |_, inventory: &Inventory| inventory_detail(inventory),
    };
    query(ctx, &view, async |server| server.inventory(&categories).await).await
}

/// Requested categories, or all of them.
fn categories(args: &[InventoryCategoryArg]) -> Result<Vec<InventoryCategory>, CliError> {
    let args = if args.is_empty() {
        InventoryCategoryArg::value_variants()
    } else {
        args
    };
    args.iter()
        .map(util::device_value::<_, InventoryCategory>)
        .collect()
}

fn section(out: &mut Vec<String>, title: &str, body: String) {
    out.push(format!("[{title}]"));
    out.push(body);
}

fn objects_section(out: &mut Vec<String>, title: &str, objects: &[ManagedObject]) {
    section(
        out,
        title,
        objects
            .iter()
            .map(output::object_detail)
            .collect::<Vec<_>>()
            .join("\n\n"),
    );
}

/// Sectioned text rendering of whatever the snapshot holds.
fn inventory_detail(inv: &Inventory) -> String {
    let mut out = Vec::new();
    if let Some(ref mo) = inv.chassis {
        section(&mut out, "chassis", output::object_detail(mo));
    }
    if let Some(ref mo) = inv.cimc {
        section(&mut out, "cimc", output::object_detail(mo));
    }
    if let Some(ref adapters) = inv.adapters {
        section(&mut out, "adaptor", adapter_table("", adapters));
    }
    if let Some(ref pci) = inv.pci {
        objects_section(&mut out, "pci", pci);
    }
    if let Some(ref psu) = inv.psu {
        objects_section(&mut out, "psu", psu);
    }
    if let Some(ref drives) = inv.drives {
        objects_section(&mut out, "drives.storageLocalDisk", &drives.local_disks);
        objects_section(&mut out, "drives.storageVirtualDrive", &drives.virtual_drives);
    }
    if let Some(ref usage) = inv.drive_usage {
        objects_section(&mut out, "drive_usage", usage);
    }
    if let Some(ref controllers) = inv.storage_controllers {
        objects_section(&mut out, "storageControllers", controllers);
    }
    if let Some(ref fw) = inv.firmware {
        let body = fw
            .iter()
            .map(|(dn, v)| format!("{dn}  {v}"))
            .collect::<Vec<_>>()
            .join("\n");
        section(&mut out, "fw", body);
    }
    if let Some(ref bios) = inv.bios {
        let body = bios
            .iter()
            .map(|(rn, attrs)| {
                let values = attrs
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{rn}  {values}")
            })
            .collect::<Vec<_>>()
            .join("\n");
        section(&mut out, "bios", body);
    }
    if let Some(ref users) = inv.users {
        objects_section(&mut out, "users", users);
    }
    if let Some(ref order) = inv.boot_order {
        section(&mut out, "boot_order", order.join(", "));
    }
    if let Some(ref mo) = inv.mgmt_if {
        section(&mut out, "mgmtIf", output::object_detail(mo));
    }
    out.join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cimcly_core::{AdapterPort, Attributes};

    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn vnic(name: &str, mac: &str) -> ManagedObject {
        ManagedObject::new("adaptorHostEthIf", attrs(&[("name", name), ("mac", mac)]))
    }

    #[test]
    fn interface_line_matches_report_format() {
        let adapters = vec![Adapter {
            attributes: attrs(&[("pciSlot", "2")]),
            port: vec![
                AdapterPort {
                    attributes: attrs(&[("portId", "0"), ("adminSpeed", "40Gbps"), ("linkState", "up")]),
                    vnic: vec![vnic("eth0", "AA:BB:CC:00:00:01")],
                },
                AdapterPort {
                    attributes: attrs(&[("portId", "1"), ("adminSpeed", "40Gbps"), ("linkState", "down")]),
                    vnic: vec![vnic("eth1", "AA:BB:CC:00:00:02")],
                },
            ],
        }];

        assert_eq!(
            interface_line("10.0.0.10", &adapters),
            "10.0.0.10,SLOT-2,port-0,40Gbps,up,eth0,AA:BB:CC:00:00:01,port-1,40Gbps,down,eth1,AA:BB:CC:00:00:02"
        );
    }

    #[test]
    fn interface_line_without_adapters_is_just_the_host() {
        assert_eq!(interface_line("10.0.0.10", &[]), "10.0.0.10");
    }

    #[test]
    fn empty_selection_means_every_category() {
        let all = categories(&[]).unwrap();
        assert_eq!(all.len(), InventoryCategoryArg::value_variants().len());
        assert_eq!(all.first(), Some(&InventoryCategory::Chassis));

        let picked = categories(&[InventoryCategoryArg::BootOrder, InventoryCategoryArg::Fw]).unwrap();
        assert_eq!(picked, [InventoryCategory::BootOrder, InventoryCategory::Firmware]);
    }

    #[test]
    fn detail_only_renders_fetched_sections() {
        let inv = Inventory {
            boot_order: Some(vec!["virtual-media".into(), "lan".into()]),
            ..Inventory::default()
        };
        assert_eq!(inventory_detail(&inv), "[boot_order]\nvirtual-media, lan");
    }
}
