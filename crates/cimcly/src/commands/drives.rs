//! Drive listings and storage configuration.

use cimcly_core::{CreateVirtualDriveRequest, Dn, DriveInventory, ManagedObject};

use crate::cli::{CreateVdArgs, DrivesArgs, DrivesCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, View, apply, query, util};

const DISK_COLUMNS: &[&str] = &["id", "pdStatus", "health", "coercedSize", "mediaType", "productId"];
const VD_COLUMNS: &[&str] = &["id", "name", "raidLevel", "size", "vdStatus", "health", "bootDrive"];
const USAGE_COLUMNS: &[&str] = &["dn", "physicalDrive", "virtualDrive", "state", "numberOfBlocks"];
const CONTROLLER_COLUMNS: &[&str] = &["id", "model", "pciSlot", "presence", "raidSupport", "serial"];

fn drives_table(_host: &str, drives: &DriveInventory) -> String {
    [
        output::objects_table(&drives.local_disks, DISK_COLUMNS),
        output::objects_table(&drives.virtual_drives, VD_COLUMNS),
    ]
    .join("\n")
}

fn drives_plain(_host: &str, drives: &DriveInventory) -> String {
    let mut dns = vec![output::object_dns(&drives.local_disks)];
    dns.push(output::object_dns(&drives.virtual_drives));
    dns.retain(|s| !s.is_empty());
    dns.join("\n")
}

fn parse_dn(field: &str, raw: &str) -> Result<Dn, CliError> {
    raw.parse::<Dn>().map_err(|e| CliError::Validation {
        field: field.into(),
        reason: e.to_string(),
    })
}

fn create_request(args: CreateVdArgs) -> Result<CreateVirtualDriveRequest, CliError> {
    Ok(CreateVirtualDriveRequest {
        controller_dn: parse_dn("controller", &args.controller)?,
        name: args.name,
        raid_level: args.raid_level,
        size: args.size,
        drive_group: args.drives,
        write_policy: args.write_policy,
        strip_size: args.strip_size,
    })
}

pub async fn handle(ctx: &Context, args: DrivesArgs) -> Result<(), CliError> {
    match args.command {
        DrivesCommand::List => {
            let view = View {
                table: drives_table,
                plain: drives_plain,
            };
            query(ctx, &view, async |server| server.drives().await).await
        }

        DrivesCommand::Usage => {
            let view = View {
                table: |_, usage: &[ManagedObject]| output::objects_table(usage, USAGE_COLUMNS),
                plain: |_, usage: &[ManagedObject]| output::object_dns(usage),
            };
            query(ctx, &view, async |server| server.drive_usage().await).await
        }

        DrivesCommand::Controllers => {
            let view = View {
                table: |_, ctrls: &[ManagedObject]| {
                    output::objects_table(ctrls, CONTROLLER_COLUMNS)
                },
                plain: |_, ctrls: &[ManagedObject]| output::object_dns(ctrls),
            };
            query(ctx, &view, async |server| server.storage_controllers().await).await
        }

        DrivesCommand::CreateVd(args) => {
            let request = create_request(args)?;
            util::confirm(
                ctx,
                &format!(
                    "Create RAID {} virtual drive '{}' from drives [{}]",
                    request.raid_level, request.name, request.drive_group
                ),
            )?;
            apply(ctx, &format!("virtual drive {} created", request.name), async |server| {
                server.create_virtual_drive(&request).await
            })
            .await
        }

        DrivesCommand::UnconfiguredGood { id } => {
            util::confirm(ctx, &format!("Make physical drive {id} unconfigured-good"))?;
            apply(ctx, &format!("drive {id} is unconfigured-good"), async |server| {
                server.set_drive_unconfigured_good(&id).await
            })
            .await
        }

        DrivesCommand::JbodToUnconfiguredGood { controller, id } => {
            let controller = parse_dn("controller", &controller)?;
            util::confirm(ctx, &format!("Move JBOD drive {id} to unconfigured-good"))?;
            apply(ctx, &format!("drive {id} is unconfigured-good"), async |server| {
                server.jbod_to_unconfigured_good(&controller, &id).await
            })
            .await
        }

        DrivesCommand::SetBoot { name } => {
            util::confirm(ctx, &format!("Make virtual drive '{name}' the boot drive"))?;
            apply(ctx, &format!("boot drive set to {name}"), async |server| {
                server.set_boot_drive(&name).await
            })
            .await
        }
    }
}
