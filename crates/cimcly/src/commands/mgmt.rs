//! Management interface commands.

use cimcly_core::{ManagedObject, MgmtIpRequest, MgmtModeRequest, NicMode, NicRedundancy};

use crate::cli::{MgmtArgs, MgmtCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, View, apply, query, util};

pub async fn handle(ctx: &Context, args: MgmtArgs) -> Result<(), CliError> {
    match args.command {
        MgmtCommand::Show => {
            let view = View {
                table: |_, mo: &ManagedObject| output::object_detail(mo),
                plain: |_, mo: &ManagedObject| mo.get_or_empty("extIp").to_owned(),
            };
            query(ctx, &view, async |server| server.mgmt_interface().await).await
        }

        MgmtCommand::SetIp { ip, mask, gateway } => {
            let request = MgmtIpRequest { ip, mask, gateway };
            util::confirm(ctx, &format!("Readdress the management interface to {ip}/{mask}"))?;
            apply(ctx, &format!("management address set to {ip}"), async |server| {
                server.set_mgmt_ip(&request).await
            })
            .await
        }

        MgmtCommand::SetMode {
            nic_mode,
            redundancy,
            ipv6,
        } => {
            let nic_mode: NicMode = util::device_value(&nic_mode)?;
            let nic_redundancy: NicRedundancy = util::device_value(&redundancy)?;
            let request = MgmtModeRequest {
                nic_mode,
                nic_redundancy,
                v6_enabled: ipv6,
            };
            util::confirm(ctx, &format!("Switch the management NIC to {nic_mode}"))?;
            apply(ctx, &format!("NIC mode {nic_mode}, redundancy {nic_redundancy}"), async |server| {
                server.set_mgmt_mode(&request).await
            })
            .await
        }

        MgmtCommand::SetHostname { hostname } => {
            apply(ctx, &format!("hostname set to {hostname}"), async |server| {
                server.set_hostname(&hostname).await
            })
            .await
        }

        MgmtCommand::EnableDhcp => {
            util::confirm(ctx, "Switch the management interface to DHCP")?;
            apply(ctx, "DHCP enabled", async |server| server.enable_dhcp().await).await
        }
    }
}
