//! Boot order commands.

use tabled::Tabled;

use cimcly_core::BootDevice;

use crate::cli::{BootArgs, BootCommand, Toggle};
use crate::error::CliError;
use crate::output;

use super::{Context, View, apply, query, util};

#[derive(Tabled)]
struct BootRow {
    #[tabled(rename = "Order")]
    order: usize,
    #[tabled(rename = "Device")]
    device: String,
}

fn boot_table(_host: &str, order: &[String]) -> String {
    let rows: Vec<BootRow> = order
        .iter()
        .enumerate()
        .map(|(i, device)| BootRow {
            order: i + 1,
            device: device.clone(),
        })
        .collect();
    output::render_table(&rows)
}

pub async fn handle(ctx: &Context, args: BootArgs) -> Result<(), CliError> {
    match args.command {
        BootCommand::Show => {
            let view = View {
                table: boot_table,
                plain: |_, order: &[String]| order.join("\n"),
            };
            query(ctx, &view, async |server| server.boot_order().await).await
        }

        BootCommand::Set {
            devices,
            secure_boot,
        } => {
            let devices = devices
                .iter()
                .map(util::device_value::<_, BootDevice>)
                .collect::<Result<Vec<_>, _>>()?;
            let secure_boot = secure_boot.map(|t| t == Toggle::Enabled);
            let listed = devices
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");

            util::confirm(ctx, &format!("Set boot order to [{listed}]"))?;
            apply(ctx, &format!("boot order set to [{listed}]"), async |server| {
                server.set_boot_order(&devices, secure_boot).await
            })
            .await
        }
    }
}
