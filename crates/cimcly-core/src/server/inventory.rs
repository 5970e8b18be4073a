// Composite views: the adapter tree and full inventory snapshots.

use tracing::debug;

use super::Server;
use crate::compose::compose_adapters;
use crate::error::CoreError;
use crate::model::{Adapter, Inventory, InventoryCategory};

impl Server {
    /// Network adapters with their ports and vNICs.
    ///
    /// Three class queries (`adaptorUnit`, `adaptorExtEthIf`,
    /// `adaptorHostEthIf`) joined by dn.
    pub async fn adapters(&self) -> Result<Vec<Adapter>, CoreError> {
        let adapters = self.objects("adapters", "adaptorUnit").await?;
        let ports = self.objects("adapters", "adaptorExtEthIf").await?;
        let vnics = self.objects("adapters", "adaptorHostEthIf").await?;
        debug!(
            target_host = self.host(),
            adapters = adapters.len(),
            ports = ports.len(),
            vnics = vnics.len(),
            "composing adapter tree"
        );
        Ok(compose_adapters(&adapters, &ports, &vnics))
    }

    /// Fetch the requested categories into one immutable snapshot.
    ///
    /// Categories are fetched in the given order; repeats are fetched once.
    /// The first failure aborts the whole fetch.
    pub async fn inventory(&self, categories: &[InventoryCategory]) -> Result<Inventory, CoreError> {
        let mut inventory = Inventory::default();
        let mut done: Vec<InventoryCategory> = Vec::with_capacity(categories.len());

        for &category in categories {
            if done.contains(&category) {
                continue;
            }
            done.push(category);
            match category {
                InventoryCategory::Chassis => inventory.chassis = Some(self.chassis().await?),
                InventoryCategory::Cimc => inventory.cimc = Some(self.cimc().await?),
                InventoryCategory::Adapters => inventory.adapters = Some(self.adapters().await?),
                InventoryCategory::Pci => inventory.pci = Some(self.pci().await?),
                InventoryCategory::Psu => inventory.psu = Some(self.psus().await?),
                InventoryCategory::Drives => inventory.drives = Some(self.drives().await?),
                InventoryCategory::DriveUsage => {
                    inventory.drive_usage = Some(self.drive_usage().await?);
                }
                InventoryCategory::StorageControllers => {
                    inventory.storage_controllers = Some(self.storage_controllers().await?);
                }
                InventoryCategory::Firmware => inventory.firmware = Some(self.firmware().await?),
                InventoryCategory::Bios => inventory.bios = Some(self.bios_settings().await?),
                InventoryCategory::Users => inventory.users = Some(self.users().await?),
                InventoryCategory::BootOrder => {
                    inventory.boot_order = Some(self.boot_order().await?);
                }
                InventoryCategory::MgmtIf => inventory.mgmt_if = Some(self.mgmt_interface().await?),
            }
        }

        Ok(inventory)
    }
}
