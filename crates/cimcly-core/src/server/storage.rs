// Drives, storage controllers and virtual drive configuration.
//
// Drive writes are applied synchronously by the RAID controller and use the
// long-running timeout class.

use cimcly_api::{Dn, Element, ManagedObject, TimeoutClass};
use tracing::info;

use super::{Server, object_dn};
use crate::command::CreateVirtualDriveRequest;
use crate::error::CoreError;
use crate::model::DriveInventory;

impl Server {
    /// Physical (`storageLocalDisk`) and virtual (`storageVirtualDrive`) drives.
    pub async fn drives(&self) -> Result<DriveInventory, CoreError> {
        Ok(DriveInventory {
            local_disks: self.objects("drives", "storageLocalDisk").await?,
            virtual_drives: self.objects("drives", "storageVirtualDrive").await?,
        })
    }

    /// `storageLocalDiskUsage`.
    pub async fn drive_usage(&self) -> Result<Vec<ManagedObject>, CoreError> {
        self.objects("drive_usage", "storageLocalDiskUsage").await
    }

    /// `storageController`.
    pub async fn storage_controllers(&self) -> Result<Vec<ManagedObject>, CoreError> {
        self.objects("storage_controllers", "storageController")
            .await
    }

    pub async fn create_virtual_drive(
        &self,
        request: &CreateVirtualDriveRequest,
    ) -> Result<(), CoreError> {
        if request.name.trim().is_empty() || request.drive_group.trim().is_empty() {
            return Err(CoreError::Validation {
                message: "virtual drive needs a name and a drive group".into(),
            });
        }
        self.configure(
            "create_virtual_drive",
            &request.creator_dn(),
            vec![request.item()],
            false,
            TimeoutClass::LongRunning,
        )
        .await?;
        info!(
            target_host = self.host(),
            name = %request.name,
            raid_level = %request.raid_level,
            "virtual drive created"
        );
        Ok(())
    }

    /// Mark the physical drive with `id` as unconfigured-good.
    pub async fn set_drive_unconfigured_good(&self, id: &str) -> Result<(), CoreError> {
        let drives = self.drives().await?;
        let disk = drives
            .local_disk(id)
            .ok_or_else(|| CoreError::not_found("physical drive", id))?;
        let dn = object_dn(disk)?;
        self.make_unconfigured_good("set_drive_unconfigured_good", &dn, id)
            .await
    }

    /// Convert JBOD drive `id` on `controller` back to unconfigured-good,
    /// without looking the drive up first.
    pub async fn jbod_to_unconfigured_good(&self, controller: &Dn, id: &str) -> Result<(), CoreError> {
        let dn = controller.child(&format!("pd-{id}"));
        self.make_unconfigured_good("jbod_to_unconfigured_good", &dn, id)
            .await
    }

    async fn make_unconfigured_good(&self, operation: &str, dn: &Dn, id: &str) -> Result<(), CoreError> {
        let item = Element::new("storageLocalDisk")
            .with_attr("dn", dn.to_string())
            .with_attr("id", id)
            .with_attr("adminAction", "make-unconfigured-good");
        self.configure(operation, dn, vec![item], true, TimeoutClass::LongRunning)
            .await?;
        info!(target_host = self.host(), dn = %dn, "drive set to unconfigured good");
        Ok(())
    }

    /// Make the virtual drive called `name` the boot drive.
    pub async fn set_boot_drive(&self, name: &str) -> Result<(), CoreError> {
        let drives = self.drives().await?;
        let drive = drives
            .virtual_drive(name)
            .ok_or_else(|| CoreError::not_found("virtual drive", name))?;
        let dn = object_dn(drive)?;
        let item = Element::new("storageVirtualDrive")
            .with_attr("dn", dn.to_string())
            .with_attr("id", drive.get_or_empty("id"))
            .with_attr("adminAction", "set-boot-drive");
        self.configure("set_boot_drive", &dn, vec![item], true, TimeoutClass::LongRunning)
            .await?;
        info!(target_host = self.host(), dn = %dn, "boot drive set");
        Ok(())
    }
}
