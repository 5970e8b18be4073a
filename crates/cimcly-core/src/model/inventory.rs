// ── Inventory domain types ──

use cimcly_api::{Attributes, ManagedObject};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::adapter::Adapter;

/// One selectable part of a full inventory fetch. The string forms are the
/// serialized category names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum InventoryCategory {
    #[strum(serialize = "chassis")]
    #[serde(rename = "chassis")]
    Chassis,
    #[strum(serialize = "cimc")]
    #[serde(rename = "cimc")]
    Cimc,
    #[strum(serialize = "adaptor")]
    #[serde(rename = "adaptor")]
    Adapters,
    #[strum(serialize = "pci")]
    #[serde(rename = "pci")]
    Pci,
    #[strum(serialize = "psu")]
    #[serde(rename = "psu")]
    Psu,
    #[strum(serialize = "drives")]
    #[serde(rename = "drives")]
    Drives,
    #[strum(serialize = "drive_usage")]
    #[serde(rename = "drive_usage")]
    DriveUsage,
    #[strum(serialize = "storageControllers")]
    #[serde(rename = "storageControllers")]
    StorageControllers,
    #[strum(serialize = "fw")]
    #[serde(rename = "fw")]
    Firmware,
    #[strum(serialize = "bios")]
    #[serde(rename = "bios")]
    Bios,
    #[strum(serialize = "users")]
    #[serde(rename = "users")]
    Users,
    #[strum(serialize = "boot_order")]
    #[serde(rename = "boot_order")]
    BootOrder,
    #[strum(serialize = "mgmtIf")]
    #[serde(rename = "mgmtIf")]
    MgmtIf,
}

/// Physical and virtual drives, keyed by their class ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveInventory {
    #[serde(rename = "storageLocalDisk")]
    pub local_disks: Vec<ManagedObject>,
    #[serde(rename = "storageVirtualDrive")]
    pub virtual_drives: Vec<ManagedObject>,
}

impl DriveInventory {
    /// Physical drive by its `id` attribute.
    pub fn local_disk(&self, id: &str) -> Option<&ManagedObject> {
        self.local_disks.iter().find(|d| d.get("id") == Some(id))
    }

    /// Virtual drive by its `name` attribute.
    pub fn virtual_drive(&self, name: &str) -> Option<&ManagedObject> {
        self.virtual_drives.iter().find(|d| d.get("name") == Some(name))
    }
}

/// The handful of rack-unit attributes worth a one-line summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChassisSummary {
    pub name: String,
    pub model: String,
    pub serial: String,
    #[serde(rename = "totalMemory")]
    pub total_memory: String,
    #[serde(rename = "operPower")]
    pub oper_power: String,
}

impl From<&ManagedObject> for ChassisSummary {
    fn from(mo: &ManagedObject) -> Self {
        Self {
            name: mo.get_or_empty("name").to_owned(),
            model: mo.get_or_empty("model").to_owned(),
            serial: mo.get_or_empty("serial").to_owned(),
            total_memory: mo.get_or_empty("totalMemory").to_owned(),
            oper_power: mo.get_or_empty("operPower").to_owned(),
        }
    }
}

/// BIOS tokens: relative name → attributes (without `rn`).
pub type BiosSettings = IndexMap<String, Attributes>;

/// Running firmware: dn → version.
pub type FirmwareVersions = IndexMap<String, String>;

/// One inventory fetch. Each category is `None` unless it was requested;
/// the value is never cached or updated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chassis: Option<ManagedObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cimc: Option<ManagedObject>,
    #[serde(rename = "adaptor", skip_serializing_if = "Option::is_none")]
    pub adapters: Option<Vec<Adapter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pci: Option<Vec<ManagedObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psu: Option<Vec<ManagedObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drives: Option<DriveInventory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_usage: Option<Vec<ManagedObject>>,
    #[serde(rename = "storageControllers", skip_serializing_if = "Option::is_none")]
    pub storage_controllers: Option<Vec<ManagedObject>>,
    #[serde(rename = "fw", skip_serializing_if = "Option::is_none")]
    pub firmware: Option<FirmwareVersions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bios: Option<BiosSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<ManagedObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_order: Option<Vec<String>>,
    #[serde(rename = "mgmtIf", skip_serializing_if = "Option::is_none")]
    pub mgmt_if: Option<ManagedObject>,
}
