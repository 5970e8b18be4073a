// ── Domain model ──

pub mod adapter;
pub mod inventory;

pub use adapter::{Adapter, AdapterPort, Vnic};
pub use inventory::{
    BiosSettings, ChassisSummary, DriveInventory, FirmwareVersions, Inventory, InventoryCategory,
};
