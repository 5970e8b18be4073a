// ── Adapter domain types ──
//
// Composed views of the network adapter tree. Each level keeps the device's
// flat attribute map and adds one nested list, so serialized output reads
// like the device's own objects with `port` / `vnic` children.

use cimcly_api::{Attributes, ManagedObject};
use serde::{Deserialize, Serialize};

/// A virtual NIC (`adaptorHostEthIf`).
pub type Vnic = ManagedObject;

/// A physical adapter port (`adaptorExtEthIf`) with the vNICs uplinked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterPort {
    #[serde(flatten)]
    pub attributes: Attributes,
    pub vnic: Vec<Vnic>,
}

/// A network adapter (`adaptorUnit`) with its ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adapter {
    #[serde(flatten)]
    pub attributes: Attributes,
    pub port: Vec<AdapterPort>,
}

impl Adapter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// PCI slot the adapter sits in (`pciSlot`).
    pub fn pci_slot(&self) -> &str {
        self.get("pciSlot").unwrap_or_default()
    }
}

impl AdapterPort {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn port_id(&self) -> &str {
        self.get("portId").unwrap_or_default()
    }
}
