// Rack unit, firmware, BIOS, power, serial-over-LAN and boot policy.

use std::collections::HashSet;

use cimcly_api::{Element, ManagedObject, TimeoutClass};
use tracing::info;

use super::{RACK_UNIT, Server, parse_dn};
use crate::command::{BootDevice, ComPort, PowerState, SolSpeed, SolState};
use crate::compose;
use crate::error::CoreError;
use crate::model::{BiosSettings, ChassisSummary, FirmwareVersions};

const MGMT: &str = "sys/rack-unit-1/mgmt";
const BOOT_POLICY: &str = "sys/rack-unit-1/boot-policy";
const SOL_IF: &str = "sys/rack-unit-1/sol-if";

impl Server {
    /// `computeRackUnit`: the chassis object.
    pub async fn chassis(&self) -> Result<ManagedObject, CoreError> {
        self.objects("chassis", "computeRackUnit")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::not_found("rack unit", RACK_UNIT))
    }

    pub async fn chassis_summary(&self) -> Result<ChassisSummary, CoreError> {
        Ok(ChassisSummary::from(&self.chassis().await?))
    }

    /// The CIMC's own management interface, as a child of `sys/rack-unit-1/mgmt`.
    pub async fn cimc(&self) -> Result<ManagedObject, CoreError> {
        let resp = self.resolve_children("cimc", &parse_dn(MGMT)?, true).await?;
        resp.out_configs()
            .iter()
            .find(|e| e.tag == "mgmtIf")
            .map(ManagedObject::from)
            .ok_or_else(|| CoreError::not_found("management interface", MGMT))
    }

    /// `pciEquipSlot`: installed PCI cards.
    pub async fn pci(&self) -> Result<Vec<ManagedObject>, CoreError> {
        self.objects("pci", "pciEquipSlot").await
    }

    /// `equipmentPsu`: power supplies.
    pub async fn psus(&self) -> Result<Vec<ManagedObject>, CoreError> {
        self.objects("psus", "equipmentPsu").await
    }

    /// Running firmware versions by dn. Boot-loader entries are left out.
    pub async fn firmware(&self) -> Result<FirmwareVersions, CoreError> {
        let resp = self
            .resolve_class("firmware", "firmwareRunning", false)
            .await?;
        Ok(resp
            .root()
            .descendants("firmwareRunning")
            .into_iter()
            .filter_map(|fw| Some((fw.get("dn")?, fw.get("version").unwrap_or_default())))
            .filter(|(dn, _)| !dn.contains("fw-boot-loader"))
            .map(|(dn, version)| (dn.to_owned(), version.to_owned()))
            .collect())
    }

    /// BIOS tokens keyed by relative name.
    pub async fn bios_settings(&self) -> Result<BiosSettings, CoreError> {
        let resp = self.resolve_class("bios", "biosSettings", true).await?;
        let Some(settings) = resp.out_configs().iter().find(|e| e.tag == "biosSettings") else {
            return Ok(BiosSettings::new());
        };
        Ok(settings
            .children
            .iter()
            .filter_map(|token| {
                let rn = token.get("rn")?.to_owned();
                let mut attributes = token.attributes.clone();
                attributes.shift_remove("rn");
                Some((rn, attributes))
            })
            .collect())
    }

    // ── Power & SOL ──────────────────────────────────────────────────

    pub async fn set_power_state(&self, state: PowerState) -> Result<(), CoreError> {
        let dn = parse_dn(RACK_UNIT)?;
        let item = Element::new("computeRackUnit")
            .with_attr("dn", RACK_UNIT)
            .with_attr("adminPower", state.to_string());
        self.configure("set_power_state", &dn, vec![item], false, TimeoutClass::Request)
            .await?;
        info!(target_host = self.host(), %state, "power state changed");
        Ok(())
    }

    /// Configure serial over LAN.
    pub async fn set_sol(
        &self,
        state: SolState,
        speed: SolSpeed,
        comport: ComPort,
    ) -> Result<(), CoreError> {
        let dn = parse_dn(SOL_IF)?;
        let item = Element::new("solIf")
            .with_attr("dn", SOL_IF)
            .with_attr("adminState", state.to_string())
            .with_attr("speed", speed.to_string())
            .with_attr("comport", comport.to_string());
        self.configure("set_sol", &dn, vec![item], false, TimeoutClass::Request)
            .await?;
        info!(target_host = self.host(), %state, %speed, %comport, "SOL configured");
        Ok(())
    }

    // ── Boot policy ──────────────────────────────────────────────────

    /// Boot device types in boot order.
    pub async fn boot_order(&self) -> Result<Vec<String>, CoreError> {
        let resp = self
            .resolve_children("boot_order", &parse_dn(BOOT_POLICY)?, false)
            .await?;
        Ok(compose::boot_order(&resp.managed_objects()))
    }

    /// Replace the boot order. `devices` are numbered 1..n in the given
    /// order; `secure_boot` additionally sets the boot security entry.
    pub async fn set_boot_order(
        &self,
        devices: &[BootDevice],
        secure_boot: Option<bool>,
    ) -> Result<(), CoreError> {
        if devices.is_empty() {
            return Err(CoreError::Validation {
                message: "boot order needs at least one device".into(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = devices.iter().find(|d| !seen.insert(**d)) {
            return Err(CoreError::Validation {
                message: format!("boot device {dup} listed twice"),
            });
        }

        let policy = parse_dn(BOOT_POLICY)?;
        let mut items: Vec<Element> = devices
            .iter()
            .enumerate()
            .map(|(i, device)| device.item(&policy, i + 1))
            .collect();
        if let Some(enabled) = secure_boot {
            items.push(
                Element::new("lsbootBootSecurity")
                    .with_attr("dn", policy.child("boot-security").to_string())
                    .with_attr("secureBoot", if enabled { "enabled" } else { "disabled" }),
            );
        }

        self.configure("set_boot_order", &policy, items, false, TimeoutClass::Request)
            .await?;
        info!(target_host = self.host(), ?devices, "boot order changed");
        Ok(())
    }
}
