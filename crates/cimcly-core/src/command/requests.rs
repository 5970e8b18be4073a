// ── Typed request values for management writes ──
//
// Enumerated device vocabularies (power actions, SOL speeds, boot devices)
// are closed enums whose string forms are the exact attribute values the
// device expects. Each request knows how to render its `inConfig` item.

use std::net::Ipv4Addr;

use cimcly_api::{Dn, Element};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

// ── Power ──────────────────────────────────────────────────────────

/// `adminPower` actions on the rack unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PowerState {
    Up,
    Down,
    SoftShutDown,
    CycleImmediate,
    HardResetImmediate,
    BmcResetImmediate,
    BmcResetDefault,
    CmosResetImmediate,
    DiagnosticInterrupt,
}

// ── Serial over LAN ────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SolState {
    #[default]
    Enable,
    Disable,
}

/// SOL baud rate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
pub enum SolSpeed {
    #[strum(serialize = "9600")]
    #[serde(rename = "9600")]
    B9600,
    #[strum(serialize = "19200")]
    #[serde(rename = "19200")]
    B19200,
    #[strum(serialize = "38400")]
    #[serde(rename = "38400")]
    B38400,
    #[strum(serialize = "57600")]
    #[serde(rename = "57600")]
    B57600,
    #[default]
    #[strum(serialize = "115200")]
    #[serde(rename = "115200")]
    B115200,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ComPort {
    #[default]
    Com0,
    Com1,
}

// ── Boot policy ────────────────────────────────────────────────────

/// Boot device kinds of the legacy boot policy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BootDevice {
    VirtualMedia,
    Storage,
    Lan,
    Efi,
}

impl BootDevice {
    /// Class id and relative name of this device's boot policy entry.
    fn class_and_rn(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::VirtualMedia => ("lsbootVirtualMedia", "vm-read-only", "read-only"),
            Self::Storage => ("lsbootStorage", "storage-read-write", "read-write"),
            Self::Lan => ("lsbootLan", "lan-read-only", "read-only"),
            Self::Efi => ("lsbootEfi", "efi-read-only", "read-only"),
        }
    }

    /// The boot policy entry placing this device at position `order`.
    pub(crate) fn item(self, policy: &Dn, order: usize) -> Element {
        let (class_id, rn, access) = self.class_and_rn();
        let kind: &'static str = self.into();
        Element::new(class_id)
            .with_attr("dn", policy.child(rn).to_string())
            .with_attr("access", access)
            .with_attr("order", order.to_string())
            .with_attr("type", kind)
    }
}

// ── Storage ────────────────────────────────────────────────────────

/// Create a virtual drive from unused physical drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVirtualDriveRequest {
    /// Storage controller dn, e.g. `sys/rack-unit-1/board/storage-SAS-SLOT-2`.
    pub controller_dn: Dn,
    pub name: String,
    /// RAID level as the controller names it (`0`, `1`, `5`, `10`, ...).
    pub raid_level: String,
    /// Size with unit, e.g. `952720 MB`.
    pub size: String,
    /// Physical drive ids, e.g. `5` or `1,2`.
    pub drive_group: String,
    /// e.g. `Write Back Good BBU`.
    pub write_policy: String,
    pub strip_size: String,
}

impl CreateVirtualDriveRequest {
    pub(crate) fn creator_dn(&self) -> Dn {
        self.controller_dn.child("virtual-drive-create")
    }

    pub(crate) fn item(&self) -> Element {
        Element::new("storageVirtualDriveCreatorUsingUnusedPhysicalDrive")
            .with_attr("dn", self.creator_dn().to_string())
            .with_attr("virtualDriveName", &self.name)
            .with_attr("raidLevel", &self.raid_level)
            .with_attr("size", &self.size)
            .with_attr("driveGroup", format!("[{}]", self.drive_group))
            .with_attr("writePolicy", &self.write_policy)
            .with_attr("stripSize", &self.strip_size)
            .with_attr("adminState", "trigger")
    }
}

/// Default strip size for new virtual drives.
pub const DEFAULT_STRIP_SIZE: &str = "64k";

// ── Users ──────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum UserPrivilege {
    #[default]
    Admin,
    User,
    ReadOnly,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

/// Create or update a local user account.
#[derive(Debug, Clone)]
pub struct UserRequest {
    pub name: String,
    pub password: SecretString,
    pub privilege: UserPrivilege,
    pub account_status: AccountStatus,
}

impl UserRequest {
    /// `aaaUser` item for the slot `id` at `dn`.
    pub(crate) fn item(&self, dn: &str, id: &str) -> Element {
        let privilege: &'static str = self.privilege.into();
        let status: &'static str = self.account_status.into();
        Element::new("aaaUser")
            .with_attr("dn", dn)
            .with_attr("id", id)
            .with_attr("name", &self.name)
            .with_attr("pwd", self.password.expose_secret())
            .with_attr("priv", privilege)
            .with_attr("accountStatus", status)
    }
}

// ── Management interface ───────────────────────────────────────────

/// Static IPv4 settings for the management interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MgmtIpRequest {
    pub ip: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

impl MgmtIpRequest {
    pub(crate) fn item(&self, dn: &str) -> Element {
        Element::new("mgmtIf")
            .with_attr("dn", dn)
            .with_attr("extIp", self.ip.to_string())
            .with_attr("extMask", self.mask.to_string())
            .with_attr("extGw", self.gateway.to_string())
            .with_attr("dhcpEnable", "no")
            .with_attr("dnsUsingDhcp", "no")
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NicMode {
    #[default]
    Dedicated,
    SharedLom,
    #[strum(serialize = "shared_lom_10g")]
    #[serde(rename = "shared_lom_10g")]
    SharedLom10g,
    SharedLomExt,
    CiscoCard,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum NicRedundancy {
    #[default]
    None,
    ActiveActive,
    ActiveStandby,
}

/// NIC mode and redundancy for the management interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MgmtModeRequest {
    pub nic_mode: NicMode,
    pub nic_redundancy: NicRedundancy,
    pub v6_enabled: bool,
}

impl MgmtModeRequest {
    pub(crate) fn item(&self, dn: &str) -> Element {
        let mode: &'static str = self.nic_mode.into();
        let redundancy: &'static str = self.nic_redundancy.into();
        Element::new("mgmtIf")
            .with_attr("dn", dn)
            .with_attr("nicMode", mode)
            .with_attr("nicRedundancy", redundancy)
            .with_attr("autoNeg", "enabled")
            .with_attr("v6extEnabled", if self.v6_enabled { "yes" } else { "no" })
    }
}
