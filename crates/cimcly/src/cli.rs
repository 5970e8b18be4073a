//! Clap derive structures for the `cimcly` CLI.
//!
//! Defines the command tree, global flags, and the closed value sets the
//! device accepts. This file is also compiled by `build.rs` for man pages,
//! so it may only depend on clap and clap_complete.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cimcly -- manage CIMC rack servers over the XML API
#[derive(Debug, Parser)]
#[command(
    name = "cimcly",
    version,
    about = "Manage CIMC rack servers from the command line",
    long_about = "Inventory and configuration for rack servers through their\n\
        management controller's XML API.\n\n\
        Every command runs against each target in turn, with its own\n\
        login and logout. Targets come from --server or the config file.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Target address (repeatable; overrides `servers` from the config)
    #[arg(
        long,
        short = 's',
        env = "CIMCLY_SERVER",
        value_delimiter = ',',
        global = true
    )]
    pub server: Vec<String>,

    /// Config file path
    #[arg(long, env = "CIMCLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "CIMCLY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CIMCLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Command timeout in seconds
    #[arg(long, env = "CIMCLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interface inventory: adapters, ports and vNICs (or everything with --full)
    #[command(alias = "inv")]
    Inventory(InventoryArgs),

    /// Rack unit summary
    Chassis,

    /// Management controller details
    Cimc,

    /// Network adapters with ports and vNICs
    Adapters,

    /// PCI slots
    Pci,

    /// Power supplies
    Psu,

    /// Running firmware versions
    #[command(alias = "fw")]
    Firmware,

    /// BIOS settings
    Bios,

    /// Show or change the boot order
    Boot(BootArgs),

    /// Physical and virtual drives
    Drives(DrivesArgs),

    /// Local user accounts
    Users(UsersArgs),

    /// Management interface network settings
    Mgmt(MgmtArgs),

    /// Change the power state
    Power(PowerArgs),

    /// Configure serial over LAN
    Sol(SolArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Inventory ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InventoryArgs {
    /// Render the full inventory instead of the one-line interface report
    #[arg(long)]
    pub full: bool,

    /// Categories for --full (default: all)
    #[arg(long, short = 'c', value_delimiter = ',', requires = "full")]
    pub category: Vec<InventoryCategoryArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InventoryCategoryArg {
    Chassis,
    Cimc,
    Adaptor,
    Pci,
    Psu,
    Drives,
    #[value(name = "drive_usage")]
    DriveUsage,
    #[value(name = "storageControllers")]
    StorageControllers,
    Fw,
    Bios,
    Users,
    #[value(name = "boot_order")]
    BootOrder,
    #[value(name = "mgmtIf")]
    MgmtIf,
}

// ── Boot ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BootArgs {
    #[command(subcommand)]
    pub command: BootCommand,
}

#[derive(Debug, Subcommand)]
pub enum BootCommand {
    /// Show boot device types in order
    Show,

    /// Replace the boot order
    Set {
        /// Devices in boot order (comma-separated)
        #[arg(required = true, value_delimiter = ',')]
        devices: Vec<BootDeviceArg>,

        /// Also set secure boot
        #[arg(long)]
        secure_boot: Option<Toggle>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BootDeviceArg {
    VirtualMedia,
    Storage,
    Lan,
    Efi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    Enabled,
    Disabled,
}

// ── Drives ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DrivesArgs {
    #[command(subcommand)]
    pub command: DrivesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DrivesCommand {
    /// List physical and virtual drives
    #[command(alias = "ls")]
    List,

    /// Physical drive usage by virtual drives
    Usage,

    /// Storage controllers
    Controllers,

    /// Create a virtual drive from unused physical drives
    CreateVd(CreateVdArgs),

    /// Make a physical drive unconfigured-good
    UnconfiguredGood {
        /// Physical drive id
        id: String,
    },

    /// Move a JBOD drive to unconfigured-good
    JbodToUnconfiguredGood {
        /// Storage controller dn
        #[arg(long)]
        controller: String,

        /// Physical drive id
        id: String,
    },

    /// Mark a virtual drive as the boot drive
    SetBoot {
        /// Virtual drive name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CreateVdArgs {
    /// Storage controller dn, e.g. sys/rack-unit-1/board/storage-SAS-SLOT-2
    #[arg(long)]
    pub controller: String,

    /// Virtual drive name
    #[arg(long)]
    pub name: String,

    /// RAID level (0, 1, 5, 10, ...)
    #[arg(long)]
    pub raid_level: String,

    /// Size with unit, e.g. "952720 MB"
    #[arg(long)]
    pub size: String,

    /// Physical drive ids, e.g. "1,2"
    #[arg(long)]
    pub drives: String,

    /// Write policy
    #[arg(long, default_value = "Write Back Good BBU")]
    pub write_policy: String,

    /// Strip size
    #[arg(long, default_value = "64k")]
    pub strip_size: String,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List configured users
    #[command(alias = "ls")]
    List,

    /// Create a user in the first free slot
    Create(UserArgs),

    /// Update an existing user
    Update(UserArgs),

    /// Change a user's password
    SetPassword {
        /// User name
        name: String,

        /// New password (prompted when omitted)
        #[arg(long, env = "CIMCLY_USER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct UserArgs {
    /// User name
    pub name: String,

    /// Password (prompted when omitted)
    #[arg(long, env = "CIMCLY_USER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Privilege level
    #[arg(long, default_value = "read-only")]
    pub privilege: PrivilegeArg,

    /// Account status
    #[arg(long, default_value = "active")]
    pub status: AccountStatusArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrivilegeArg {
    Admin,
    User,
    ReadOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AccountStatusArg {
    Active,
    Inactive,
}

// ── Management interface ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MgmtArgs {
    #[command(subcommand)]
    pub command: MgmtCommand,
}

#[derive(Debug, Subcommand)]
pub enum MgmtCommand {
    /// Show management interface settings
    Show,

    /// Set a static address (disables DHCP)
    SetIp {
        /// Address
        #[arg(long)]
        ip: Ipv4Addr,

        /// Netmask
        #[arg(long)]
        mask: Ipv4Addr,

        /// Default gateway
        #[arg(long)]
        gateway: Ipv4Addr,
    },

    /// Set NIC mode and redundancy
    SetMode {
        #[arg(long)]
        nic_mode: NicModeArg,

        #[arg(long, default_value = "none")]
        redundancy: NicRedundancyArg,

        /// Enable IPv6
        #[arg(long)]
        ipv6: bool,
    },

    /// Set the controller hostname
    SetHostname { hostname: String },

    /// Switch to DHCP addressing
    EnableDhcp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NicModeArg {
    Dedicated,
    #[value(name = "shared_lom")]
    SharedLom,
    #[value(name = "shared_lom_10g")]
    SharedLom10g,
    #[value(name = "shared_lom_ext")]
    SharedLomExt,
    #[value(name = "cisco_card")]
    CiscoCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NicRedundancyArg {
    None,
    ActiveActive,
    ActiveStandby,
}

// ── Power & SOL ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PowerArgs {
    /// Target power state
    pub state: PowerStateArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerStateArg {
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

#[derive(Debug, Args)]
pub struct SolArgs {
    /// Enable or disable serial over LAN
    pub state: SolStateArg,

    /// Baud rate
    #[arg(long, default_value = "115200")]
    pub speed: SolSpeedArg,

    /// Serial port
    #[arg(long, default_value = "com0")]
    pub comport: ComPortArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SolStateArg {
    Enable,
    Disable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SolSpeedArg {
    #[value(name = "9600")]
    B9600,
    #[value(name = "19200")]
    B19200,
    #[value(name = "38400")]
    B38400,
    #[value(name = "57600")]
    B57600,
    #[value(name = "115200")]
    B115200,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComPortArg {
    Com0,
    Com1,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration (passwords masked)
    Show,

    /// Print the config file path
    Path,

    /// Store a password in the system keyring
    SetPassword {
        /// Credentials entry (an address, or 0.0.0.0 for the wildcard)
        #[arg(default_value = "0.0.0.0")]
        entry: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
