//! Session facade and domain logic between `cimcly-api` and the CLI.
//!
//! - **[`Server`]**: one device, one session. Every management operation is
//!   a method returning `Result<_, CoreError>`; [`Server::scoped`] logs in,
//!   runs a body, and always logs out.
//!
//! - **[`compose`]**: pure reconstruction of the adapter tree and boot
//!   order from flat class listings.
//!
//! - **[`Remap`]**: the scope that turns api-layer failures into
//!   [`CoreError`] with target and operation context.
//!
//! - **Domain model** ([`model`]) and typed write requests ([`command`]).

pub mod command;
pub mod compose;
pub mod config;
pub mod error;
pub mod model;
pub mod remap;
pub mod server;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use config::{AuthCredentials, ServerConfig, TlsVerification};
pub use error::CoreError;
pub use model::{
    Adapter, AdapterPort, BiosSettings, ChassisSummary, DriveInventory, FirmwareVersions,
    Inventory, InventoryCategory, Vnic,
};
pub use remap::Remap;
pub use server::Server;

pub use cimcly_api::{Attributes, Dn, ManagedObject, SessionState};
