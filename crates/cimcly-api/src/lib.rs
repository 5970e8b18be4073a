// cimcly-api: Async Rust client for the CIMC XML management API

pub mod auth;
pub mod client;
pub mod dn;
pub mod error;
pub mod mo;
pub mod resolve;
pub mod session;
pub mod transport;
pub mod xml;

pub use client::CimcClient;
pub use dn::{Dn, DnError};
pub use error::Error;
pub use mo::ManagedObject;
pub use session::{Session, SessionState};
pub use transport::{TimeoutClass, Timeouts, TlsMode, TransportConfig};
pub use xml::{Attributes, Command, Element, Response};
