// ── Server facade ──
//
// One `Server` wraps one `CimcClient` and exposes every management
// operation as a method returning `Result<_, CoreError>`. Operations are
// grouped by area in the sibling modules as inherent methods. Each call
// into the api layer runs inside a `Remap` scope named after the operation.

mod chassis;
mod inventory;
mod mgmt;
mod storage;
mod users;

use cimcly_api::{CimcClient, Dn, Element, ManagedObject, Response, Session, SessionState, TimeoutClass};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::CoreError;
use crate::remap::Remap;

/// The compute unit every rack server exposes.
pub(crate) const RACK_UNIT: &str = "sys/rack-unit-1";

/// A session-scoped handle on one device.
pub struct Server {
    client: CimcClient,
}

impl Server {
    /// Build an unauthenticated server handle from config.
    pub fn new(config: &ServerConfig) -> Result<Self, CoreError> {
        let client = CimcClient::new(
            &config.host,
            config.auth.username.clone(),
            config.auth.password.clone(),
            &config.transport(),
        )
        .map_err(|e| Remap::new(&config.host, "connect").classify(e))?;
        Ok(Self { client })
    }

    /// Wrap an already-built client (tests, custom transports).
    pub fn with_client(client: CimcClient) -> Self {
        Self { client }
    }

    /// Log in, run `f`, and log out again whatever `f` returned.
    ///
    /// When login fails nothing else is sent. When both `f` and logout fail,
    /// `f`'s error is returned and the logout error is only logged.
    pub async fn scoped<T>(
        config: &ServerConfig,
        f: impl AsyncFnOnce(&mut Server) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        Self::new(config)?.within_session(f).await
    }

    /// `scoped` for an existing handle.
    pub async fn within_session<T>(
        mut self,
        f: impl AsyncFnOnce(&mut Server) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        self.login().await?;
        let result = f(&mut self).await;
        let logout = if self.client.is_authenticated() {
            self.logout().await
        } else {
            Ok(())
        };

        match (result, logout) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) | (Err(e), Ok(())) => Err(e),
            (Err(e), Err(logout_err)) => {
                warn!(
                    target_host = self.host(),
                    error = %logout_err,
                    "logout failed after operation error"
                );
                Err(e)
            }
        }
    }

    // ── Session ──────────────────────────────────────────────────────

    pub async fn login(&mut self) -> Result<(), CoreError> {
        let host = self.client.host().to_owned();
        Remap::new(&host, "login")
            .run(self.client.login())
            .await
            .map(|_| ())
    }

    pub async fn logout(&mut self) -> Result<(), CoreError> {
        let host = self.client.host().to_owned();
        Remap::new(&host, "logout").run(self.client.logout()).await
    }

    /// Renew the session cookie (`aaaRefresh`).
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let host = self.client.host().to_owned();
        Remap::new(&host, "refresh")
            .run(self.client.refresh())
            .await
            .map(|_| ())
    }

    pub fn host(&self) -> &str {
        self.client.host()
    }

    pub fn client(&self) -> &CimcClient {
        &self.client
    }

    pub fn state(&self) -> SessionState {
        self.client.state()
    }

    pub fn session(&self) -> Option<&Session> {
        self.client.session()
    }

    /// Outcome of the last failed logout, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.client.status_message()
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn remap<'a>(&'a self, operation: &'a str) -> Remap<'a> {
        Remap::new(self.client.host(), operation)
    }

    /// All objects of a class (non-hierarchical).
    pub(crate) async fn objects(
        &self,
        operation: &str,
        class_id: &str,
    ) -> Result<Vec<ManagedObject>, CoreError> {
        self.remap(operation)
            .run(self.client.class_objects(class_id))
            .await
    }

    pub(crate) async fn resolve_class(
        &self,
        operation: &str,
        class_id: &str,
        hierarchical: bool,
    ) -> Result<Response, CoreError> {
        self.remap(operation)
            .run(self.client.resolve_class(class_id, hierarchical))
            .await
    }

    pub(crate) async fn resolve_children(
        &self,
        operation: &str,
        dn: &Dn,
        hierarchical: bool,
    ) -> Result<Response, CoreError> {
        self.remap(operation)
            .run(self.client.resolve_children(dn, hierarchical))
            .await
    }

    /// `configConfMo` applying `items` to `dn`.
    pub(crate) async fn configure(
        &self,
        operation: &str,
        dn: &Dn,
        items: Vec<Element>,
        hierarchical: bool,
        class: TimeoutClass,
    ) -> Result<(), CoreError> {
        self.remap(operation)
            .run(self.client.conf_mo(dn, items, hierarchical, class))
            .await?;
        debug!(target_host = self.host(), operation, dn = %dn, "configuration applied");
        Ok(())
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if self.client.is_authenticated() {
            warn!(
                target_host = self.client.host(),
                "server dropped with an active session; cookie was not invalidated"
            );
        }
    }
}

/// Parse a dn that came from the device or the caller.
pub(crate) fn parse_dn(raw: &str) -> Result<Dn, CoreError> {
    Dn::parse(raw).map_err(|e| CoreError::Validation {
        message: e.to_string(),
    })
}

/// The dn of a fetched object; objects without one cannot be written back.
pub(crate) fn object_dn(mo: &ManagedObject) -> Result<Dn, CoreError> {
    mo.dn().ok_or_else(|| CoreError::Validation {
        message: format!("{} object has no usable dn", mo.class_id()),
    })
}
