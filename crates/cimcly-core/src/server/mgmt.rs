// Management interface (`mgmtIf`) settings.
//
// Every write targets the interface's own dn, fetched fresh for each call.

use cimcly_api::{Element, ManagedObject, TimeoutClass};
use tracing::info;

use super::{Server, object_dn};
use crate::command::{MgmtIpRequest, MgmtModeRequest};
use crate::error::CoreError;

impl Server {
    /// The management interface object (`mgmtIf`, hierarchical).
    pub async fn mgmt_interface(&self) -> Result<ManagedObject, CoreError> {
        let resp = self.resolve_class("mgmt_interface", "mgmtIf", true).await?;
        resp.out_configs()
            .first()
            .map(ManagedObject::from)
            .ok_or_else(|| CoreError::not_found("management interface", "mgmtIf"))
    }

    async fn configure_mgmt(
        &self,
        operation: &str,
        item: impl FnOnce(&str) -> Element,
    ) -> Result<(), CoreError> {
        let mgmt = self.mgmt_interface().await?;
        let dn = object_dn(&mgmt)?;
        self.configure(
            operation,
            &dn,
            vec![item(&dn.to_string())],
            false,
            TimeoutClass::Request,
        )
        .await
    }

    /// Static IPv4 addressing; disables DHCP.
    pub async fn set_mgmt_ip(&self, request: &MgmtIpRequest) -> Result<(), CoreError> {
        self.configure_mgmt("set_mgmt_ip", |dn| request.item(dn))
            .await?;
        info!(target_host = self.host(), ip = %request.ip, "management IP changed");
        Ok(())
    }

    pub async fn set_mgmt_mode(&self, request: &MgmtModeRequest) -> Result<(), CoreError> {
        self.configure_mgmt("set_mgmt_mode", |dn| request.item(dn))
            .await?;
        info!(
            target_host = self.host(),
            nic_mode = %request.nic_mode,
            "management interface mode changed"
        );
        Ok(())
    }

    pub async fn set_hostname(&self, hostname: &str) -> Result<(), CoreError> {
        let hostname = hostname.trim();
        if hostname.is_empty() {
            return Err(CoreError::Validation {
                message: "hostname must not be empty".into(),
            });
        }
        self.configure_mgmt("set_hostname", |dn| {
            Element::new("mgmtIf")
                .with_attr("dn", dn)
                .with_attr("hostname", hostname)
        })
        .await?;
        info!(target_host = self.host(), hostname, "hostname changed");
        Ok(())
    }

    pub async fn enable_dhcp(&self) -> Result<(), CoreError> {
        self.configure_mgmt("enable_dhcp", |dn| {
            Element::new("mgmtIf")
                .with_attr("dn", dn)
                .with_attr("dhcpEnable", "yes")
        })
        .await?;
        info!(target_host = self.host(), "DHCP enabled");
        Ok(())
    }
}
