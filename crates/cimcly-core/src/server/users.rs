// Local user accounts (`aaaUser`).
//
// The device has a fixed number of user slots; an unused slot is an
// `aaaUser` with an empty name. Creating a user fills the first free slot.

use cimcly_api::{Element, ManagedObject, TimeoutClass};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use super::{Server, object_dn};
use crate::command::UserRequest;
use crate::error::CoreError;

impl Server {
    async fn user_slots(&self, operation: &str) -> Result<Vec<ManagedObject>, CoreError> {
        self.objects(operation, "aaaUser").await
    }

    /// Configured (named) users.
    pub async fn users(&self) -> Result<Vec<ManagedObject>, CoreError> {
        Ok(self
            .user_slots("users")
            .await?
            .into_iter()
            .filter(|u| !u.get_or_empty("name").is_empty())
            .collect())
    }

    pub async fn find_user(&self, name: &str) -> Result<ManagedObject, CoreError> {
        self.user_slots("find_user")
            .await?
            .into_iter()
            .find(|u| !name.is_empty() && u.get("name") == Some(name))
            .ok_or_else(|| CoreError::not_found("user", name))
    }

    /// The first slot without a user.
    pub async fn free_user_slot(&self) -> Result<ManagedObject, CoreError> {
        self.user_slots("free_user_slot")
            .await?
            .into_iter()
            .find(|u| u.get_or_empty("name").is_empty())
            .ok_or_else(|| CoreError::not_found("user slot", "free"))
    }

    pub async fn create_user(&self, request: &UserRequest) -> Result<(), CoreError> {
        validate_user(request)?;
        let slot = self.free_user_slot().await?;
        self.write_user("create_user", &slot, request).await?;
        info!(target_host = self.host(), user = %request.name, "user created");
        Ok(())
    }

    /// Update password, privilege and status of an existing user.
    pub async fn update_user(&self, request: &UserRequest) -> Result<(), CoreError> {
        validate_user(request)?;
        let user = self.find_user(&request.name).await?;
        self.write_user("update_user", &user, request).await?;
        info!(target_host = self.host(), user = %request.name, "user updated");
        Ok(())
    }

    pub async fn set_password(&self, name: &str, password: &SecretString) -> Result<(), CoreError> {
        if password.expose_secret().is_empty() {
            return Err(CoreError::Validation {
                message: "password must not be empty".into(),
            });
        }
        let user = self.find_user(name).await?;
        let dn = object_dn(&user)?;
        let item = Element::new("aaaUser")
            .with_attr("dn", dn.to_string())
            .with_attr("id", user.get_or_empty("id"))
            .with_attr("pwd", password.expose_secret());
        self.configure("set_password", &dn, vec![item], false, TimeoutClass::Request)
            .await?;
        info!(target_host = self.host(), user = name, "password changed");
        Ok(())
    }

    async fn write_user(
        &self,
        operation: &str,
        slot: &ManagedObject,
        request: &UserRequest,
    ) -> Result<(), CoreError> {
        let dn = object_dn(slot)?;
        let item = request.item(&dn.to_string(), slot.get_or_empty("id"));
        self.configure(operation, &dn, vec![item], false, TimeoutClass::Request)
            .await
    }
}

fn validate_user(request: &UserRequest) -> Result<(), CoreError> {
    if request.name.trim().is_empty() {
        return Err(CoreError::Validation {
            message: "user name must not be empty".into(),
        });
    }
    if request.password.expose_secret().is_empty() {
        return Err(CoreError::Validation {
            message: "password must not be empty".into(),
        });
    }
    Ok(())
}
