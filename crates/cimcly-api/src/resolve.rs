// Resolve and configure commands
//
// Thin wrappers over the device's generic read and write verbs. Reads
// return the whole `Response`; callers take `out_configs()` or
// `managed_objects()` from it.

use tracing::debug;

use crate::client::CimcClient;
use crate::dn::Dn;
use crate::error::Error;
use crate::mo::ManagedObject;
use crate::transport::TimeoutClass;
use crate::xml::{Command, Element, Response};

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

impl CimcClient {
    /// `configResolveClass`: all objects of one class.
    pub async fn resolve_class(&self, class_id: &str, hierarchical: bool) -> Result<Response, Error> {
        let command = Command::new("configResolveClass")
            .param("inHierarchical", flag(hierarchical))
            .param("classId", class_id);
        self.execute(&command).await
    }

    /// `configResolveChildren`: all children of one dn.
    pub async fn resolve_children(&self, dn: &Dn, hierarchical: bool) -> Result<Response, Error> {
        let command = Command::new("configResolveChildren")
            .param("inHierarchical", flag(hierarchical))
            .param("inDn", dn.to_string());
        self.execute(&command).await
    }

    /// `configResolveDn`: one object by dn.
    pub async fn resolve_dn(&self, dn: &Dn, hierarchical: bool) -> Result<Response, Error> {
        let command = Command::new("configResolveDn")
            .param("inHierarchical", flag(hierarchical))
            .param("dn", dn.to_string());
        self.execute(&command).await
    }

    /// Shorthand: the flat objects of a non-hierarchical class query.
    pub async fn class_objects(&self, class_id: &str) -> Result<Vec<ManagedObject>, Error> {
        let objects = self.resolve_class(class_id, false).await?.managed_objects();
        debug!(class_id, count = objects.len(), "resolved class");
        Ok(objects)
    }

    /// `configConfMo`: apply `items` to the object at `dn`.
    pub async fn conf_mo(
        &self,
        dn: &Dn,
        items: impl IntoIterator<Item = Element>,
        hierarchical: bool,
        class: TimeoutClass,
    ) -> Result<Response, Error> {
        let command = items.into_iter().fold(
            Command::new("configConfMo")
                .param("dn", dn.to_string())
                .param("inHierarchical", flag(hierarchical)),
            Command::config_item,
        );
        debug!(dn = %dn, items = command.in_config().len(), "configuring managed object");
        self.execute_with(&command, class).await
    }
}
