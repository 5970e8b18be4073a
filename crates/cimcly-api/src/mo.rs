use serde::{Deserialize, Serialize};

use crate::dn::Dn;
use crate::xml::{Attributes, Element};

/// One remote entity as returned by a resolve query: the class id (XML tag)
/// plus its flat attribute map. No typed schema is imposed.
///
/// Serializes as the bare attribute map so inventory output mirrors the
/// device's own attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManagedObject {
    #[serde(skip)]
    class_id: String,
    #[serde(flatten)]
    attributes: Attributes,
}

impl ManagedObject {
    pub fn new(class_id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            class_id: class_id.into(),
            attributes,
        }
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Attribute value or `""` when absent (the device omits empty fields
    /// inconsistently).
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// The object's dn, if it has a well-formed one.
    pub fn dn(&self) -> Option<Dn> {
        self.get("dn").and_then(|raw| Dn::parse(raw).ok())
    }
}

impl From<&Element> for ManagedObject {
    fn from(element: &Element) -> Self {
        Self {
            class_id: element.tag.clone(),
            attributes: element.attributes.clone(),
        }
    }
}

impl From<Element> for ManagedObject {
    fn from(element: Element) -> Self {
        Self {
            class_id: element.tag,
            attributes: element.attributes,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_flat_map() {
        let mo = ManagedObject::from(
            Element::new("equipmentPsu")
                .with_attr("id", "1")
                .with_attr("dn", "sys/rack-unit-1/psu-1"),
        );
        let json = serde_json::to_string(&mo).unwrap();
        assert_eq!(json, r#"{"id":"1","dn":"sys/rack-unit-1/psu-1"}"#);
        assert_eq!(mo.dn().unwrap().rn(), "psu-1");
    }

    #[test]
    fn missing_or_bad_dn_is_none() {
        let mo = ManagedObject::from(Element::new("aaaUser").with_attr("id", "1"));
        assert!(mo.dn().is_none());
        let mo = ManagedObject::from(Element::new("aaaUser").with_attr("dn", ""));
        assert!(mo.dn().is_none());
        assert_eq!(mo.get_or_empty("name"), "");
    }
}
