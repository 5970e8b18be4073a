// ── Distinguished names ──
//
// A dn is the slash-delimited path of a managed object in the device's
// object tree, e.g. `sys/rack-unit-1/adaptor-2/ext-eth-1`. It is the only
// key that correlates objects fetched by independent class queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Index of the segment that names the owning adapter (`adaptor-N`)
/// for adapter-scoped objects.
const ADAPTER_SEGMENT: usize = 2;

/// Structured distinguished name: an ordered, non-empty list of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dn {
    segments: Vec<String>,
}

/// Returned when a string cannot be parsed as a dn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid dn {raw:?}: {reason}")]
pub struct DnError {
    pub raw: String,
    pub reason: &'static str,
}

impl Dn {
    /// Parse a dn. Leading/trailing slashes are tolerated; empty inner
    /// segments (`a//b`) are rejected.
    pub fn parse(raw: &str) -> Result<Self, DnError> {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(DnError {
                raw: raw.to_owned(),
                reason: "empty path",
            });
        }
        let segments: Vec<String> = trimmed.split('/').map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(DnError {
                raw: raw.to_owned(),
                reason: "empty path segment",
            });
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// The compute unit segment (`rack-unit-1`), if present.
    pub fn unit(&self) -> Option<&str> {
        self.segment(1)
    }

    /// The adapter identity of an adapter-scoped object.
    ///
    /// This is the third segment: `adaptor-2` for both
    /// `sys/rack-unit-1/adaptor-2` and `sys/rack-unit-1/adaptor-2/host-eth-1`.
    /// Shorter paths have no adapter identity.
    pub fn adapter(&self) -> Option<&str> {
        self.segment(ADAPTER_SEGMENT)
    }

    /// The relative name (last segment).
    pub fn rn(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// The containing dn, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append a relative name. `rn` may itself contain slashes.
    pub fn child(&self, rn: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(
            rn.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        );
        Self { segments }
    }

    /// `true` if `self` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &Self) -> bool {
        self.segments.len() > ancestor.segments.len()
            && self.segments.starts_with(&ancestor.segments)
    }

    /// `true` if both dns carry the same adapter identity.
    pub fn same_adapter(&self, other: &Self) -> bool {
        matches!((self.adapter(), other.adapter()), (Some(a), Some(b)) if a == b)
    }
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for Dn {
    type Err = DnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Dn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_segments() {
        let dn = Dn::parse("sys/rack-unit-1/adaptor-2/ext-eth-1").unwrap();
        assert_eq!(dn.depth(), 4);
        assert_eq!(dn.unit(), Some("rack-unit-1"));
        assert_eq!(dn.adapter(), Some("adaptor-2"));
        assert_eq!(dn.rn(), "ext-eth-1");
        assert_eq!(dn.to_string(), "sys/rack-unit-1/adaptor-2/ext-eth-1");
    }

    #[test]
    fn short_dn_has_no_adapter() {
        let dn = Dn::parse("sys/rack-unit-1").unwrap();
        assert_eq!(dn.adapter(), None);
        assert!(!dn.same_adapter(&dn));
    }

    #[test]
    fn rejects_empty_paths() {
        assert!(Dn::parse("").is_err());
        assert!(Dn::parse("///").is_err());
        assert!(Dn::parse("sys//rack-unit-1").is_err());
    }

    #[test]
    fn tolerates_outer_slashes() {
        let dn: Dn = "/sys/rack-unit-1/".parse().unwrap();
        assert_eq!(dn.to_string(), "sys/rack-unit-1");
    }

    #[test]
    fn parent_and_child() {
        let dn = Dn::parse("sys/rack-unit-1/board/storage-SAS-SLOT-4").unwrap();
        let pd = dn.child("pd-8");
        assert_eq!(pd.to_string(), "sys/rack-unit-1/board/storage-SAS-SLOT-4/pd-8");
        assert_eq!(pd.parent().unwrap(), dn);
        assert!(pd.is_descendant_of(&dn));
        assert!(!dn.is_descendant_of(&dn));
        assert_eq!(Dn::parse("sys").unwrap().parent(), None);
    }

    #[test]
    fn same_adapter_compares_third_segment() {
        let port = Dn::parse("sys/rack-unit-1/adaptor-2/ext-eth-1").unwrap();
        let vnic = Dn::parse("sys/rack-unit-1/adaptor-2/host-eth-eth0").unwrap();
        let other = Dn::parse("sys/rack-unit-1/adaptor-5/host-eth-eth0").unwrap();
        assert!(port.same_adapter(&vnic));
        assert!(!port.same_adapter(&other));
    }
}
