//! String identifiers issued by the hosted identity and document services.
//!
//! Both are opaque to this crate. They are newtypes so that a user id can
//! never be passed where a group id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity-provider user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    /// Wrap a provider-issued user id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Document-store group id, as carried in `/group/join/:groupId` links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Parse a group id from a path segment or persisted value.
    ///
    /// Returns `None` for empty or whitespace-only input and for values
    /// containing a path separator, which can never be a single segment.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_id_parse_trims() {
        assert_eq!(GroupId::parse("  G1 ").unwrap().as_str(), "G1");
    }

    #[test]
    fn test_group_id_rejects_empty_and_slashes() {
        assert!(GroupId::parse("").is_none());
        assert!(GroupId::parse("   ").is_none());
        assert!(GroupId::parse("a/b").is_none());
    }

    #[test]
    fn test_identifiers_serialize_transparently() {
        let uid = Uid::new("u-1");
        assert_eq!(serde_json::to_string(&uid).unwrap(), "\"u-1\"");
    }
}
