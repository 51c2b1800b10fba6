//! Group documents as read from the document store.

use crate::identifiers::{GroupId, Uid};
use serde::{Deserialize, Serialize};

/// A shared album group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Document id
    pub id: GroupId,
    /// Display name
    pub name: String,
    /// Shareable join link
    #[serde(default)]
    pub link: Option<String>,
    /// Member user ids
    #[serde(default)]
    pub members: Vec<Uid>,
}

impl GroupRecord {
    /// A group with no members.
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            link: None,
            members: Vec::new(),
        }
    }

    /// Builder-style member list.
    pub fn with_members(mut self, members: impl IntoIterator<Item = Uid>) -> Self {
        self.members = members.into_iter().collect();
        self
    }

    /// Whether `uid` is already listed as a member.
    pub fn has_member(&self, uid: &Uid) -> bool {
        self.members.iter().any(|m| m == uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_member() {
        let id = GroupId::parse("G1").unwrap();
        let group = GroupRecord::new(id, "Trip").with_members([Uid::new("a")]);
        assert!(group.has_member(&Uid::new("a")));
        assert!(!group.has_member(&Uid::new("b")));
    }

    #[test]
    fn test_missing_members_field_defaults_empty() {
        let group: GroupRecord = serde_json::from_str(r#"{"id":"G1","name":"Trip"}"#).unwrap();
        assert!(group.members.is_empty());
        assert!(group.link.is_none());
    }
}
