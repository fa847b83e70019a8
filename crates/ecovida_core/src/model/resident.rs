//! Resident domain model.
//!
//! # Responsibility
//! - Define the person record owned by exactly one community.
//! - Provide the optional-field patch and its pure merge.
//!
//! # Invariants
//! - `email` is unique across all residents (storage-level constraint).
//! - `community_id` always references the owning community.

use crate::model::community::CommunityId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a resident.
pub type ResidentId = Uuid;

/// A person belonging to exactly one community.
///
/// A resident may be the responsible party for initiatives, but only within
/// their own community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: ResidentId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Birth date in epoch milliseconds.
    pub birth_date: Option<i64>,
    pub community_id: CommunityId,
}

impl Resident {
    /// Creates a resident with a generated stable id and empty optionals.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        community_id: CommunityId,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), name, email, community_id)
    }

    /// Creates a resident with a caller-provided stable id.
    pub fn with_id(
        id: ResidentId,
        name: impl Into<String>,
        email: impl Into<String>,
        community_id: CommunityId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: None,
            birth_date: None,
            community_id,
        }
    }

    /// Returns the record with patch fields applied over current values.
    pub fn apply(&self, patch: &ResidentPatch) -> Resident {
        Resident {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            email: patch.email.clone().unwrap_or_else(|| self.email.clone()),
            phone: patch.phone.clone().or_else(|| self.phone.clone()),
            birth_date: patch.birth_date.or(self.birth_date),
            community_id: patch.community_id.unwrap_or(self.community_id),
        }
    }
}

/// Partial-update request for a resident.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<i64>,
    pub community_id: Option<CommunityId>,
}

#[cfg(test)]
mod tests {
    use super::{Resident, ResidentPatch};
    use uuid::Uuid;

    #[test]
    fn empty_patch_is_identity() {
        let mut resident = Resident::new("Ana Souza", "ana@exemplo.com", Uuid::new_v4());
        resident.phone = Some("+55 11 99999-0000".to_string());

        let merged = resident.apply(&ResidentPatch::default());
        assert_eq!(merged, resident);
    }

    #[test]
    fn patch_can_move_resident_to_another_community() {
        let resident = Resident::new("Ana Souza", "ana@exemplo.com", Uuid::new_v4());
        let target = Uuid::new_v4();
        let patch = ResidentPatch {
            community_id: Some(target),
            ..ResidentPatch::default()
        };

        let merged = resident.apply(&patch);
        assert_eq!(merged.community_id, target);
        assert_eq!(merged.email, resident.email);
    }
}
