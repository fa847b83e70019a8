//! Community domain model.
//!
//! # Responsibility
//! - Define the root record of the ownership graph.
//! - Provide the optional-field patch and its pure merge.
//!
//! # Invariants
//! - `id` is stable and never reused for another community.
//! - `name` and `location` are never blank in a persisted record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a community.
pub type CommunityId = Uuid;

/// A residential group pursuing sustainability goals.
///
/// Root of the relationship graph; residents and initiatives reference it by
/// id. Timestamps are Unix epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: CommunityId,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    /// Founding date in epoch milliseconds.
    pub founded_at: Option<i64>,
    /// Free-text sustainability goal.
    pub sustainability_goal: Option<String>,
}

impl Community {
    /// Creates a community with a generated stable id and empty optionals.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, location)
    }

    /// Creates a community with a caller-provided stable id.
    pub fn with_id(
        id: CommunityId,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location: location.into(),
            description: None,
            founded_at: None,
            sustainability_goal: None,
        }
    }

    /// Returns the record with patch fields applied over current values.
    ///
    /// `None` patch fields keep the stored value; `Some` replaces it. The
    /// merge never touches `id`.
    pub fn apply(&self, patch: &CommunityPatch) -> Community {
        Community {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            location: patch
                .location
                .clone()
                .unwrap_or_else(|| self.location.clone()),
            description: patch
                .description
                .clone()
                .or_else(|| self.description.clone()),
            founded_at: patch.founded_at.or(self.founded_at),
            sustainability_goal: patch
                .sustainability_goal
                .clone()
                .or_else(|| self.sustainability_goal.clone()),
        }
    }
}

/// Partial-update request for a community.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub founded_at: Option<i64>,
    pub sustainability_goal: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Community, CommunityPatch};

    #[test]
    fn empty_patch_is_identity() {
        let mut community = Community::new("Vila Verde", "Curitiba, PR");
        community.description = Some("pilot group".to_string());
        community.founded_at = Some(1_672_531_200_000);

        let merged = community.apply(&CommunityPatch::default());
        assert_eq!(merged, community);
    }

    #[test]
    fn patch_replaces_only_supplied_fields() {
        let community = Community::new("Vila Verde", "Curitiba, PR");
        let patch = CommunityPatch {
            location: Some("Londrina, PR".to_string()),
            sustainability_goal: Some("zero aterro".to_string()),
            ..CommunityPatch::default()
        };

        let merged = community.apply(&patch);
        assert_eq!(merged.id, community.id);
        assert_eq!(merged.name, "Vila Verde");
        assert_eq!(merged.location, "Londrina, PR");
        assert_eq!(merged.sustainability_goal.as_deref(), Some("zero aterro"));
        assert_eq!(merged.description, None);
    }
}
