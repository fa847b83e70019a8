//! Initiative domain model.
//!
//! # Responsibility
//! - Define the sustainability project record owned by a community and led
//!   by one of its residents.
//! - Provide the optional-field patch and its pure merge.
//!
//! # Invariants
//! - The responsible resident's community must equal `community_id`; the
//!   service layer rejects any mutation that would break this.
//! - `category` and `status` hold closed taxonomy values.

use crate::model::community::CommunityId;
use crate::model::resident::ResidentId;
use crate::model::taxonomy::{InitiativeCategory, InitiativeStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an initiative.
pub type InitiativeId = Uuid;

/// A sustainability project run by a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    pub id: InitiativeId,
    pub title: String,
    pub description: Option<String>,
    pub category: InitiativeCategory,
    pub status: InitiativeStatus,
    /// Start date in epoch milliseconds.
    pub start_date: i64,
    /// Optional end date in epoch milliseconds.
    pub end_date: Option<i64>,
    pub community_id: CommunityId,
    /// Resident responsible for the initiative.
    pub responsible_id: ResidentId,
}

impl Initiative {
    /// Creates an initiative with a generated stable id.
    ///
    /// Status starts at the registry default (`planejada`); optional fields
    /// start empty.
    pub fn new(
        title: impl Into<String>,
        category: InitiativeCategory,
        start_date: i64,
        community_id: CommunityId,
        responsible_id: ResidentId,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4(),
            title,
            category,
            start_date,
            community_id,
            responsible_id,
        )
    }

    /// Creates an initiative with a caller-provided stable id.
    pub fn with_id(
        id: InitiativeId,
        title: impl Into<String>,
        category: InitiativeCategory,
        start_date: i64,
        community_id: CommunityId,
        responsible_id: ResidentId,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            category,
            status: InitiativeStatus::default(),
            start_date,
            end_date: None,
            community_id,
            responsible_id,
        }
    }

    /// Returns the record with patch fields applied over current values.
    pub fn apply(&self, patch: &InitiativePatch) -> Initiative {
        Initiative {
            id: self.id,
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            description: patch
                .description
                .clone()
                .or_else(|| self.description.clone()),
            category: patch.category.unwrap_or(self.category),
            status: patch.status.unwrap_or(self.status),
            start_date: patch.start_date.unwrap_or(self.start_date),
            end_date: patch.end_date.or(self.end_date),
            community_id: patch.community_id.unwrap_or(self.community_id),
            responsible_id: patch.responsible_id.unwrap_or(self.responsible_id),
        }
    }
}

/// Partial-update request for an initiative, with taxonomy fields already
/// resolved by the service layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<InitiativeCategory>,
    pub status: Option<InitiativeStatus>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub community_id: Option<CommunityId>,
    pub responsible_id: Option<ResidentId>,
}

#[cfg(test)]
mod tests {
    use super::{Initiative, InitiativePatch};
    use crate::model::taxonomy::{InitiativeCategory, InitiativeStatus};
    use uuid::Uuid;

    fn sample() -> Initiative {
        Initiative::new(
            "Coleta seletiva",
            InitiativeCategory::Recycling,
            1_700_000_000_000,
            Uuid::new_v4(),
            Uuid::new_v4(),
        )
    }

    #[test]
    fn new_initiative_starts_planned() {
        assert_eq!(sample().status, InitiativeStatus::Planned);
    }

    #[test]
    fn empty_patch_is_identity() {
        let initiative = sample();
        let merged = initiative.apply(&InitiativePatch::default());
        assert_eq!(merged, initiative);
    }

    #[test]
    fn patch_replaces_references_independently() {
        let initiative = sample();
        let new_responsible = Uuid::new_v4();
        let patch = InitiativePatch {
            status: Some(InitiativeStatus::InProgress),
            responsible_id: Some(new_responsible),
            ..InitiativePatch::default()
        };

        let merged = initiative.apply(&patch);
        assert_eq!(merged.responsible_id, new_responsible);
        assert_eq!(merged.community_id, initiative.community_id);
        assert_eq!(merged.status, InitiativeStatus::InProgress);
        assert_eq!(merged.category, initiative.category);
    }
}
