//! Community use-case service.
//!
//! # Responsibility
//! - Provide community create/get/update/delete/list entry points.
//! - Validate required fields before any write.
//!
//! # Invariants
//! - Communities carry no cross-entity invariants of their own; deletion is
//!   permissive even while residents or initiatives still reference the
//!   community (accepted orphan behavior, see DESIGN.md).

use crate::model::community::{Community, CommunityId, CommunityPatch};
use crate::repo::community_repo::CommunityRepository;
use crate::service::{require_field, ServiceError, ServiceResult};
use log::info;

/// Creation request for a community.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCommunity {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub founded_at: Option<i64>,
    pub sustainability_goal: Option<String>,
}

/// Use-case service wrapper for community operations.
pub struct CommunityService<R: CommunityRepository> {
    repo: R,
}

impl<R: CommunityRepository> CommunityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a community after required-field validation.
    pub fn create_community(&self, request: &NewCommunity) -> ServiceResult<Community> {
        require_field("community", "name", &request.name)?;
        require_field("community", "location", &request.location)?;

        let mut community = Community::new(request.name.clone(), request.location.clone());
        community.description = request.description.clone();
        community.founded_at = request.founded_at;
        community.sustainability_goal = request.sustainability_goal.clone();

        self.repo.create_community(&community)?;
        info!(
            "event=community_created module=service id={}",
            community.id
        );
        Ok(community)
    }

    /// Gets one community by stable id.
    pub fn get_community(&self, id: CommunityId) -> ServiceResult<Option<Community>> {
        Ok(self.repo.get_community(id)?)
    }

    /// Applies a partial update and returns the merged record.
    pub fn update_community(
        &self,
        id: CommunityId,
        patch: &CommunityPatch,
    ) -> ServiceResult<Community> {
        if let Some(name) = &patch.name {
            require_field("community", "name", name)?;
        }
        if let Some(location) = &patch.location {
            require_field("community", "location", location)?;
        }

        let current = self
            .repo
            .get_community(id)?
            .ok_or(ServiceError::NotFound {
                entity: "community",
                id,
            })?;

        let next = current.apply(patch);
        self.repo.update_community(&next)?;
        info!("event=community_updated module=service id={id}");
        Ok(next)
    }

    /// Deletes one community by stable id.
    pub fn delete_community(&self, id: CommunityId) -> ServiceResult<()> {
        self.repo.delete_community(id)?;
        info!("event=community_deleted module=service id={id}");
        Ok(())
    }

    /// Lists all communities.
    pub fn list_communities(&self) -> ServiceResult<Vec<Community>> {
        Ok(self.repo.list_communities()?)
    }
}
