//! Initiative use-case service.
//!
//! # Responsibility
//! - Provide initiative create/get/update/delete/list entry points.
//! - Enforce the responsible-party containment invariant on every mutation
//!   that touches either reference.
//!
//! # Invariants
//! - Check order: required fields, taxonomy membership, community existence,
//!   resident existence, containment, write.
//! - On update, the *effective* (community, responsible) pair is validated
//!   whenever either reference is present in the patch; an untouched pair is
//!   assumed still consistent.

use crate::model::community::CommunityId;
use crate::model::initiative::{Initiative, InitiativeId, InitiativePatch};
use crate::model::resident::ResidentId;
use crate::model::taxonomy::{InitiativeCategory, InitiativeStatus};
use crate::repo::initiative_repo::InitiativeRepository;
use crate::service::{require_field, ServiceError, ServiceResult};
use log::info;

/// Creation request for an initiative, with taxonomy fields still raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInitiative {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    /// Raw status value; defaults to `planejada` when absent.
    pub status: Option<String>,
    pub start_date: i64,
    pub end_date: Option<i64>,
    pub community_id: CommunityId,
    pub responsible_id: ResidentId,
}

/// Partial-update request for an initiative, with taxonomy fields still raw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitiativeUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub community_id: Option<CommunityId>,
    pub responsible_id: Option<ResidentId>,
}

/// Use-case service wrapper for initiative operations.
pub struct InitiativeService<R: InitiativeRepository> {
    repo: R,
}

impl<R: InitiativeRepository> InitiativeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an initiative after field, taxonomy and reference validation.
    pub fn create_initiative(&self, request: &NewInitiative) -> ServiceResult<Initiative> {
        require_field("initiative", "title", &request.title)?;
        require_field("initiative", "category", &request.category)?;

        let category = parse_category(&request.category)?;
        let status = match request.status.as_deref() {
            Some(value) => parse_status(value)?,
            None => InitiativeStatus::default(),
        };

        self.check_containment(request.community_id, request.responsible_id, true)?;

        let mut initiative = Initiative::new(
            request.title.clone(),
            category,
            request.start_date,
            request.community_id,
            request.responsible_id,
        );
        initiative.description = request.description.clone();
        initiative.status = status;
        initiative.end_date = request.end_date;

        self.repo.create_initiative(&initiative)?;
        info!(
            "event=initiative_created module=service id={} community_id={}",
            initiative.id, initiative.community_id
        );
        Ok(initiative)
    }

    /// Gets one initiative by stable id.
    pub fn get_initiative(&self, id: InitiativeId) -> ServiceResult<Option<Initiative>> {
        Ok(self.repo.get_initiative(id)?)
    }

    /// Applies a partial update and returns the merged record.
    ///
    /// Only fields present in the request are checked. When neither reference
    /// changes, the stored pair is not re-validated.
    pub fn update_initiative(
        &self,
        id: InitiativeId,
        update: &InitiativeUpdate,
    ) -> ServiceResult<Initiative> {
        if let Some(title) = &update.title {
            require_field("initiative", "title", title)?;
        }
        if let Some(category) = &update.category {
            require_field("initiative", "category", category)?;
        }

        let category = update
            .category
            .as_deref()
            .map(parse_category)
            .transpose()?;
        let status = update.status.as_deref().map(parse_status).transpose()?;

        let current = self
            .repo
            .get_initiative(id)?
            .ok_or(ServiceError::NotFound {
                entity: "initiative",
                id,
            })?;

        if update.community_id.is_some() || update.responsible_id.is_some() {
            let effective_community = update.community_id.unwrap_or(current.community_id);
            let effective_responsible = update.responsible_id.unwrap_or(current.responsible_id);
            self.check_containment(
                effective_community,
                effective_responsible,
                update.community_id.is_some(),
            )?;
        }

        let patch = InitiativePatch {
            title: update.title.clone(),
            description: update.description.clone(),
            category,
            status,
            start_date: update.start_date,
            end_date: update.end_date,
            community_id: update.community_id,
            responsible_id: update.responsible_id,
        };

        let next = current.apply(&patch);
        self.repo.update_initiative(&next)?;
        info!("event=initiative_updated module=service id={id}");
        Ok(next)
    }

    /// Deletes one initiative by stable id.
    ///
    /// Permissive: metrics referencing this initiative are left untouched
    /// (accepted orphan behavior, see DESIGN.md).
    pub fn delete_initiative(&self, id: InitiativeId) -> ServiceResult<()> {
        self.repo.delete_initiative(id)?;
        info!("event=initiative_deleted module=service id={id}");
        Ok(())
    }

    /// Lists all initiatives.
    pub fn list_initiatives(&self) -> ServiceResult<Vec<Initiative>> {
        Ok(self.repo.list_initiatives()?)
    }

    /// Validates existence of the referenced pair and the containment rule.
    ///
    /// `check_community` skips the community existence probe when the
    /// community reference is unchanged (it was validated when stored).
    fn check_containment(
        &self,
        community_id: CommunityId,
        responsible_id: ResidentId,
        check_community: bool,
    ) -> ServiceResult<()> {
        if check_community && !self.repo.community_exists(community_id)? {
            return Err(ServiceError::NotFound {
                entity: "community",
                id: community_id,
            });
        }

        let responsible_community = self
            .repo
            .resident_community(responsible_id)?
            .ok_or(ServiceError::NotFound {
                entity: "resident",
                id: responsible_id,
            })?;

        if responsible_community != community_id {
            return Err(ServiceError::ResponsibleOutsideCommunity {
                responsible_id,
                community_id,
            });
        }

        Ok(())
    }
}

fn parse_category(value: &str) -> ServiceResult<InitiativeCategory> {
    InitiativeCategory::parse(value).ok_or_else(|| ServiceError::InvalidEnumValue {
        domain: "category",
        value: value.to_string(),
    })
}

fn parse_status(value: &str) -> ServiceResult<InitiativeStatus> {
    InitiativeStatus::parse(value).ok_or_else(|| ServiceError::InvalidEnumValue {
        domain: "status",
        value: value.to_string(),
    })
}
