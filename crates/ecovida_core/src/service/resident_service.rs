//! Resident use-case service.
//!
//! # Responsibility
//! - Provide resident create/get/update/delete/list entry points.
//! - Validate required fields, email shape and the owning community
//!   reference before any write.
//!
//! # Invariants
//! - Check order: required fields, email shape, community existence, write.
//! - Email uniqueness stays a storage constraint; the service only converts
//!   the violation into its taxonomy kind.

use crate::model::community::CommunityId;
use crate::model::resident::{Resident, ResidentId, ResidentPatch};
use crate::repo::resident_repo::ResidentRepository;
use crate::repo::RepoError;
use crate::service::{require_field, ServiceError, ServiceResult};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Creation request for a resident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResident {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<i64>,
    pub community_id: CommunityId,
}

/// Use-case service wrapper for resident operations.
pub struct ResidentService<R: ResidentRepository> {
    repo: R,
}

impl<R: ResidentRepository> ResidentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a resident after field and reference validation.
    pub fn create_resident(&self, request: &NewResident) -> ServiceResult<Resident> {
        require_field("resident", "name", &request.name)?;
        require_field("resident", "email", &request.email)?;
        validate_email(&request.email)?;

        if !self.repo.community_exists(request.community_id)? {
            return Err(ServiceError::NotFound {
                entity: "community",
                id: request.community_id,
            });
        }

        let mut resident = Resident::new(
            request.name.clone(),
            request.email.clone(),
            request.community_id,
        );
        resident.phone = request.phone.clone();
        resident.birth_date = request.birth_date;

        self.repo
            .create_resident(&resident)
            .map_err(|err| map_email_conflict(err, &resident.email))?;
        info!("event=resident_created module=service id={}", resident.id);
        Ok(resident)
    }

    /// Gets one resident by stable id.
    pub fn get_resident(&self, id: ResidentId) -> ServiceResult<Option<Resident>> {
        Ok(self.repo.get_resident(id)?)
    }

    /// Applies a partial update and returns the merged record.
    pub fn update_resident(
        &self,
        id: ResidentId,
        patch: &ResidentPatch,
    ) -> ServiceResult<Resident> {
        if let Some(name) = &patch.name {
            require_field("resident", "name", name)?;
        }
        if let Some(email) = &patch.email {
            require_field("resident", "email", email)?;
            validate_email(email)?;
        }

        let current = self.repo.get_resident(id)?.ok_or(ServiceError::NotFound {
            entity: "resident",
            id,
        })?;

        if let Some(community_id) = patch.community_id {
            if !self.repo.community_exists(community_id)? {
                return Err(ServiceError::NotFound {
                    entity: "community",
                    id: community_id,
                });
            }
        }

        let next = current.apply(patch);
        self.repo
            .update_resident(&next)
            .map_err(|err| map_email_conflict(err, &next.email))?;
        info!("event=resident_updated module=service id={id}");
        Ok(next)
    }

    /// Deletes one resident by stable id.
    ///
    /// Permissive: initiatives naming this resident as responsible are left
    /// untouched (accepted orphan behavior, see DESIGN.md).
    pub fn delete_resident(&self, id: ResidentId) -> ServiceResult<()> {
        self.repo.delete_resident(id)?;
        info!("event=resident_deleted module=service id={id}");
        Ok(())
    }

    /// Lists all residents.
    pub fn list_residents(&self) -> ServiceResult<Vec<Resident>> {
        Ok(self.repo.list_residents()?)
    }
}

fn validate_email(email: &str) -> ServiceResult<()> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(ServiceError::InvalidEmail {
            email: email.to_string(),
        });
    }
    Ok(())
}

fn map_email_conflict(err: RepoError, email: &str) -> ServiceError {
    match err {
        RepoError::UniqueViolation { field: "email", .. } => ServiceError::EmailTaken {
            email: email.to_string(),
        },
        other => other.into(),
    }
}
