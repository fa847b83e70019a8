//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce every cross-entity invariant before a mutation commits.
//!
//! # Invariants
//! - Checks run in a fixed precedence order: required fields, then taxonomy
//!   membership, then referenced-entity existence, then cross-entity
//!   relationships, then the single write. The first failure wins.
//! - Failures never partially apply: either every check passes and one write
//!   commits, or nothing is written.

use crate::model::community::CommunityId;
use crate::model::resident::ResidentId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod community_service;
pub mod initiative_service;
pub mod metric_service;
pub mod resident_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Closed failure taxonomy for all mutation and read services.
///
/// Variant order mirrors check precedence; message rendering for transports
/// happens at the boundary layer, these `Display` strings are diagnostics.
#[derive(Debug)]
pub enum ServiceError {
    /// A mandatory input was absent or blank.
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    /// An email input does not look like an address.
    InvalidEmail { email: String },
    /// A categorization value is outside its closed domain.
    InvalidEnumValue {
        domain: &'static str,
        value: String,
    },
    /// A mutation target or foreign reference points at no record.
    NotFound { entity: &'static str, id: Uuid },
    /// The responsible resident belongs to a different community than the
    /// initiative.
    ResponsibleOutsideCommunity {
        responsible_id: ResidentId,
        community_id: CommunityId,
    },
    /// The storage uniqueness constraint rejected the email.
    EmailTaken { email: String },
    /// Unexpected persistence failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Whether the caller can correct the request and retry.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Repo(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { entity, field } => {
                write!(f, "{entity} requires a non-empty `{field}`")
            }
            Self::InvalidEmail { email } => write!(f, "invalid email address: `{email}`"),
            Self::InvalidEnumValue { domain, value } => {
                write!(f, "invalid {domain} value: `{value}`")
            }
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ResponsibleOutsideCommunity {
                responsible_id,
                community_id,
            } => write!(
                f,
                "resident {responsible_id} does not belong to community {community_id}"
            ),
            Self::EmailTaken { email } => write!(f, "email already registered: `{email}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    /// Maps semantic repository errors onto the taxonomy.
    ///
    /// Unique violations are mapped by the owning service, where the
    /// conflicting value is known; here they stay a `Repo` fault.
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

/// Rejects absent/blank values for mandatory text fields.
pub(crate) fn require_field(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::MissingField { entity, field });
    }
    Ok(())
}

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{now_epoch_ms, require_field, ServiceError};
    use crate::repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn require_field_rejects_blank_values() {
        assert!(require_field("community", "name", "Vila Verde").is_ok());
        let err = require_field("community", "name", "   ").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::MissingField {
                entity: "community",
                field: "name"
            }
        ));
    }

    #[test]
    fn repo_not_found_keeps_entity_context() {
        let id = Uuid::new_v4();
        let err: ServiceError = RepoError::NotFound {
            entity: "initiative",
            id,
        }
        .into();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "initiative",
                ..
            }
        ));
    }

    #[test]
    fn only_repo_faults_are_server_errors() {
        let client = ServiceError::MissingField {
            entity: "metric",
            field: "unit",
        };
        assert!(client.is_client_error());

        let server = ServiceError::Repo(RepoError::InvalidData("corrupt row".to_string()));
        assert!(!server.is_client_error());
    }

    #[test]
    fn now_epoch_ms_is_past_2020() {
        assert!(now_epoch_ms() > 1_577_836_800_000);
    }
}
