//! Metric use-case service.
//!
//! # Responsibility
//! - Provide metric create/get/update/delete/list entry points.
//! - Validate the metric type against the taxonomy at creation and the
//!   owning initiative reference on every mutation that touches it.
//!
//! # Invariants
//! - Check order: required fields, taxonomy membership, initiative
//!   existence, write.
//! - The stored type is free text after creation; updates do not re-check
//!   taxonomy membership.

use crate::model::initiative::InitiativeId;
use crate::model::metric::{Metric, MetricId, MetricPatch};
use crate::model::taxonomy::MetricType;
use crate::repo::metric_repo::MetricRepository;
use crate::service::{now_epoch_ms, require_field, ServiceError, ServiceResult};
use log::info;

/// Creation request for a metric.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMetric {
    pub initiative_id: InitiativeId,
    /// Raw type value, validated against the taxonomy at creation.
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    /// Registration date in epoch milliseconds; defaults to now.
    pub registered_at: Option<i64>,
}

/// Use-case service wrapper for metric operations.
pub struct MetricService<R: MetricRepository> {
    repo: R,
}

impl<R: MetricRepository> MetricService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a metric after field, taxonomy and reference validation.
    pub fn create_metric(&self, request: &NewMetric) -> ServiceResult<Metric> {
        require_field("metric", "type", &request.metric_type)?;
        require_field("metric", "unit", &request.unit)?;

        if MetricType::parse(&request.metric_type).is_none() {
            return Err(ServiceError::InvalidEnumValue {
                domain: "metric type",
                value: request.metric_type.clone(),
            });
        }

        if !self.repo.initiative_exists(request.initiative_id)? {
            return Err(ServiceError::NotFound {
                entity: "initiative",
                id: request.initiative_id,
            });
        }

        let registered_at = request.registered_at.unwrap_or_else(now_epoch_ms);
        let metric = Metric::new(
            request.initiative_id,
            request.metric_type.clone(),
            request.value,
            request.unit.clone(),
            registered_at,
        );

        self.repo.create_metric(&metric)?;
        info!(
            "event=metric_created module=service id={} initiative_id={}",
            metric.id, metric.initiative_id
        );
        Ok(metric)
    }

    /// Gets one metric by stable id.
    pub fn get_metric(&self, id: MetricId) -> ServiceResult<Option<Metric>> {
        Ok(self.repo.get_metric(id)?)
    }

    /// Applies a partial update and returns the merged record.
    ///
    /// The type field is not re-checked against the taxonomy here; only
    /// blank values are rejected.
    pub fn update_metric(&self, id: MetricId, patch: &MetricPatch) -> ServiceResult<Metric> {
        if let Some(metric_type) = &patch.metric_type {
            require_field("metric", "type", metric_type)?;
        }
        if let Some(unit) = &patch.unit {
            require_field("metric", "unit", unit)?;
        }

        let current = self.repo.get_metric(id)?.ok_or(ServiceError::NotFound {
            entity: "metric",
            id,
        })?;

        if let Some(initiative_id) = patch.initiative_id {
            if !self.repo.initiative_exists(initiative_id)? {
                return Err(ServiceError::NotFound {
                    entity: "initiative",
                    id: initiative_id,
                });
            }
        }

        let next = current.apply(patch);
        self.repo.update_metric(&next)?;
        info!("event=metric_updated module=service id={id}");
        Ok(next)
    }

    /// Deletes one metric by stable id.
    pub fn delete_metric(&self, id: MetricId) -> ServiceResult<()> {
        self.repo.delete_metric(id)?;
        info!("event=metric_deleted module=service id={id}");
        Ok(())
    }

    /// Lists all metrics.
    pub fn list_metrics(&self) -> ServiceResult<Vec<Metric>> {
        Ok(self.repo.list_metrics()?)
    }
}
