//! Metric domain model.
//!
//! # Responsibility
//! - Define the quantified impact measurement owned by one initiative.
//! - Provide the optional-field patch and its pure merge.
//!
//! # Invariants
//! - `metric_type` is validated against the taxonomy at creation only and
//!   stored as free text afterwards.
//! - `registered_at` is always set; creation defaults it to wall-clock now.

use crate::model::initiative::InitiativeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a metric.
pub type MetricId = Uuid;

/// A quantified measurement of an initiative's impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub id: MetricId,
    pub initiative_id: InitiativeId,
    /// Taxonomy value at creation time; free text afterwards.
    #[serde(rename = "type")]
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    /// Registration date in epoch milliseconds.
    pub registered_at: i64,
}

impl Metric {
    /// Creates a metric with a generated stable id.
    pub fn new(
        initiative_id: InitiativeId,
        metric_type: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        registered_at: i64,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4(),
            initiative_id,
            metric_type,
            value,
            unit,
            registered_at,
        )
    }

    /// Creates a metric with a caller-provided stable id.
    pub fn with_id(
        id: MetricId,
        initiative_id: InitiativeId,
        metric_type: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        registered_at: i64,
    ) -> Self {
        Self {
            id,
            initiative_id,
            metric_type: metric_type.into(),
            value,
            unit: unit.into(),
            registered_at,
        }
    }

    /// Returns the record with patch fields applied over current values.
    pub fn apply(&self, patch: &MetricPatch) -> Metric {
        Metric {
            id: self.id,
            initiative_id: patch.initiative_id.unwrap_or(self.initiative_id),
            metric_type: patch
                .metric_type
                .clone()
                .unwrap_or_else(|| self.metric_type.clone()),
            value: patch.value.unwrap_or(self.value),
            unit: patch.unit.clone().unwrap_or_else(|| self.unit.clone()),
            registered_at: patch.registered_at.unwrap_or(self.registered_at),
        }
    }
}

/// Partial-update request for a metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPatch {
    pub initiative_id: Option<InitiativeId>,
    #[serde(rename = "type")]
    pub metric_type: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub registered_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::{Metric, MetricPatch};
    use uuid::Uuid;

    #[test]
    fn empty_patch_is_identity() {
        let metric = Metric::new(Uuid::new_v4(), "reducaoCO2", 12.5, "kg", 1_700_000_000_000);
        let merged = metric.apply(&MetricPatch::default());
        assert_eq!(merged, metric);
    }

    #[test]
    fn patch_replaces_value_and_keeps_ownership() {
        let metric = Metric::new(Uuid::new_v4(), "economiaAgua", 300.0, "L", 1_700_000_000_000);
        let patch = MetricPatch {
            value: Some(450.0),
            unit: Some("litros".to_string()),
            ..MetricPatch::default()
        };

        let merged = metric.apply(&patch);
        assert_eq!(merged.value, 450.0);
        assert_eq!(merged.unit, "litros");
        assert_eq!(merged.initiative_id, metric.initiative_id);
        assert_eq!(merged.metric_type, "economiaAgua");
    }
}
