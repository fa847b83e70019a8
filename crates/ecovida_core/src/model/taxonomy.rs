//! Closed enumeration domains for categorization fields.
//!
//! # Responsibility
//! - Define the fixed sets of valid initiative categories, initiative
//!   statuses and metric types, in declaration order.
//! - Provide membership tests (fallible parse) and full enumeration for
//!   validation and for all-buckets-present reporting.
//!
//! # Invariants
//! - Stored values keep the deployed wire vocabulary; adding a value is a
//!   code change, never a runtime operation.
//! - `ALL` order is stable and drives reporting bucket order.

use serde::{Deserialize, Serialize};

/// Thematic category of an initiative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitiativeCategory {
    #[serde(rename = "reciclagem")]
    Recycling,
    #[serde(rename = "energiaRenovavel")]
    RenewableEnergy,
    #[serde(rename = "conservacaoAgua")]
    WaterConservation,
    #[serde(rename = "educacaoAmbiental")]
    EnvironmentalEducation,
    #[serde(rename = "hortaComunitaria")]
    CommunityGarden,
}

impl InitiativeCategory {
    pub const ALL: [Self; 5] = [
        Self::Recycling,
        Self::RenewableEnergy,
        Self::WaterConservation,
        Self::EnvironmentalEducation,
        Self::CommunityGarden,
    ];

    /// Stored representation of this category.
    pub fn as_db_value(self) -> &'static str {
        match self {
            Self::Recycling => "reciclagem",
            Self::RenewableEnergy => "energiaRenovavel",
            Self::WaterConservation => "conservacaoAgua",
            Self::EnvironmentalEducation => "educacaoAmbiental",
            Self::CommunityGarden => "hortaComunitaria",
        }
    }

    /// Membership test for the category domain.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_db_value() == value)
    }
}

/// Lifecycle state of an initiative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitiativeStatus {
    #[serde(rename = "planejada")]
    Planned,
    #[serde(rename = "emAndamento")]
    InProgress,
    #[serde(rename = "concluida")]
    Completed,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl InitiativeStatus {
    pub const ALL: [Self; 4] = [
        Self::Planned,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Stored representation of this status.
    pub fn as_db_value(self) -> &'static str {
        match self {
            Self::Planned => "planejada",
            Self::InProgress => "emAndamento",
            Self::Completed => "concluida",
            Self::Cancelled => "cancelada",
        }
    }

    /// Membership test for the status domain.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_db_value() == value)
    }
}

impl Default for InitiativeStatus {
    /// Unspecified statuses fall back to `planejada`.
    fn default() -> Self {
        Self::Planned
    }
}

/// Kind of measured impact a metric records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricType {
    #[serde(rename = "reducaoCO2")]
    Co2Reduction,
    #[serde(rename = "economiaAgua")]
    WaterSavings,
    #[serde(rename = "residuosReciclados")]
    RecycledWaste,
}

impl MetricType {
    pub const ALL: [Self; 3] = [Self::Co2Reduction, Self::WaterSavings, Self::RecycledWaste];

    /// Stored representation of this metric type.
    pub fn as_db_value(self) -> &'static str {
        match self {
            Self::Co2Reduction => "reducaoCO2",
            Self::WaterSavings => "economiaAgua",
            Self::RecycledWaste => "residuosReciclados",
        }
    }

    /// Membership test for the metric type domain.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|metric_type| metric_type.as_db_value() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::{InitiativeCategory, InitiativeStatus, MetricType};

    #[test]
    fn category_values_roundtrip_through_parse() {
        for category in InitiativeCategory::ALL {
            assert_eq!(
                InitiativeCategory::parse(category.as_db_value()),
                Some(category)
            );
        }
    }

    #[test]
    fn status_values_roundtrip_through_parse() {
        for status in InitiativeStatus::ALL {
            assert_eq!(InitiativeStatus::parse(status.as_db_value()), Some(status));
        }
    }

    #[test]
    fn metric_type_values_roundtrip_through_parse() {
        for metric_type in MetricType::ALL {
            assert_eq!(MetricType::parse(metric_type.as_db_value()), Some(metric_type));
        }
    }

    #[test]
    fn unknown_values_are_rejected_in_every_domain() {
        assert_eq!(InitiativeCategory::parse("compostagem"), None);
        assert_eq!(InitiativeStatus::parse("arquivada"), None);
        assert_eq!(MetricType::parse("reducaoCo2"), None);
        assert_eq!(InitiativeCategory::parse(""), None);
    }

    #[test]
    fn default_status_is_planned() {
        assert_eq!(InitiativeStatus::default(), InitiativeStatus::Planned);
        assert_eq!(InitiativeStatus::default().as_db_value(), "planejada");
    }
}
