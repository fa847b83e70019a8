//! System-wide sustainability dashboard snapshot.
//!
//! # Responsibility
//! - Compute entity counts, per-taxonomy initiative breakdowns, summed
//!   impact values and the most-active-communities ranking.
//!
//! # Invariants
//! - Bucket maps always contain every taxonomy value, zero-count included.
//! - The ranking orders by initiative count descending, community id
//!   ascending; at most five entries.
//! - Sub-queries run without cross-query isolation: a racing mutation may be
//!   reflected in some figures and not others.

use crate::db::DbError;
use crate::model::community::CommunityId;
use crate::model::taxonomy::{InitiativeCategory, InitiativeStatus, MetricType};
use crate::repo::parse_id;
use crate::repo::RepoError;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MOST_ACTIVE_LIMIT: u32 = 5;

pub type ReportResult<T> = Result<T, ReportError>;

/// Report-layer error for DB interaction and result decoding.
#[derive(Debug)]
pub enum ReportError {
    Db(DbError),
    InvalidData(String),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid report row: {message}"),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for ReportError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ReportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<RepoError> for ReportError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Db(err) => Self::Db(err),
            other => Self::InvalidData(other.to_string()),
        }
    }
}

/// One entry of the most-active-communities ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityActivity {
    pub id: CommunityId,
    pub name: String,
    pub initiative_count: u64,
}

/// Summed impact values per measured dimension, zero when unmeasured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimatedImpact {
    #[serde(rename = "reducaoCO2")]
    pub co2_reduction: f64,
    #[serde(rename = "economiaAgua")]
    pub water_savings: f64,
    #[serde(rename = "residuosReciclados")]
    pub recycled_waste: f64,
}

/// Point-in-time system-wide statistics report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub total_communities: u64,
    pub total_residents: u64,
    pub total_initiatives: u64,
    pub initiatives_by_category: BTreeMap<String, u64>,
    pub initiatives_by_status: BTreeMap<String, u64>,
    pub estimated_impact: EstimatedImpact,
    pub most_active_communities: Vec<CommunityActivity>,
}

/// Computes the composite dashboard snapshot.
///
/// Read-only; issues several independent queries against the store.
pub fn dashboard_snapshot(conn: &Connection) -> ReportResult<DashboardSnapshot> {
    let total_communities = count_rows(conn, "communities")?;
    let total_residents = count_rows(conn, "residents")?;
    let total_initiatives = count_rows(conn, "initiatives")?;

    let initiatives_by_category = bucket_counts(
        conn,
        "category",
        InitiativeCategory::ALL
            .iter()
            .map(|category| category.as_db_value()),
    )?;
    let initiatives_by_status = bucket_counts(
        conn,
        "status",
        InitiativeStatus::ALL.iter().map(|status| status.as_db_value()),
    )?;

    let estimated_impact = EstimatedImpact {
        co2_reduction: sum_metric_values(conn, MetricType::Co2Reduction.as_db_value())?,
        water_savings: sum_metric_values(conn, MetricType::WaterSavings.as_db_value())?,
        recycled_waste: sum_metric_values(conn, MetricType::RecycledWaste.as_db_value())?,
    };

    let most_active_communities = most_active_communities(conn)?;

    Ok(DashboardSnapshot {
        total_communities,
        total_residents,
        total_initiatives,
        initiatives_by_category,
        initiatives_by_status,
        estimated_impact,
        most_active_communities,
    })
}

fn count_rows(conn: &Connection, table: &'static str) -> ReportResult<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    Ok(count.max(0) as u64)
}

/// Groups initiative rows by `column` and projects onto the full bucket set.
///
/// Stored values outside `buckets` are ignored: the taxonomy defines the
/// report shape.
fn bucket_counts(
    conn: &Connection,
    column: &'static str,
    buckets: impl Iterator<Item = &'static str>,
) -> ReportResult<BTreeMap<String, u64>> {
    let mut counts: BTreeMap<String, u64> = buckets.map(|bucket| (bucket.to_string(), 0)).collect();

    let mut stmt = conn.prepare(&format!(
        "SELECT {column}, COUNT(*) FROM initiatives GROUP BY {column};"
    ))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let bucket: String = row.get(0)?;
        let count: i64 = row.get(1)?;
        if let Some(slot) = counts.get_mut(&bucket) {
            *slot = count.max(0) as u64;
        }
    }

    Ok(counts)
}

fn sum_metric_values(conn: &Connection, metric_type: &'static str) -> ReportResult<f64> {
    let sum: f64 = conn.query_row(
        "SELECT COALESCE(SUM(value), 0) FROM metrics WHERE type = ?1;",
        [metric_type],
        |row| row.get(0),
    )?;
    Ok(sum)
}

fn most_active_communities(conn: &Connection) -> ReportResult<Vec<CommunityActivity>> {
    let mut stmt = conn.prepare(
        "SELECT
            communities.id AS id,
            communities.name AS name,
            COUNT(initiatives.id) AS initiative_count
         FROM communities
         LEFT JOIN initiatives ON initiatives.community_id = communities.id
         GROUP BY communities.id, communities.name
         ORDER BY initiative_count DESC, communities.id ASC
         LIMIT ?1;",
    )?;

    let mut rows = stmt.query([MOST_ACTIVE_LIMIT])?;
    let mut ranking = Vec::new();
    while let Some(row) = rows.next()? {
        let id_text: String = row.get("id")?;
        let count: i64 = row.get("initiative_count")?;
        ranking.push(CommunityActivity {
            id: parse_id(&id_text, "communities.id")?,
            name: row.get("name")?,
            initiative_count: count.max(0) as u64,
        });
    }

    Ok(ranking)
}
