//! Metric repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `metrics` storage.
//! - Answer the initiative-existence probe the service layer validates with.
//!
//! # Invariants
//! - `type` is stored as free text; taxonomy membership is a creation-time
//!   concern of the service layer.

use crate::model::initiative::InitiativeId;
use crate::model::metric::{Metric, MetricId};
use crate::repo::{ensure_connection_ready, parse_id, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const METRIC_SELECT_SQL: &str = "SELECT
    id,
    initiative_id,
    type,
    value,
    unit,
    registered_at
FROM metrics";

/// Repository interface for metric CRUD operations.
pub trait MetricRepository {
    fn create_metric(&self, metric: &Metric) -> RepoResult<MetricId>;
    fn update_metric(&self, metric: &Metric) -> RepoResult<()>;
    fn get_metric(&self, id: MetricId) -> RepoResult<Option<Metric>>;
    fn list_metrics(&self) -> RepoResult<Vec<Metric>>;
    fn delete_metric(&self, id: MetricId) -> RepoResult<()>;
    /// Existence probe for the owning initiative reference.
    fn initiative_exists(&self, id: InitiativeId) -> RepoResult<bool>;
}

/// SQLite-backed metric repository.
pub struct SqliteMetricRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMetricRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MetricRepository for SqliteMetricRepository<'_> {
    fn create_metric(&self, metric: &Metric) -> RepoResult<MetricId> {
        self.conn.execute(
            "INSERT INTO metrics (
                id,
                initiative_id,
                type,
                value,
                unit,
                registered_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                metric.id.to_string(),
                metric.initiative_id.to_string(),
                metric.metric_type.as_str(),
                metric.value,
                metric.unit.as_str(),
                metric.registered_at,
            ],
        )?;

        Ok(metric.id)
    }

    fn update_metric(&self, metric: &Metric) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE metrics
             SET
                initiative_id = ?1,
                type = ?2,
                value = ?3,
                unit = ?4,
                registered_at = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?6;",
            params![
                metric.initiative_id.to_string(),
                metric.metric_type.as_str(),
                metric.value,
                metric.unit.as_str(),
                metric.registered_at,
                metric.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "metric",
                id: metric.id,
            });
        }

        Ok(())
    }

    fn get_metric(&self, id: MetricId) -> RepoResult<Option<Metric>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{METRIC_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_metric_row(row)?));
        }

        Ok(None)
    }

    fn list_metrics(&self) -> RepoResult<Vec<Metric>> {
        let mut stmt = self.conn.prepare(&format!(
            "{METRIC_SELECT_SQL} ORDER BY updated_at DESC, id ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut metrics = Vec::new();
        while let Some(row) = rows.next()? {
            metrics.push(parse_metric_row(row)?);
        }

        Ok(metrics)
    }

    fn delete_metric(&self, id: MetricId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM metrics WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "metric",
                id,
            });
        }

        Ok(())
    }

    fn initiative_exists(&self, id: InitiativeId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM initiatives WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_metric_row(row: &Row<'_>) -> RepoResult<Metric> {
    let id_text: String = row.get("id")?;
    let initiative_text: String = row.get("initiative_id")?;

    Ok(Metric {
        id: parse_id(&id_text, "metrics.id")?,
        initiative_id: parse_id(&initiative_text, "metrics.initiative_id")?,
        metric_type: row.get("type")?,
        value: row.get("value")?,
        unit: row.get("unit")?,
        registered_at: row.get("registered_at")?,
    })
}
