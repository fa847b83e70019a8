//! Initiative repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `initiatives` storage.
//! - Answer the reference probes (community existence, resident ownership)
//!   the service layer validates the containment invariant with.
//!
//! # Invariants
//! - Stored category/status values always decode to taxonomy members; rows
//!   that do not are surfaced as invalid persisted state.

use crate::model::community::CommunityId;
use crate::model::initiative::{Initiative, InitiativeId};
use crate::model::resident::ResidentId;
use crate::model::taxonomy::{InitiativeCategory, InitiativeStatus};
use crate::repo::{ensure_connection_ready, parse_id, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const INITIATIVE_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    category,
    status,
    start_date,
    end_date,
    community_id,
    responsible_id
FROM initiatives";

/// Repository interface for initiative CRUD operations.
pub trait InitiativeRepository {
    fn create_initiative(&self, initiative: &Initiative) -> RepoResult<InitiativeId>;
    fn update_initiative(&self, initiative: &Initiative) -> RepoResult<()>;
    fn get_initiative(&self, id: InitiativeId) -> RepoResult<Option<Initiative>>;
    fn list_initiatives(&self) -> RepoResult<Vec<Initiative>>;
    fn delete_initiative(&self, id: InitiativeId) -> RepoResult<()>;
    /// Existence probe for the owning community reference.
    fn community_exists(&self, id: CommunityId) -> RepoResult<bool>;
    /// Returns the community a resident belongs to, `None` when the resident
    /// does not exist.
    fn resident_community(&self, id: ResidentId) -> RepoResult<Option<CommunityId>>;
}

/// SQLite-backed initiative repository.
pub struct SqliteInitiativeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInitiativeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl InitiativeRepository for SqliteInitiativeRepository<'_> {
    fn create_initiative(&self, initiative: &Initiative) -> RepoResult<InitiativeId> {
        self.conn.execute(
            "INSERT INTO initiatives (
                id,
                title,
                description,
                category,
                status,
                start_date,
                end_date,
                community_id,
                responsible_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                initiative.id.to_string(),
                initiative.title.as_str(),
                initiative.description.as_deref(),
                initiative.category.as_db_value(),
                initiative.status.as_db_value(),
                initiative.start_date,
                initiative.end_date,
                initiative.community_id.to_string(),
                initiative.responsible_id.to_string(),
            ],
        )?;

        Ok(initiative.id)
    }

    fn update_initiative(&self, initiative: &Initiative) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE initiatives
             SET
                title = ?1,
                description = ?2,
                category = ?3,
                status = ?4,
                start_date = ?5,
                end_date = ?6,
                community_id = ?7,
                responsible_id = ?8,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?9;",
            params![
                initiative.title.as_str(),
                initiative.description.as_deref(),
                initiative.category.as_db_value(),
                initiative.status.as_db_value(),
                initiative.start_date,
                initiative.end_date,
                initiative.community_id.to_string(),
                initiative.responsible_id.to_string(),
                initiative.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "initiative",
                id: initiative.id,
            });
        }

        Ok(())
    }

    fn get_initiative(&self, id: InitiativeId) -> RepoResult<Option<Initiative>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{INITIATIVE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_initiative_row(row)?));
        }

        Ok(None)
    }

    fn list_initiatives(&self) -> RepoResult<Vec<Initiative>> {
        let mut stmt = self.conn.prepare(&format!(
            "{INITIATIVE_SELECT_SQL} ORDER BY updated_at DESC, id ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut initiatives = Vec::new();
        while let Some(row) = rows.next()? {
            initiatives.push(parse_initiative_row(row)?);
        }

        Ok(initiatives)
    }

    fn delete_initiative(&self, id: InitiativeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM initiatives WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "initiative",
                id,
            });
        }

        Ok(())
    }

    fn community_exists(&self, id: CommunityId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM communities WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn resident_community(&self, id: ResidentId) -> RepoResult<Option<CommunityId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT community_id FROM residents WHERE id = ?1;")?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let community_text: String = row.get(0)?;
            return Ok(Some(parse_id(&community_text, "residents.community_id")?));
        }

        Ok(None)
    }
}

fn parse_initiative_row(row: &Row<'_>) -> RepoResult<Initiative> {
    let id_text: String = row.get("id")?;
    let community_text: String = row.get("community_id")?;
    let responsible_text: String = row.get("responsible_id")?;

    let category_text: String = row.get("category")?;
    let category = InitiativeCategory::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in initiatives.category"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = InitiativeStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in initiatives.status"
        ))
    })?;

    Ok(Initiative {
        id: parse_id(&id_text, "initiatives.id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        category,
        status,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        community_id: parse_id(&community_text, "initiatives.community_id")?,
        responsible_id: parse_id(&responsible_text, "initiatives.responsible_id")?,
    })
}
