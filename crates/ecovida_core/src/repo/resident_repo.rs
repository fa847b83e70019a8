//! Resident repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `residents` storage.
//! - Surface the email uniqueness constraint as a semantic error.
//! - Answer the community-existence probe the service layer validates with.
//!
//! # Invariants
//! - Email uniqueness is enforced by `idx_residents_email`, not by a read
//!   before write.

use crate::model::community::CommunityId;
use crate::model::resident::{Resident, ResidentId};
use crate::repo::{ensure_connection_ready, parse_id, RepoError, RepoResult};
use rusqlite::{params, Connection, ErrorCode, Row};

const RESIDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    phone,
    birth_date,
    community_id
FROM residents";

/// Repository interface for resident CRUD operations.
pub trait ResidentRepository {
    fn create_resident(&self, resident: &Resident) -> RepoResult<ResidentId>;
    fn update_resident(&self, resident: &Resident) -> RepoResult<()>;
    fn get_resident(&self, id: ResidentId) -> RepoResult<Option<Resident>>;
    fn list_residents(&self) -> RepoResult<Vec<Resident>>;
    fn delete_resident(&self, id: ResidentId) -> RepoResult<()>;
    /// Existence probe for the owning community reference.
    fn community_exists(&self, id: CommunityId) -> RepoResult<bool>;
}

/// SQLite-backed resident repository.
pub struct SqliteResidentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteResidentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ResidentRepository for SqliteResidentRepository<'_> {
    fn create_resident(&self, resident: &Resident) -> RepoResult<ResidentId> {
        self.conn
            .execute(
                "INSERT INTO residents (
                    id,
                    name,
                    email,
                    phone,
                    birth_date,
                    community_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    resident.id.to_string(),
                    resident.name.as_str(),
                    resident.email.as_str(),
                    resident.phone.as_deref(),
                    resident.birth_date,
                    resident.community_id.to_string(),
                ],
            )
            .map_err(map_resident_write_error)?;

        Ok(resident.id)
    }

    fn update_resident(&self, resident: &Resident) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE residents
                 SET
                    name = ?1,
                    email = ?2,
                    phone = ?3,
                    birth_date = ?4,
                    community_id = ?5,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?6;",
                params![
                    resident.name.as_str(),
                    resident.email.as_str(),
                    resident.phone.as_deref(),
                    resident.birth_date,
                    resident.community_id.to_string(),
                    resident.id.to_string(),
                ],
            )
            .map_err(map_resident_write_error)?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "resident",
                id: resident.id,
            });
        }

        Ok(())
    }

    fn get_resident(&self, id: ResidentId) -> RepoResult<Option<Resident>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RESIDENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_resident_row(row)?));
        }

        Ok(None)
    }

    fn list_residents(&self) -> RepoResult<Vec<Resident>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RESIDENT_SELECT_SQL} ORDER BY updated_at DESC, id ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut residents = Vec::new();
        while let Some(row) = rows.next()? {
            residents.push(parse_resident_row(row)?);
        }

        Ok(residents)
    }

    fn delete_resident(&self, id: ResidentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM residents WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "resident",
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
}

fn parse_resident_row(row: &Row<'_>) -> RepoResult<Resident> {
    let id_text: String = row.get("id")?;
    let community_text: String = row.get("community_id")?;

    Ok(Resident {
        id: parse_id(&id_text, "residents.id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        birth_date: row.get("birth_date")?,
        community_id: parse_id(&community_text, "residents.community_id")?,
    })
}

fn map_resident_write_error(err: rusqlite::Error) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            RepoError::UniqueViolation {
                entity: "resident",
                field: "email",
            }
        }
        _ => err.into(),
    }
}
