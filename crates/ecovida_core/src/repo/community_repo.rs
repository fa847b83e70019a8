//! Community repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `communities` storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Deletes are hard and permissive: owned residents/initiatives are not
//!   checked (referential policy lives in the service layer).

use crate::model::community::{Community, CommunityId};
use crate::repo::{ensure_connection_ready, parse_id, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const COMMUNITY_SELECT_SQL: &str = "SELECT
    id,
    name,
    location,
    description,
    founded_at,
    sustainability_goal
FROM communities";

/// Repository interface for community CRUD operations.
pub trait CommunityRepository {
    fn create_community(&self, community: &Community) -> RepoResult<CommunityId>;
    fn update_community(&self, community: &Community) -> RepoResult<()>;
    fn get_community(&self, id: CommunityId) -> RepoResult<Option<Community>>;
    fn list_communities(&self) -> RepoResult<Vec<Community>>;
    fn delete_community(&self, id: CommunityId) -> RepoResult<()>;
}

/// SQLite-backed community repository.
pub struct SqliteCommunityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommunityRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CommunityRepository for SqliteCommunityRepository<'_> {
    fn create_community(&self, community: &Community) -> RepoResult<CommunityId> {
        self.conn.execute(
            "INSERT INTO communities (
                id,
                name,
                location,
                description,
                founded_at,
                sustainability_goal
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                community.id.to_string(),
                community.name.as_str(),
                community.location.as_str(),
                community.description.as_deref(),
                community.founded_at,
                community.sustainability_goal.as_deref(),
            ],
        )?;

        Ok(community.id)
    }

    fn update_community(&self, community: &Community) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE communities
             SET
                name = ?1,
                location = ?2,
                description = ?3,
                founded_at = ?4,
                sustainability_goal = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?6;",
            params![
                community.name.as_str(),
                community.location.as_str(),
                community.description.as_deref(),
                community.founded_at,
                community.sustainability_goal.as_deref(),
                community.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "community",
                id: community.id,
            });
        }

        Ok(())
    }

    fn get_community(&self, id: CommunityId) -> RepoResult<Option<Community>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMMUNITY_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_community_row(row)?));
        }

        Ok(None)
    }

    fn list_communities(&self) -> RepoResult<Vec<Community>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMMUNITY_SELECT_SQL} ORDER BY updated_at DESC, id ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut communities = Vec::new();
        while let Some(row) = rows.next()? {
            communities.push(parse_community_row(row)?);
        }

        Ok(communities)
    }

    fn delete_community(&self, id: CommunityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM communities WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "community",
                id,
            });
        }

        Ok(())
    }
}

fn parse_community_row(row: &Row<'_>) -> RepoResult<Community> {
    let id_text: String = row.get("id")?;
    let id = parse_id(&id_text, "communities.id")?;

    Ok(Community {
        id,
        name: row.get("name")?,
        location: row.get("location")?,
        description: row.get("description")?,
        founded_at: row.get("founded_at")?,
        sustainability_goal: row.get("sustainability_goal")?,
    })
}
