//! Project repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Project names are trimmed and non-empty before persistence.
//! - List order is `name COLLATE NOCASE ASC, uuid ASC`.

use crate::model::project::{Project, ProjectId};
use crate::repo::record_repo::{parse_uuid, table_exists, RepoError, RepoResult};
use chrono::Utc;
use log::info;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Repository interface for project persistence.
pub trait ProjectRepository {
    fn create_project(&self, name: &str) -> RepoResult<Project>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, "projects")? {
            return Err(RepoError::MissingRequiredTable("projects"));
        }
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, name: &str) -> RepoResult<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepoError::InvalidProjectName);
        }

        let project = Project {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now().timestamp_millis(),
        };
        self.conn.execute(
            "INSERT INTO projects (uuid, name, created_at) VALUES (?1, ?2, ?3);",
            params![project.id.to_string(), project.name.as_str(), project.created_at],
        )?;

        info!("event=project_create module=repo status=ok");
        Ok(project)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, name, created_at FROM projects WHERE uuid = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, created_at
             FROM projects
             ORDER BY name COLLATE NOCASE ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Project {
        id: parse_uuid(&uuid_text, "projects.uuid")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}
