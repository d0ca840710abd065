//! Record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/list/delete APIs over canonical `records` storage.
//! - Own tag persistence with insertion order preserved via `position`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `RecordDraft::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - List order is `created_at DESC, uuid ASC`.

use crate::db::DbError;
use crate::model::project::ProjectId;
use crate::model::record::{
    Metadata, Record, RecordDraft, RecordId, RecordKind, RecordType, RecordValidationError,
};
use chrono::Utc;
use log::{error, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    uuid,
    project_uuid,
    type,
    title,
    description,
    content,
    metadata_json,
    created_at
FROM records";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by record and project persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    /// Project name is blank after trim.
    InvalidProjectName,
    Db(DbError),
    RecordNotFound(RecordId),
    ProjectNotFound(ProjectId),
    InvalidData(String),
    /// Connection was not migrated before repository construction.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidProjectName => write!(f, "project name must not be blank"),
            Self::Db(err) => write!(f, "{err}"),
            Self::RecordNotFound(id) => write!(f, "record not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing records of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordListQuery {
    pub project_id: ProjectId,
    /// Upstream type scoping; `None` lists every kind.
    pub kind: Option<RecordType>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl RecordListQuery {
    /// Lists every record of `project_id` without pagination.
    pub fn for_project(project_id: ProjectId) -> Self {
        Self {
            project_id,
            kind: None,
            limit: None,
            offset: 0,
        }
    }

    pub fn with_kind(mut self, kind: Option<RecordType>) -> Self {
        self.kind = kind;
        self
    }
}

/// Repository interface for record persistence.
pub trait RecordRepository {
    /// Persists a draft and returns the stored record with id and timestamp.
    fn create_record(&self, draft: &RecordDraft) -> RepoResult<Record>;
    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>>;
    fn list_records(&self, query: &RecordListQuery) -> RepoResult<Vec<Record>>;
    /// Hard-deletes one record and its tags.
    fn delete_record(&self, id: RecordId) -> RepoResult<()>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        for table in ["projects", "records", "record_tags"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create_record(&self, draft: &RecordDraft) -> RepoResult<Record> {
        draft.validate()?;
        if !project_exists(self.conn, draft.project_id)? {
            return Err(RepoError::ProjectNotFound(draft.project_id));
        }

        let id = Uuid::new_v4();
        let created_at = Utc::now().timestamp_millis();
        let metadata_json = serde_json::to_string(&draft.metadata)
            .map_err(|err| RepoError::InvalidData(format!("metadata not serializable: {err}")))?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO records (
                uuid,
                project_uuid,
                type,
                title,
                description,
                content,
                metadata_json,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                id.to_string(),
                draft.project_id.to_string(),
                draft.kind.as_str(),
                draft.title.as_str(),
                draft.description.as_deref(),
                draft.content.as_deref(),
                metadata_json,
                created_at,
            ],
        )?;
        for (position, tag) in draft.tags.iter().enumerate() {
            tx.execute(
                "INSERT INTO record_tags (record_uuid, position, tag) VALUES (?1, ?2, ?3);",
                params![id.to_string(), position as i64, tag.as_str()],
            )?;
        }
        tx.commit()?;

        info!(
            "event=record_create module=repo status=ok kind={} tag_count={}",
            draft.kind,
            draft.tags.len()
        );
        Ok(draft.clone().into_record(id, created_at))
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list_records(&self, query: &RecordListQuery) -> RepoResult<Vec<Record>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE project_uuid = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(query.project_id.to_string())];

        if let Some(kind) = query.kind {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(self.conn, row)?);
        }

        Ok(records)
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            error!("event=record_delete module=repo status=error error_code=not_found");
            return Err(RepoError::RecordNotFound(id));
        }

        info!("event=record_delete module=repo status=ok");
        Ok(())
    }
}

fn parse_record_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Record> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "records.uuid")?;
    let project_text: String = row.get("project_uuid")?;
    let project_id = parse_uuid(&project_text, "records.project_uuid")?;

    let type_text: String = row.get("type")?;
    let kind = RecordKind::parse(&type_text);
    if kind.known().is_none() {
        warn!("event=record_read module=repo status=degraded reason=unknown_type type={type_text}");
    }

    let metadata_text: String = row.get("metadata_json")?;
    let metadata: Metadata = serde_json::from_str(&metadata_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid metadata in records.metadata_json: {err}"))
    })?;

    let record = Record {
        id,
        kind,
        title: row.get("title")?,
        description: row.get("description")?,
        content: row.get("content")?,
        tags: load_tags(conn, &uuid_text)?,
        metadata,
        project_id,
        created_at: row.get("created_at")?,
    };
    record.validate()?;
    Ok(record)
}

fn load_tags(conn: &Connection, record_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag
         FROM record_tags
         WHERE record_uuid = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([record_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn project_exists(conn: &Connection, id: ProjectId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM projects WHERE uuid = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
