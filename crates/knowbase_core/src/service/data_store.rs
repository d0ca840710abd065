//! Collaborator contracts consumed by the knowledge-base screen.
//!
//! # Invariants
//! - `StoreError::Rejected` carries a message safe to show verbatim.
//! - `StoreError::Internal` carries diagnostic detail that is logged, never shown.

use crate::model::project::{Project, ProjectId};
use crate::model::record::{Record, RecordDraft, RecordId, RecordType};
use crate::repo::record_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error class reported by store collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store refused the operation for a reason the user can act on.
    Rejected(String),
    /// Unexpected backend failure.
    Internal(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(message) => write!(f, "{message}"),
            Self::Internal(detail) => write!(f, "internal store error: {detail}"),
        }
    }
}

impl Error for StoreError {}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(_)
            | RepoError::InvalidProjectName
            | RepoError::RecordNotFound(_)
            | RepoError::ProjectNotFound(_) => Self::Rejected(value.to_string()),
            RepoError::Db(_) | RepoError::InvalidData(_) | RepoError::MissingRequiredTable(_) => {
                Self::Internal(value.to_string())
            }
        }
    }
}

/// Supplies records for a project and exposes create/delete.
pub trait DataStore {
    /// Returns records of `project_id`, optionally scoped to one kind, in
    /// store order.
    fn fetch(
        &self,
        project_id: ProjectId,
        kind: Option<RecordType>,
    ) -> Result<Vec<Record>, StoreError>;
    fn create(&self, draft: &RecordDraft) -> Result<Record, StoreError>;
    fn delete(&self, id: RecordId) -> Result<(), StoreError>;
}

/// Supplies the list of projects the user can select.
pub trait ProjectDirectory {
    fn projects(&self) -> Result<Vec<Project>, StoreError>;
}
