//! Project use-case service.

use crate::model::project::{Project, ProjectId};
use crate::repo::project_repo::ProjectRepository;
use crate::repo::record_repo::RepoResult;
use crate::service::data_store::{ProjectDirectory, StoreError};

/// Project directory backed by a project repository.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a project from a display name (trimmed, non-empty).
    pub fn create_project(&self, name: &str) -> RepoResult<Project> {
        self.repo.create_project(name)
    }

    pub fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        self.repo.get_project(id)
    }
}

impl<R: ProjectRepository> ProjectDirectory for ProjectService<R> {
    fn projects(&self) -> Result<Vec<Project>, StoreError> {
        self.repo.list_projects().map_err(StoreError::from)
    }
}
