//! Record use-case service.
//!
//! # Responsibility
//! - Provide the `DataStore` implementation backed by a record repository.
//! - Log each use-case with duration and status.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Service layer remains storage-agnostic.

use crate::model::project::ProjectId;
use crate::model::record::{Record, RecordDraft, RecordId, RecordType};
use crate::repo::record_repo::{RecordListQuery, RecordRepository, RepoResult};
use crate::service::data_store::{DataStore, StoreError};
use log::{error, info};
use std::time::Instant;

/// Use-case service wrapper for record persistence.
pub struct RecordService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gets one record by ID.
    pub fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>> {
        self.repo.get_record(id)
    }

    /// Lists records using project/type scope and pagination options.
    pub fn list_records(&self, query: &RecordListQuery) -> RepoResult<Vec<Record>> {
        self.repo.list_records(query)
    }
}

impl<R: RecordRepository> DataStore for RecordService<R> {
    fn fetch(
        &self,
        project_id: ProjectId,
        kind: Option<RecordType>,
    ) -> Result<Vec<Record>, StoreError> {
        let started_at = Instant::now();
        let query = RecordListQuery::for_project(project_id).with_kind(kind);
        let kind_label = kind.map_or("all", RecordType::as_str);
        match self.repo.list_records(&query) {
            Ok(records) => {
                info!(
                    "event=data_fetch module=service status=ok kind={kind_label} count={} duration_ms={}",
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(records)
            }
            Err(err) => {
                error!(
                    "event=data_fetch module=service status=error kind={kind_label} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
        }
    }

    fn create(&self, draft: &RecordDraft) -> Result<Record, StoreError> {
        self.repo.create_record(draft).map_err(|err| {
            error!(
                "event=data_create module=service status=error kind={} error={err}",
                draft.kind
            );
            err.into()
        })
    }

    fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.repo.delete_record(id).map_err(|err| {
            error!("event=data_delete module=service status=error error={err}");
            err.into()
        })
    }
}
