//! Core domain logic for the knowledge base.
//! This crate is the single source of truth for business invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use auth::gate::{AuthGate, AuthProvider, AuthState, AuthUser, ShellView};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{Project, ProjectId};
pub use model::record::{
    IssuePriority, Metadata, Record, RecordDraft, RecordId, RecordKind, RecordType,
    RecordValidationError,
};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::record_repo::{
    RecordListQuery, RecordRepository, RepoError, RepoResult, SqliteRecordRepository,
};
pub use service::data_store::{DataStore, ProjectDirectory, StoreError};
pub use service::project_service::ProjectService;
pub use service::record_service::RecordService;
pub use view::dispatch::{render_card, CardDetail, CardVariant, CardView};
pub use view::filter::{filter_records, filter_tabs, RecordFilter, TypeFilter};
pub use view::form::{parse_tags_input, FormError, RecordForm, SubmitOutcome};
pub use view::notify::{Toast, ToastLevel};
pub use view::screen::{
    delete_prompt, ConfirmPrompt, DeleteOutcome, EmptyReason, KnowledgeBaseScreen, ScreenContent,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
