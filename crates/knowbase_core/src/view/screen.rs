//! Knowledge-base screen controller.
//!
//! # Responsibility
//! - Own the mutable screen state: search term, type filter, selected
//!   project, add dialog, fetched records and pending notifications.
//! - Derive the render model (`ScreenContent`) from that state.
//! - Route create/delete actions to the data store and report outcomes.
//!
//! # Invariants
//! - Records are only fetched for a selected project.
//! - A fetch result is applied only if no newer fetch was started and the
//!   project selection did not change after it.
//! - Internal store detail is logged, never put on screen.
//! - Deletion always passes through a confirmation prompt naming the title.
//! - Closing the add dialog resets the form.

use crate::model::project::{Project, ProjectId};
use crate::model::record::{Record, RecordId};
use crate::service::data_store::{DataStore, ProjectDirectory, StoreError};
use crate::view::dispatch::{kind_config, render_card, skeleton_variants, CardVariant, CardView};
use crate::view::filter::{RecordFilter, TypeFilter};
use crate::view::form::{RecordForm, SubmitOutcome};
use crate::view::notify::{
    Toast, DELETE_SUCCESS_MESSAGE, FETCH_ERROR_MESSAGE, GENERIC_ERROR_MESSAGE,
};
use log::{debug, error, info, warn};
use serde::Serialize;

/// Label of the project picker when nothing is selected.
pub const NO_PROJECT_LABEL: &str = "Select Project";
pub const RETRY_LABEL: &str = "Retry";

/// Blocking yes/no prompt used before destructive actions.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> ConfirmPrompt for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Confirmation text shown before deleting a record.
pub fn delete_prompt(title: &str) -> String {
    format!("Are you sure you want to delete \"{title}\"?")
}

/// Why the list area is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    NoProjectSelected,
    NoRecords,
    NoRecordsOfType,
    NoSearchMatches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub reason: EmptyReason,
    pub title: &'static str,
    pub message: &'static str,
    /// Offer the "Add Data" action inside the placeholder.
    pub show_add_action: bool,
}

impl EmptyState {
    pub fn for_reason(reason: EmptyReason) -> Self {
        let (title, message, show_add_action) = match reason {
            EmptyReason::NoProjectSelected => (
                "Select a Project",
                "Choose a project to view and manage its data library",
                false,
            ),
            EmptyReason::NoRecords => (
                "No data found",
                "Start building your knowledge base by adding some content.",
                true,
            ),
            EmptyReason::NoRecordsOfType => (
                "No data found",
                "There are no items of this type in the project yet.",
                false,
            ),
            EmptyReason::NoSearchMatches => (
                "No matches",
                "No items match your current search or filter criteria.",
                false,
            ),
        };
        Self {
            reason,
            title,
            message,
            show_add_action,
        }
    }
}

/// Render model of the list area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScreenContent {
    Loading { skeletons: Vec<CardVariant> },
    /// Persistent inline error panel with a retry action.
    FetchError { message: String, retry_label: &'static str },
    Cards { cards: Vec<CardView> },
    Empty { empty: EmptyState },
}

/// Outcome of a delete action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
    /// Record is not in the current list.
    Unknown,
    Failed(StoreError),
}

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub project_id: ProjectId,
    pub filter: TypeFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadPhase {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Single parameterized knowledge-base screen.
#[derive(Debug)]
pub struct KnowledgeBaseScreen {
    search_term: String,
    active_filter: TypeFilter,
    include_tags: bool,
    projects: Vec<Project>,
    selected_project: Option<ProjectId>,
    add_dialog_open: bool,
    form: RecordForm,
    records: Vec<Record>,
    phase: LoadPhase,
    generation: u64,
    notifications: Vec<Toast>,
}

impl Default for KnowledgeBaseScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBaseScreen {
    pub fn new() -> Self {
        Self {
            search_term: String::new(),
            active_filter: TypeFilter::All,
            include_tags: false,
            projects: Vec::new(),
            selected_project: None,
            add_dialog_open: false,
            form: RecordForm::new(),
            records: Vec::new(),
            phase: LoadPhase::Idle,
            generation: 0,
            notifications: Vec::new(),
        }
    }

    /// Also match the search term against tags.
    pub fn with_tag_search(mut self, include_tags: bool) -> Self {
        self.include_tags = include_tags;
        self
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn active_filter(&self) -> TypeFilter {
        self.active_filter
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn selected_project(&self) -> Option<ProjectId> {
        self.selected_project
    }

    pub fn selected_project_name(&self) -> &str {
        self.selected_project
            .and_then(|id| self.projects.iter().find(|project| project.id == id))
            .map_or(NO_PROJECT_LABEL, |project| project.name.as_str())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn is_add_dialog_open(&self) -> bool {
        self.add_dialog_open
    }

    pub fn form(&self) -> &RecordForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RecordForm {
        &mut self.form
    }

    /// Reloads the project list.
    ///
    /// Auto-selects the only project when exactly one exists and none is
    /// selected; drops a selection whose project disappeared.
    pub fn sync_projects<D: ProjectDirectory + ?Sized>(
        &mut self,
        directory: &D,
    ) -> Result<(), StoreError> {
        let projects = directory.projects().map_err(|err| {
            warn!("event=projects_load module=view status=error error={err}");
            err
        })?;
        self.projects = projects;

        if let Some(selected) = self.selected_project {
            if !self.projects.iter().any(|project| project.id == selected) {
                self.clear_selection();
            }
        }
        if self.selected_project.is_none() && self.projects.len() == 1 {
            let only = self.projects[0].id;
            self.selected_project = Some(only);
            debug!("event=project_autoselect module=view status=ok");
        }
        Ok(())
    }

    /// Selects a known project. Unknown ids are ignored and return `false`.
    ///
    /// Fetched records are dropped; call `refresh` to load the new scope.
    pub fn select_project(&mut self, project_id: ProjectId) -> bool {
        if !self.projects.iter().any(|project| project.id == project_id) {
            return false;
        }
        if self.selected_project != Some(project_id) {
            self.selected_project = Some(project_id);
            self.invalidate_records();
        }
        true
    }

    /// Switches the type tab. Returns `true` when a refetch is needed.
    pub fn set_filter(&mut self, filter: TypeFilter) -> bool {
        if self.active_filter == filter {
            return false;
        }
        self.active_filter = filter;
        true
    }

    /// Updates the free-text query. Filtering is local; no refetch.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Starts a fetch for the current scope, superseding older ones.
    ///
    /// Returns `None` when no project is selected.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let project_id = self.selected_project?;
        self.generation += 1;
        self.phase = LoadPhase::Loading;
        Some(FetchTicket {
            generation: self.generation,
            project_id,
            filter: self.active_filter,
        })
    }

    /// Applies a fetch result. Stale tickets are discarded and return `false`.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Record>, StoreError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "event=data_fetch module=view status=stale generation={} current={}",
                ticket.generation, self.generation
            );
            return false;
        }

        match result {
            Ok(records) => {
                self.records = records;
                self.phase = LoadPhase::Ready;
            }
            Err(err) => {
                let message = match err {
                    StoreError::Rejected(message) => message,
                    StoreError::Internal(detail) => {
                        error!("event=data_fetch module=view status=error error={detail}");
                        FETCH_ERROR_MESSAGE.to_string()
                    }
                };
                self.records.clear();
                self.phase = LoadPhase::Failed(message);
            }
        }
        true
    }

    /// Fetches records for the current scope and applies them.
    pub fn refresh<S: DataStore + ?Sized>(&mut self, store: &S) {
        let Some(ticket) = self.begin_fetch() else {
            return;
        };
        let result = store.fetch(ticket.project_id, ticket.filter.kind());
        self.apply_fetch(ticket, result);
    }

    /// Opens the add dialog with a freshly reset form.
    pub fn open_add_dialog(&mut self) {
        self.form.reset();
        self.add_dialog_open = true;
    }

    pub fn close_add_dialog(&mut self) {
        self.add_dialog_open = false;
        self.form.reset();
    }

    /// Submits the add form.
    ///
    /// On success the dialog closes, the form resets and records refresh.
    /// On failure the form keeps its values and an error toast is queued.
    pub fn submit<S: DataStore + ?Sized>(&mut self, store: &S) -> SubmitOutcome {
        let label = kind_config(self.form.kind).label;
        let outcome = self.form.submit(self.selected_project, store);
        match &outcome {
            SubmitOutcome::Created(_) => {
                self.notify(Toast::success(format!("{label} added successfully")));
                self.close_add_dialog();
                self.refresh(store);
            }
            SubmitOutcome::Invalid(err) => self.notify(Toast::error(err.to_string())),
            SubmitOutcome::Failed(StoreError::Rejected(message)) => {
                self.notify(Toast::error(message.clone()));
            }
            SubmitOutcome::Failed(StoreError::Internal(_)) => {
                self.notify(Toast::error(GENERIC_ERROR_MESSAGE));
            }
        }
        outcome
    }

    /// Deletes one listed record after confirmation.
    pub fn delete_record<S, P>(&mut self, id: RecordId, store: &S, prompt: &mut P) -> DeleteOutcome
    where
        S: DataStore + ?Sized,
        P: ConfirmPrompt + ?Sized,
    {
        let Some(title) = self
            .records
            .iter()
            .find(|record| record.id == id)
            .map(|record| record.title.clone())
        else {
            return DeleteOutcome::Unknown;
        };

        if !prompt.confirm(&delete_prompt(&title)) {
            return DeleteOutcome::Cancelled;
        }

        match store.delete(id) {
            Ok(()) => {
                self.records.retain(|record| record.id != id);
                self.notify(Toast::success(DELETE_SUCCESS_MESSAGE));
                info!("event=record_delete module=view status=ok");
                DeleteOutcome::Deleted
            }
            Err(err) => {
                let message = match &err {
                    StoreError::Rejected(message) => message.clone(),
                    StoreError::Internal(_) => GENERIC_ERROR_MESSAGE.to_string(),
                };
                self.notify(Toast::error(message));
                DeleteOutcome::Failed(err)
            }
        }
    }

    /// Records visible under the current filter and search term.
    pub fn visible_records(&self) -> Vec<&Record> {
        self.current_filter().apply(&self.records)
    }

    /// Render model of the list area.
    pub fn content(&self) -> ScreenContent {
        if self.selected_project.is_none() {
            return ScreenContent::Empty {
                empty: EmptyState::for_reason(EmptyReason::NoProjectSelected),
            };
        }

        match &self.phase {
            LoadPhase::Loading => {
                return ScreenContent::Loading {
                    skeletons: skeleton_variants(self.active_filter),
                };
            }
            LoadPhase::Failed(message) => {
                return ScreenContent::FetchError {
                    message: message.clone(),
                    retry_label: RETRY_LABEL,
                };
            }
            LoadPhase::Idle | LoadPhase::Ready => {}
        }

        let visible = self.visible_records();
        if visible.is_empty() {
            let reason = if !self.search_term.is_empty() {
                EmptyReason::NoSearchMatches
            } else if self.active_filter != TypeFilter::All {
                EmptyReason::NoRecordsOfType
            } else {
                EmptyReason::NoRecords
            };
            return ScreenContent::Empty {
                empty: EmptyState::for_reason(reason),
            };
        }

        ScreenContent::Cards {
            cards: visible.into_iter().map(render_card).collect(),
        }
    }

    /// Takes all queued notifications, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.notifications)
    }

    fn current_filter(&self) -> RecordFilter {
        RecordFilter::new(self.active_filter, self.search_term.clone()).with_tags(self.include_tags)
    }

    fn clear_selection(&mut self) {
        self.selected_project = None;
        self.invalidate_records();
    }

    /// Drops fetched records and orphans any in-flight fetch.
    fn invalidate_records(&mut self) {
        self.generation += 1;
        self.records.clear();
        self.phase = LoadPhase::Idle;
    }

    fn notify(&mut self, toast: Toast) {
        self.notifications.push(toast);
    }
}
