//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Drive the core screen and form controllers against the on-disk store.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Return values are UTF-8 strings or envelopes with stable meaning.
//! - Ids cross the boundary as hyphenated UUID strings.

use knowbase_core::db::open_db;
use knowbase_core::view::dispatch::kind_configs;
use knowbase_core::view::notify::GENERIC_ERROR_MESSAGE;
use knowbase_core::{
    core_version as core_version_inner, delete_prompt, filter_tabs,
    init_logging as init_logging_inner, ping as ping_inner, AuthState, AuthUser, DeleteOutcome,
    IssuePriority, KnowledgeBaseScreen, ProjectDirectory, ProjectService, RecordService,
    RecordType, ShellView, SqliteProjectRepository, SqliteRecordRepository, StoreError,
    SubmitOutcome, TypeFilter,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const KB_DB_FILE_NAME: &str = "knowbase.sqlite3";
static KB_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Project row for the project picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub project_id: String,
    pub name: String,
}

/// Project list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectListResponse {
    pub ok: bool,
    pub items: Vec<ProjectItem>,
    pub message: String,
}

/// Generic action envelope for create/delete flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KbActionResponse {
    /// Whether the operation took effect.
    pub ok: bool,
    /// Id of the created project or record, or of the deleted record.
    pub id: Option<String>,
    /// Notification text suitable for display.
    pub message: String,
}

impl KbActionResponse {
    fn success(message: impl Into<String>, id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Screen snapshot for one project, filter and search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KbScreenResponse {
    pub ok: bool,
    /// Project picker label (`Select Project` when none is selected).
    pub selected_project_name: String,
    /// JSON render model tagged by `state`
    /// (`loading|fetch_error|cards|empty`).
    pub content_json: String,
    pub message: String,
}

/// Filter tab descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTabItem {
    pub label: String,
    /// `all|context|issue|inquiry|product`.
    pub value: String,
}

/// Type selector option for the add dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOptionItem {
    pub value: String,
    pub label: String,
    pub icon: String,
    pub description: String,
}

/// Add-dialog field values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KbRecordInput {
    /// `context|issue|inquiry|product`.
    pub kind: String,
    pub title: String,
    pub description: String,
    pub content: String,
    /// Comma-separated tags.
    pub tags: String,
    /// Product price input; ignored for other kinds.
    pub price: String,
    /// Issue priority (`low|medium|high|critical`); ignored for other kinds.
    pub priority: Option<String>,
}

/// Resolved shell view for the auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellViewResponse {
    /// `spinner|protected|login`.
    pub view: String,
    /// Spinner caption when `view == "spinner"`, empty otherwise.
    pub message: String,
    pub user_email: Option<String>,
}

/// Creates a project.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Blank names are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn kb_create_project(name: String) -> KbActionResponse {
    let result = with_store(|projects, _| {
        projects
            .create_project(&name)
            .map_err(|err| display_message(&StoreError::from(err)))
    });
    match result {
        Ok(project) => KbActionResponse::success("Project created.", project.id.to_string()),
        Err(message) => KbActionResponse::failure(message),
    }
}

/// Lists projects ordered by name.
#[flutter_rust_bridge::frb(sync)]
pub fn kb_list_projects() -> ProjectListResponse {
    match with_store(|projects, _| projects.projects().map_err(|err| display_message(&err))) {
        Ok(projects) => {
            let items = projects
                .into_iter()
                .map(|project| ProjectItem {
                    project_id: project.id.to_string(),
                    name: project.name,
                })
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No projects.".to_string()
            } else {
                format!("Found {} project(s).", items.len())
            };
            ProjectListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(message) => ProjectListResponse {
            ok: false,
            items: Vec::new(),
            message,
        },
    }
}

/// Loads the screen render model.
///
/// Input semantics:
/// - `project_id`: selected project; `None` leaves auto-selection to the
///   screen (only when exactly one project exists).
/// - `filter`: `all` or a record type.
/// - `query`: free-text search applied to title, description and content.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Fetch failures surface inside `content_json` as a `fetch_error` state.
#[flutter_rust_bridge::frb(sync)]
pub fn kb_screen(project_id: Option<String>, filter: String, query: String) -> KbScreenResponse {
    let Some(filter) = TypeFilter::parse(&filter) else {
        return screen_failure(format!("unsupported filter `{}`", filter.trim()));
    };
    let selected = match project_id.as_deref().map(parse_id).transpose() {
        Ok(selected) => selected,
        Err(message) => return screen_failure(message),
    };

    let result = with_store(|projects, records| {
        let mut screen = KnowledgeBaseScreen::new();
        screen
            .sync_projects(projects)
            .map_err(|err| display_message(&err))?;
        if let Some(selected) = selected {
            if !screen.select_project(selected) {
                return Err(format!("project not found: {selected}"));
            }
        }
        screen.set_filter(filter);
        screen.set_search_term(query);
        screen.refresh(records);
        Ok(screen)
    });

    let screen = match result {
        Ok(screen) => screen,
        Err(message) => return screen_failure(message),
    };
    match serde_json::to_string(&screen.content()) {
        Ok(content_json) => KbScreenResponse {
            ok: true,
            selected_project_name: screen.selected_project_name().to_string(),
            content_json,
            message: String::new(),
        },
        Err(err) => screen_failure(format!("kb_screen encode failed: {err}")),
    }
}

/// Submits the add dialog for `project_id`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Blank titles are rejected before any store call.
/// - `message` carries the notification text for both outcomes.
#[flutter_rust_bridge::frb(sync)]
pub fn kb_create_record(project_id: String, input: KbRecordInput) -> KbActionResponse {
    let project = match parse_id(&project_id) {
        Ok(project) => project,
        Err(message) => return KbActionResponse::failure(message),
    };
    let Some(kind) = RecordType::parse(&input.kind) else {
        return KbActionResponse::failure(format!("unsupported type `{}`", input.kind.trim()));
    };
    let priority = match input.priority.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match IssuePriority::parse(raw) {
            Some(priority) => Some(priority),
            None => return KbActionResponse::failure(format!("unsupported priority `{raw}`")),
        },
    };

    let result = with_store(|projects, records| {
        let mut screen = KnowledgeBaseScreen::new();
        screen
            .sync_projects(projects)
            .map_err(|err| display_message(&err))?;
        if !screen.select_project(project) {
            return Err(format!("project not found: {project}"));
        }
        screen.open_add_dialog();
        let form = screen.form_mut();
        form.kind = kind;
        form.title = input.title;
        form.description = input.description;
        form.content = input.content;
        form.tags = input.tags;
        form.price = input.price;
        form.priority = priority;

        let outcome = screen.submit(records);
        let message = screen
            .drain_notifications()
            .into_iter()
            .last()
            .map(|toast| toast.message)
            .unwrap_or_default();
        Ok((outcome, message))
    });

    match result {
        Ok((SubmitOutcome::Created(record), message)) => {
            KbActionResponse::success(message, record.id.to_string())
        }
        Ok((_, message)) => KbActionResponse::failure(message),
        Err(message) => KbActionResponse::failure(message),
    }
}

/// Confirmation text the UI must show before calling `kb_delete_record`.
#[flutter_rust_bridge::frb(sync)]
pub fn kb_delete_prompt(title: String) -> String {
    delete_prompt(&title)
}

/// Deletes one record after the user answered the confirmation prompt.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - `confirmed == false` is a no-op that reports cancellation.
#[flutter_rust_bridge::frb(sync)]
pub fn kb_delete_record(record_id: String, confirmed: bool) -> KbActionResponse {
    let id = match parse_id(&record_id) {
        Ok(id) => id,
        Err(message) => return KbActionResponse::failure(message),
    };

    let result = with_store(|projects, records| {
        let record = records
            .get_record(id)
            .map_err(|err| display_message(&StoreError::from(err)))?
            .ok_or_else(|| format!("record not found: {id}"))?;

        let mut screen = KnowledgeBaseScreen::new();
        screen
            .sync_projects(projects)
            .map_err(|err| display_message(&err))?;
        screen.select_project(record.project_id);
        screen.refresh(records);

        let outcome = screen.delete_record(id, records, &mut |_: &str| confirmed);
        let message = screen
            .drain_notifications()
            .into_iter()
            .last()
            .map(|toast| toast.message);
        Ok((outcome, message))
    });

    match result {
        Ok((DeleteOutcome::Deleted, message)) => {
            KbActionResponse::success(message.unwrap_or_default(), id.to_string())
        }
        Ok((DeleteOutcome::Cancelled, _)) => KbActionResponse::failure("Delete cancelled."),
        Ok((DeleteOutcome::Unknown, _)) => {
            KbActionResponse::failure(format!("record not found: {id}"))
        }
        Ok((DeleteOutcome::Failed(err), message)) => {
            KbActionResponse::failure(message.unwrap_or_else(|| display_message(&err)))
        }
        Err(message) => KbActionResponse::failure(message),
    }
}

/// Filter tabs in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn kb_filter_tabs() -> Vec<FilterTabItem> {
    filter_tabs()
        .iter()
        .map(|tab| FilterTabItem {
            label: tab.label.to_string(),
            value: tab.filter.as_str().to_string(),
        })
        .collect()
}

/// Type selector options for the add dialog.
#[flutter_rust_bridge::frb(sync)]
pub fn kb_type_options() -> Vec<TypeOptionItem> {
    kind_configs()
        .iter()
        .map(|config| TypeOptionItem {
            value: config.kind.as_str().to_string(),
            label: config.label.to_string(),
            icon: config.icon.to_string(),
            description: config.description.to_string(),
        })
        .collect()
}

/// Resolves which top-level view the shell renders.
///
/// `loading` wins over a known user.
#[flutter_rust_bridge::frb(sync)]
pub fn kb_shell_view(
    user_id: Option<String>,
    user_email: Option<String>,
    loading: bool,
) -> ShellViewResponse {
    let user = user_id
        .filter(|id| !id.trim().is_empty())
        .map(|id| AuthUser {
            id,
            email: user_email,
        });
    match ShellView::from(AuthState::from_parts(user, loading)) {
        ShellView::Spinner { message } => ShellViewResponse {
            view: "spinner".to_string(),
            message: message.to_string(),
            user_email: None,
        },
        ShellView::Protected { user } => ShellViewResponse {
            view: "protected".to_string(),
            message: String::new(),
            user_email: user.email,
        },
        ShellView::Login => ShellViewResponse {
            view: "login".to_string(),
            message: String::new(),
            user_email: None,
        },
    }
}

fn resolve_kb_db_path() -> PathBuf {
    KB_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("KNOWBASE_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(KB_DB_FILE_NAME)
        })
        .clone()
}

type ProjectStore<'conn> = ProjectService<SqliteProjectRepository<'conn>>;
type RecordStore<'conn> = RecordService<SqliteRecordRepository<'conn>>;

fn with_store<T>(
    f: impl FnOnce(&ProjectStore<'_>, &RecordStore<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_kb_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=ffi_db_open module=ffi status=error error={err}");
        format!("knowbase DB open failed: {err}")
    })?;
    let projects = SqliteProjectRepository::try_new(&conn)
        .map_err(|err| format!("project repo init failed: {err}"))?;
    let records = SqliteRecordRepository::try_new(&conn)
        .map_err(|err| format!("record repo init failed: {err}"))?;
    f(&ProjectService::new(projects), &RecordService::new(records))
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid id `{}`", raw.trim()))
}

fn display_message(err: &StoreError) -> String {
    match err {
        StoreError::Rejected(message) => message.clone(),
        StoreError::Internal(_) => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

fn screen_failure(message: String) -> KbScreenResponse {
    KbScreenResponse {
        ok: false,
        selected_project_name: String::new(),
        content_json: String::new(),
        message,
    }
}
