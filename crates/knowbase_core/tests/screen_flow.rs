use knowbase_core::db::open_db_in_memory;
use knowbase_core::view::screen::{EmptyState, FetchTicket};
use knowbase_core::{
    delete_prompt, CardDetail, CardVariant, DataStore, DeleteOutcome, EmptyReason, FormError,
    KnowledgeBaseScreen, Project, ProjectDirectory, ProjectService, Record, RecordDraft, RecordId,
    RecordKind, RecordRepository, RecordService, RecordType, ScreenContent, SqliteProjectRepository,
    SqliteRecordRepository, StoreError, SubmitOutcome, ToastLevel, TypeFilter,
};
use std::cell::{Cell, RefCell};
use uuid::Uuid;

/// In-memory store that counts calls and can be told to fail.
#[derive(Default)]
struct SpyStore {
    records: RefCell<Vec<Record>>,
    fetch_calls: Cell<usize>,
    create_calls: Cell<usize>,
    delete_calls: Cell<usize>,
    fail_create: Option<StoreError>,
    fail_fetch: Option<StoreError>,
}

impl SpyStore {
    fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: RefCell::new(records),
            ..Self::default()
        }
    }
}

impl DataStore for SpyStore {
    fn fetch(
        &self,
        project_id: Uuid,
        kind: Option<RecordType>,
    ) -> Result<Vec<Record>, StoreError> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);
        if let Some(err) = &self.fail_fetch {
            return Err(err.clone());
        }
        Ok(self
            .records
            .borrow()
            .iter()
            .filter(|record| record.project_id == project_id)
            .filter(|record| kind.map_or(true, |kind| record.kind == kind))
            .cloned()
            .collect())
    }

    fn create(&self, draft: &RecordDraft) -> Result<Record, StoreError> {
        self.create_calls.set(self.create_calls.get() + 1);
        if let Some(err) = &self.fail_create {
            return Err(err.clone());
        }
        let record = draft.clone().into_record(Uuid::new_v4(), 1_700_000_000_000);
        self.records.borrow_mut().insert(0, record.clone());
        Ok(record)
    }

    fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.delete_calls.set(self.delete_calls.get() + 1);
        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return Err(StoreError::Rejected(format!("record not found: {id}")));
        }
        Ok(())
    }
}

struct FixedProjects(Vec<Project>);

impl ProjectDirectory for FixedProjects {
    fn projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.0.clone())
    }
}

fn project(n: u128, name: &str) -> Project {
    Project {
        id: Uuid::from_u128(n),
        name: name.to_string(),
        created_at: 0,
    }
}

fn record(n: u128, project: &Project, kind: RecordType, title: &str) -> Record {
    RecordDraft::new(kind, title, project.id).into_record(Uuid::from_u128(n), 1_700_000_000_000)
}

fn screen_with(projects: Vec<Project>) -> KnowledgeBaseScreen {
    let mut screen = KnowledgeBaseScreen::new();
    screen.sync_projects(&FixedProjects(projects)).unwrap();
    screen
}

fn empty_reason(content: &ScreenContent) -> Option<EmptyReason> {
    match content {
        ScreenContent::Empty { empty } => Some(empty.reason),
        _ => None,
    }
}

fn card_titles(content: &ScreenContent) -> Vec<String> {
    match content {
        ScreenContent::Cards { cards } => cards.iter().map(|card| card.title.clone()).collect(),
        other => panic!("expected cards, got {other:?}"),
    }
}

#[test]
fn single_project_is_auto_selected() {
    let docs = project(1, "Docs");
    let screen = screen_with(vec![docs.clone()]);
    assert_eq!(screen.selected_project(), Some(docs.id));
    assert_eq!(screen.selected_project_name(), "Docs");
}

#[test]
fn multiple_projects_require_selection() {
    let mut screen = screen_with(vec![project(1, "Docs"), project(2, "Sales")]);
    assert_eq!(screen.selected_project(), None);
    assert_eq!(screen.selected_project_name(), "Select Project");
    assert_eq!(
        empty_reason(&screen.content()),
        Some(EmptyReason::NoProjectSelected)
    );

    let store = SpyStore::default();
    screen.refresh(&store);
    assert_eq!(store.fetch_calls.get(), 0);

    assert!(!screen.select_project(Uuid::from_u128(99)));
    assert!(screen.select_project(Uuid::from_u128(2)));
    assert_eq!(screen.selected_project_name(), "Sales");
}

#[test]
fn refresh_renders_cards_and_search_narrows_them() {
    let docs = project(1, "Docs");
    let store = SpyStore::with_records(vec![
        record(10, &docs, RecordType::Issue, "Login fails"),
        record(11, &docs, RecordType::Product, "Widget"),
    ]);
    let mut screen = screen_with(vec![docs]);
    screen.refresh(&store);

    assert_eq!(
        card_titles(&screen.content()),
        vec!["Login fails".to_string(), "Widget".to_string()]
    );

    screen.set_search_term("WIDGET");
    assert_eq!(card_titles(&screen.content()), vec!["Widget".to_string()]);
    assert_eq!(store.fetch_calls.get(), 1);

    screen.set_search_term("nothing here");
    assert_eq!(
        empty_reason(&screen.content()),
        Some(EmptyReason::NoSearchMatches)
    );
}

#[test]
fn filter_change_scopes_fetch_and_reports_empty_type() {
    let docs = project(1, "Docs");
    let store = SpyStore::with_records(vec![record(10, &docs, RecordType::Issue, "Login fails")]);
    let mut screen = screen_with(vec![docs]);
    screen.refresh(&store);

    assert!(screen.set_filter(TypeFilter::Only(RecordType::Product)));
    assert!(!screen.set_filter(TypeFilter::Only(RecordType::Product)));
    screen.refresh(&store);
    assert_eq!(
        empty_reason(&screen.content()),
        Some(EmptyReason::NoRecordsOfType)
    );

    screen.set_filter(TypeFilter::All);
    screen.refresh(&store);
    assert_eq!(card_titles(&screen.content()), vec!["Login fails".to_string()]);
}

#[test]
fn empty_project_offers_add_action() {
    let store = SpyStore::default();
    let mut screen = screen_with(vec![project(1, "Docs")]);
    screen.refresh(&store);
    match screen.content() {
        ScreenContent::Empty { empty } => {
            assert_eq!(empty, EmptyState::for_reason(EmptyReason::NoRecords));
            assert!(empty.show_add_action);
        }
        other => panic!("expected empty state, got {other:?}"),
    }
}

#[test]
fn loading_state_shows_skeletons_for_the_active_filter() {
    let mut screen = screen_with(vec![project(1, "Docs")]);
    screen.set_filter(TypeFilter::Only(RecordType::Inquiry));
    let _ticket = screen.begin_fetch().expect("project selected");
    assert!(screen.is_loading());
    match screen.content() {
        ScreenContent::Loading { skeletons } => assert_eq!(skeletons.len(), 6),
        other => panic!("expected loading, got {other:?}"),
    }
}

#[test]
fn stale_fetch_results_are_discarded() {
    let docs = project(1, "Docs");
    let mut screen = screen_with(vec![docs.clone()]);

    let stale: FetchTicket = screen.begin_fetch().unwrap();
    let fresh = screen.begin_fetch().unwrap();

    assert!(screen.apply_fetch(fresh, Ok(vec![record(10, &docs, RecordType::Context, "Fresh")])));
    assert!(!screen.apply_fetch(stale, Ok(vec![record(11, &docs, RecordType::Context, "Stale")])));
    assert_eq!(card_titles(&screen.content()), vec!["Fresh".to_string()]);
}

#[test]
fn fetch_error_shows_persistent_panel_with_retry() {
    let store = SpyStore {
        fail_fetch: Some(StoreError::Rejected("network unreachable".to_string())),
        ..SpyStore::default()
    };
    let mut screen = screen_with(vec![project(1, "Docs")]);
    screen.refresh(&store);

    match screen.content() {
        ScreenContent::FetchError {
            message,
            retry_label,
        } => {
            assert!(message.contains("network unreachable"));
            assert_eq!(retry_label, "Retry");
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
    assert!(screen.drain_notifications().is_empty());
}

#[test]
fn internal_fetch_error_hides_backend_detail() {
    let store = SpyStore {
        fail_fetch: Some(StoreError::Internal(
            "disk I/O error at /var/db/knowbase.sqlite3".to_string(),
        )),
        ..SpyStore::default()
    };
    let mut screen = screen_with(vec![project(1, "Docs")]);
    screen.refresh(&store);

    match screen.content() {
        ScreenContent::FetchError { message, .. } => {
            assert_eq!(message, "Failed to load data");
            assert!(!message.contains("disk I/O"));
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[test]
fn fetch_started_before_project_switch_is_discarded() {
    let docs = project(1, "Docs");
    let sales = project(2, "Sales");
    let mut screen = screen_with(vec![docs.clone(), sales.clone()]);
    assert!(screen.select_project(docs.id));

    let docs_ticket = screen.begin_fetch().unwrap();
    assert!(screen.select_project(sales.id));

    let applied = screen.apply_fetch(
        docs_ticket,
        Ok(vec![record(10, &docs, RecordType::Context, "Docs only")]),
    );
    assert!(!applied);
    assert_eq!(screen.selected_project_name(), "Sales");
    assert!(screen.records().is_empty());
    assert_eq!(
        empty_reason(&screen.content()),
        Some(EmptyReason::NoRecords)
    );
}

#[test]
fn fetch_started_before_project_disappears_is_discarded() {
    let docs = project(1, "Docs");
    let sales = project(2, "Sales");
    let mut screen = screen_with(vec![docs.clone(), sales.clone()]);
    screen.select_project(docs.id);
    let docs_ticket = screen.begin_fetch().unwrap();

    screen.sync_projects(&FixedProjects(vec![sales])).unwrap();
    assert_eq!(screen.selected_project(), Some(Uuid::from_u128(2)));
    assert!(!screen.apply_fetch(
        docs_ticket,
        Ok(vec![record(10, &docs, RecordType::Context, "Docs only")]),
    ));
    assert!(screen.records().is_empty());
}

#[test]
fn unknown_stored_type_renders_generic_card_next_to_known_ones() {
    let docs = project(1, "Docs");
    let mut legacy = record(10, &docs, RecordType::Context, "Legacy memo");
    legacy.kind = RecordKind::Unknown("memo".to_string());
    let store = SpyStore::with_records(vec![
        legacy,
        record(11, &docs, RecordType::Issue, "Login fails"),
    ]);
    let mut screen = screen_with(vec![docs]);
    screen.refresh(&store);

    match screen.content() {
        ScreenContent::Cards { cards } => {
            assert_eq!(cards.len(), 2);
            assert_eq!(cards[0].variant, CardVariant::Generic);
            assert_eq!(cards[0].badge, "Data");
            assert_eq!(cards[1].variant, CardVariant::Issue);
        }
        other => panic!("expected cards, got {other:?}"),
    }

    screen.set_filter(TypeFilter::Only(RecordType::Context));
    screen.refresh(&store);
    assert_eq!(
        empty_reason(&screen.content()),
        Some(EmptyReason::NoRecordsOfType)
    );
}

#[test]
fn empty_title_is_rejected_without_calling_create() {
    let store = SpyStore::default();
    let mut screen = screen_with(vec![project(1, "Docs")]);
    screen.open_add_dialog();
    screen.form_mut().title = "   ".to_string();
    assert!(!screen.form().can_submit());

    let outcome = screen.submit(&store);
    assert_eq!(outcome, SubmitOutcome::Invalid(FormError::MissingTitle));
    assert_eq!(store.create_calls.get(), 0);
    assert!(screen.is_add_dialog_open());

    let toasts = screen.drain_notifications();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Error);
    assert_eq!(toasts[0].message, "Please enter a title");
}

#[test]
fn missing_project_is_rejected_without_calling_create() {
    let store = SpyStore::default();
    let mut screen = screen_with(vec![project(1, "Docs"), project(2, "Sales")]);
    screen.open_add_dialog();
    screen.form_mut().title = "Orphan".to_string();

    let outcome = screen.submit(&store);
    assert_eq!(outcome, SubmitOutcome::Invalid(FormError::MissingProject));
    assert_eq!(store.create_calls.get(), 0);
}

#[test]
fn successful_submit_closes_dialog_resets_form_and_refreshes() {
    let docs = project(1, "Docs");
    let store = SpyStore::default();
    let mut screen = screen_with(vec![docs.clone()]);
    screen.refresh(&store);

    screen.open_add_dialog();
    {
        let form = screen.form_mut();
        form.kind = RecordType::Product;
        form.title = "Widget".to_string();
        form.description = "Blue widget".to_string();
        form.tags = "sale, blue ,".to_string();
        form.price = "19.99".to_string();
    }

    let outcome = screen.submit(&store);
    let created = match outcome {
        SubmitOutcome::Created(record) => record,
        other => panic!("expected created, got {other:?}"),
    };
    assert_eq!(created.project_id, docs.id);
    assert_eq!(created.tags, vec!["sale", "blue"]);
    assert_eq!(created.price(), Some(19.99));

    assert_eq!(store.create_calls.get(), 1);
    assert_eq!(store.fetch_calls.get(), 2);
    assert!(!screen.is_add_dialog_open());
    assert_eq!(screen.form().title, "");
    assert_eq!(screen.form().kind, RecordType::Context);

    let toasts = screen.drain_notifications();
    assert_eq!(toasts[0].level, ToastLevel::Success);
    assert_eq!(toasts[0].message, "Product added successfully");

    match screen.content() {
        ScreenContent::Cards { cards } => {
            assert_eq!(cards.len(), 1);
            assert_eq!(
                cards[0].detail,
                CardDetail::Product {
                    price: Some("$19.99".to_string())
                }
            );
        }
        other => panic!("expected cards, got {other:?}"),
    }
}

#[test]
fn store_errors_keep_form_values_for_retry() {
    let rejected = SpyStore {
        fail_create: Some(StoreError::Rejected("quota exceeded".to_string())),
        ..SpyStore::default()
    };
    let mut screen = screen_with(vec![project(1, "Docs")]);
    screen.open_add_dialog();
    screen.form_mut().title = "Keep me".to_string();

    assert!(matches!(screen.submit(&rejected), SubmitOutcome::Failed(_)));
    assert!(screen.is_add_dialog_open());
    assert_eq!(screen.form().title, "Keep me");
    assert!(screen.form().can_submit());
    assert_eq!(screen.drain_notifications()[0].message, "quota exceeded");

    let broken = SpyStore {
        fail_create: Some(StoreError::Internal("disk I/O error".to_string())),
        ..SpyStore::default()
    };
    screen.submit(&broken);
    assert_eq!(
        screen.drain_notifications()[0].message,
        "An unexpected error occurred"
    );
}

#[test]
fn closing_dialog_resets_form() {
    let mut screen = screen_with(vec![project(1, "Docs")]);
    screen.open_add_dialog();
    screen.form_mut().title = "Draft".to_string();
    screen.form_mut().kind = RecordType::Issue;
    screen.close_add_dialog();
    assert!(!screen.is_add_dialog_open());
    assert_eq!(screen.form().title, "");
    assert_eq!(screen.form().kind, RecordType::Context);
}

#[test]
fn delete_requires_confirmation_naming_the_title() {
    let docs = project(1, "Docs");
    let store = SpyStore::with_records(vec![
        record(10, &docs, RecordType::Context, "First"),
        record(11, &docs, RecordType::Issue, "Second"),
        record(12, &docs, RecordType::Product, "Third"),
    ]);
    let mut screen = screen_with(vec![docs]);
    screen.refresh(&store);

    let mut prompts = Vec::new();
    let outcome = screen.delete_record(Uuid::from_u128(11), &store, &mut |message: &str| {
        prompts.push(message.to_string());
        false
    });
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(prompts, vec![delete_prompt("Second")]);
    assert!(prompts[0].contains("\"Second\""));
    assert_eq!(store.delete_calls.get(), 0);

    let outcome = screen.delete_record(Uuid::from_u128(11), &store, &mut |_: &str| true);
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(
        card_titles(&screen.content()),
        vec!["First".to_string(), "Third".to_string()]
    );
    assert_eq!(
        screen.drain_notifications()[0].message,
        "Item deleted successfully"
    );

    let outcome = screen.delete_record(Uuid::from_u128(11), &store, &mut |_: &str| true);
    assert_eq!(outcome, DeleteOutcome::Unknown);
}

#[test]
fn screen_runs_against_sqlite_services() {
    let conn = open_db_in_memory().unwrap();
    let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let docs = projects.create_project("Docs").unwrap();
    let store = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let mut screen = KnowledgeBaseScreen::new();
    screen.sync_projects(&projects).unwrap();
    assert_eq!(screen.selected_project(), Some(docs.id));
    screen.refresh(&store);

    screen.open_add_dialog();
    screen.form_mut().kind = RecordType::Issue;
    screen.form_mut().title = "Login fails".to_string();
    assert!(matches!(screen.submit(&store), SubmitOutcome::Created(_)));

    let id = screen.records()[0].id;
    assert_eq!(
        screen.delete_record(id, &store, &mut |_: &str| true),
        DeleteOutcome::Deleted
    );
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    assert!(repo.get_record(id).unwrap().is_none());
    assert!(projects
        .projects()
        .unwrap()
        .iter()
        .any(|project| project.id == docs.id));
}
