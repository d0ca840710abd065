use knowbase_core::view::dispatch::render_card_as;
use knowbase_core::view::display::report_count;
use knowbase_core::{
    filter_records, CardVariant, Record, RecordDraft, RecordFilter, RecordType, TypeFilter,
};
use uuid::Uuid;

fn record(n: u128, kind: RecordType, title: &str, description: Option<&str>) -> Record {
    let mut draft = RecordDraft::new(kind, title, Uuid::from_u128(1));
    draft.description = description.map(str::to_string);
    draft.into_record(Uuid::from_u128(n), 1_700_000_000_000)
}

fn sample() -> Vec<Record> {
    let mut with_content = record(3, RecordType::Context, "Onboarding", None);
    with_content.content = Some("Install the CLI, then run sync".to_string());
    let mut tagged = record(4, RecordType::Inquiry, "Pricing question", Some("From sales"));
    tagged.tags = vec!["billing".to_string()];
    vec![
        record(1, RecordType::Issue, "Login fails", Some("")),
        record(2, RecordType::Product, "Widget", Some("Blue widget")),
        with_content,
        tagged,
        record(5, RecordType::Issue, "Widget crash on save", None),
    ]
}

fn ids(records: &[&Record]) -> Vec<Uuid> {
    records.iter().map(|record| record.id).collect()
}

#[test]
fn widget_scenario_returns_only_the_product() {
    let records = vec![
        record(1, RecordType::Issue, "Login fails", Some("")),
        record(2, RecordType::Product, "Widget", Some("Blue widget")),
    ];
    let visible = filter_records(&records, TypeFilter::All, "widget");
    assert_eq!(ids(&visible), vec![Uuid::from_u128(2)]);
}

#[test]
fn empty_query_with_all_is_identity() {
    let records = sample();
    let visible = filter_records(&records, TypeFilter::All, "");
    let expected = records.iter().collect::<Vec<_>>();
    assert_eq!(visible, expected);
}

#[test]
fn result_is_order_preserving_subsequence() {
    let records = sample();
    for query in ["", "widget", "i", "zzz", "SYNC"] {
        for filter in [
            TypeFilter::All,
            TypeFilter::Only(RecordType::Issue),
            TypeFilter::Only(RecordType::Context),
        ] {
            let visible = filter_records(&records, filter, query);
            let positions = visible
                .iter()
                .map(|hit| {
                    records
                        .iter()
                        .position(|record| record.id == hit.id)
                        .expect("hit must come from input")
                })
                .collect::<Vec<_>>();
            assert!(
                positions.windows(2).all(|pair| pair[0] < pair[1]),
                "order broken for query={query} filter={filter}"
            );
        }
    }
}

#[test]
fn case_variations_of_title_substrings_match() {
    let records = vec![record(7, RecordType::Context, "Release Checklist", None)];
    for query in ["release", "RELEASE", "ReLeAsE cHeck", "list", "e C"] {
        assert_eq!(
            filter_records(&records, TypeFilter::All, query).len(),
            1,
            "query {query} should match"
        );
    }
}

#[test]
fn description_and_content_are_searched() {
    let records = sample();
    assert_eq!(
        ids(&filter_records(&records, TypeFilter::All, "blue")),
        vec![Uuid::from_u128(2)]
    );
    assert_eq!(
        ids(&filter_records(&records, TypeFilter::All, "run sync")),
        vec![Uuid::from_u128(3)]
    );
}

#[test]
fn records_without_match_in_text_fields_are_excluded() {
    let records = sample();
    assert!(filter_records(&records, TypeFilter::All, "billing").is_empty());
    assert!(filter_records(&records, TypeFilter::All, "nonexistent").is_empty());
}

#[test]
fn tag_search_is_opt_in() {
    let records = sample();
    let filter = RecordFilter::new(TypeFilter::All, "BILL").with_tags(true);
    assert_eq!(ids(&filter.apply(&records)), vec![Uuid::from_u128(4)]);
}

#[test]
fn type_filter_and_query_combine() {
    let records = sample();
    let visible = filter_records(&records, TypeFilter::Only(RecordType::Issue), "widget");
    assert_eq!(ids(&visible), vec![Uuid::from_u128(5)]);

    let issues = filter_records(&records, TypeFilter::Only(RecordType::Issue), "");
    assert_eq!(ids(&issues), vec![Uuid::from_u128(1), Uuid::from_u128(5)]);
}

#[test]
fn filter_is_idempotent() {
    let records = sample();
    for query in ["", "widget", "o", "nothing"] {
        let once = filter_records(&records, TypeFilter::All, query)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        let twice = filter_records(&once, TypeFilter::All, query)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(once, twice);
    }
}

#[test]
fn report_count_is_deterministic_for_known_id() {
    let first = report_count("abc123");
    assert!((1..=50).contains(&first));
    assert_eq!(report_count("abc123"), first);
}

#[test]
fn unknown_type_tag_renders_fallback_card() {
    let records = sample();
    let card = render_card_as(&records[1], CardVariant::for_tag("unheard-of"));
    assert_eq!(card.variant, CardVariant::Generic);
    assert_eq!(card.title, "Widget");
}
