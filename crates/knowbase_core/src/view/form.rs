//! Creation form controller.
//!
//! # Responsibility
//! - Hold the add-dialog field values.
//! - Turn field values into a `RecordDraft` (tag splitting, type metadata).
//! - Reject invalid input locally before any store call.
//!
//! # Invariants
//! - A blank title or missing project never reaches `DataStore::create`.
//! - `submit` borrows the form mutably for the whole store call, so a second
//!   submission cannot start while one is outstanding.
//! - Tag input is split on commas, trimmed and empty-filtered, order kept.
//! - Type-specific metadata is only attached for its own type.

use crate::model::project::ProjectId;
use crate::model::record::{
    IssuePriority, Metadata, Record, RecordDraft, RecordType, METADATA_PRICE, METADATA_PRIORITY,
};
use crate::service::data_store::{DataStore, StoreError};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

static PRICE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid price regex")
});

/// Local validation failure; no store call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    MissingTitle,
    MissingProject,
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "Please enter a title"),
            Self::MissingProject => write!(f, "Please select a project"),
        }
    }
}

impl Error for FormError {}

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(Record),
    Invalid(FormError),
    Failed(StoreError),
}

/// Field values of the add dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordForm {
    pub kind: RecordType,
    pub title: String,
    pub description: String,
    pub content: String,
    /// Comma-separated tag input.
    pub tags: String,
    /// Product-only price input.
    pub price: String,
    /// Issue-only priority selection.
    pub priority: Option<IssuePriority>,
}

impl Default for RecordForm {
    fn default() -> Self {
        Self {
            kind: RecordType::Context,
            title: String::new(),
            description: String::new(),
            content: String::new(),
            tags: String::new(),
            price: String::new(),
            priority: None,
        }
    }
}

impl RecordForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every field and resets the type to `context`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn title_placeholder(&self) -> String {
        format!("Enter {} title...", self.kind)
    }

    pub fn description_placeholder(&self) -> String {
        format!("Brief description of this {}...", self.kind)
    }

    pub fn content_placeholder(&self) -> String {
        format!("Detailed content for this {}...", self.kind)
    }

    /// Builds the draft for `project`, or the local validation error.
    pub fn build_draft(&self, project: Option<ProjectId>) -> Result<RecordDraft, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }
        let project_id = project.ok_or(FormError::MissingProject)?;

        let mut draft = RecordDraft::new(self.kind, title, project_id);
        draft.description = non_blank(&self.description);
        draft.content = non_blank(&self.content);
        draft.tags = parse_tags_input(&self.tags);
        draft.metadata = self.type_metadata();
        Ok(draft)
    }

    /// Validates, then hands the draft to `store`.
    ///
    /// The form keeps its values on failure so the user can retry; callers
    /// reset it after `Created`.
    pub fn submit<S: DataStore + ?Sized>(
        &mut self,
        project: Option<ProjectId>,
        store: &S,
    ) -> SubmitOutcome {
        let draft = match self.build_draft(project) {
            Ok(draft) => draft,
            Err(err) => {
                warn!("event=form_submit module=view status=rejected reason={err:?}");
                return SubmitOutcome::Invalid(err);
            }
        };

        match store.create(&draft) {
            Ok(record) => {
                info!(
                    "event=form_submit module=view status=ok kind={}",
                    record.kind
                );
                SubmitOutcome::Created(record)
            }
            Err(err) => {
                warn!("event=form_submit module=view status=error error={err}");
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn type_metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        match self.kind {
            RecordType::Product => {
                if let Some(price) = parse_price_input(&self.price) {
                    let number = Number::from_f64(price).unwrap_or_else(|| Number::from(0));
                    metadata.insert(METADATA_PRICE.to_string(), Value::Number(number));
                }
            }
            RecordType::Issue => {
                if let Some(priority) = self.priority {
                    metadata.insert(
                        METADATA_PRIORITY.to_string(),
                        Value::String(priority.as_str().to_string()),
                    );
                }
            }
            RecordType::Context | RecordType::Inquiry => {}
        }
        metadata
    }
}

/// Splits comma-separated tag input into trimmed, non-empty tags.
pub fn parse_tags_input(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses price input from its leading number (`"12abc"` is `12`).
///
/// Blank input means "no price"; input without a leading number, or one that
/// overflows to infinity, is `0`.
pub fn parse_price_input(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(
        PRICE_PREFIX_RE
            .find(trimmed)
            .and_then(|prefix| prefix.as_str().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .unwrap_or(0.0),
    )
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
