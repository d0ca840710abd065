//! Knowledge-base record model.
//!
//! # Responsibility
//! - Define the canonical record shared by context/issue/inquiry/product views.
//! - Define the creation draft handed to the data store.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `kind` is immutable after creation; new records always use one of the four
//!   known types, while stored rows may carry a tag this build does not know.
//! - `title` is non-empty after trim.
//! - `tags` keep insertion order and contain no blank values.

use crate::model::project::ProjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a record.
pub type RecordId = Uuid;

/// Open, type-dependent metadata bag (`price` for products, `priority` for issues).
pub type Metadata = Map<String, Value>;

/// Metadata key holding a product price.
pub const METADATA_PRICE: &str = "price";
/// Metadata key holding an issue priority.
pub const METADATA_PRIORITY: &str = "priority";

/// Content kind of a record. Selects both storage partition and card variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    /// Background information and knowledge.
    Context,
    /// Problems and bug reports.
    Issue,
    /// Questions and requests.
    Inquiry,
    /// Product information and details.
    Product,
}

impl RecordType {
    /// All kinds in display order.
    pub const ALL: [RecordType; 4] = [
        RecordType::Context,
        RecordType::Issue,
        RecordType::Inquiry,
        RecordType::Product,
    ];

    /// Stable string tag used in storage and across FFI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Issue => "issue",
            Self::Inquiry => "inquiry",
            Self::Product => "product",
        }
    }

    /// Parses a stable string tag. Unknown tags return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "context" => Some(Self::Context),
            "issue" => Some(Self::Issue),
            "inquiry" => Some(Self::Inquiry),
            "product" => Some(Self::Product),
            _ => None,
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of a stored record: a known kind or a raw tag this build does not know.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordKind {
    Known(RecordType),
    Unknown(String),
}

impl RecordKind {
    /// Parses a raw type tag; anything unrecognized is kept verbatim.
    pub fn parse(value: &str) -> Self {
        RecordType::parse(value).map_or_else(|| Self::Unknown(value.to_string()), Self::Known)
    }

    pub fn known(&self) -> Option<RecordType> {
        match self {
            Self::Known(kind) => Some(*kind),
            Self::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(kind) => kind.as_str(),
            Self::Unknown(tag) => tag,
        }
    }
}

impl From<RecordType> for RecordKind {
    fn from(value: RecordType) -> Self {
        Self::Known(value)
    }
}

impl From<String> for RecordKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<RecordKind> for String {
    fn from(value: RecordKind) -> Self {
        value.as_str().to_string()
    }
}

impl PartialEq<RecordType> for RecordKind {
    fn eq(&self, other: &RecordType) -> bool {
        self.known() == Some(*other)
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue priority stored under `metadata.priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl IssuePriority {
    pub const ALL: [IssuePriority; 4] = [
        IssuePriority::Low,
        IssuePriority::Medium,
        IssuePriority::High,
        IssuePriority::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Validation failure for records and drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Title is empty after trim.
    EmptyTitle,
    /// Tag at `index` is empty after trim.
    BlankTag { index: usize },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "record title must not be blank"),
            Self::BlankTag { index } => write!(f, "record tag at index {index} is blank"),
        }
    }
}

impl Error for RecordValidationError {}

/// Canonical knowledge-base entry as returned by the data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned stable ID.
    pub id: RecordId,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    /// Insertion-ordered tag values.
    pub tags: Vec<String>,
    pub metadata: Metadata,
    pub project_id: ProjectId,
    /// Unix epoch milliseconds, assigned by the store. Display only.
    pub created_at: i64,
}

impl Record {
    /// Checks title and tag invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_fields(&self.title, &self.tags)
    }

    /// Product price from metadata, when present and numeric.
    pub fn price(&self) -> Option<f64> {
        metadata_price(&self.metadata)
    }

    /// Raw issue priority string from metadata, when present.
    pub fn priority(&self) -> Option<&str> {
        self.metadata
            .get(METADATA_PRIORITY)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// Creation input handed to the data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub kind: RecordType,
    pub metadata: Metadata,
    pub project_id: ProjectId,
}

impl RecordDraft {
    /// Creates a draft with only the required fields set.
    pub fn new(kind: RecordType, title: impl Into<String>, project_id: ProjectId) -> Self {
        Self {
            title: title.into(),
            description: None,
            content: None,
            tags: Vec::new(),
            kind,
            metadata: Metadata::new(),
            project_id,
        }
    }

    /// Checks title and tag invariants before any store call.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_fields(&self.title, &self.tags)
    }

    /// Materializes a stored record from this draft with store-assigned fields.
    pub fn into_record(self, id: RecordId, created_at: i64) -> Record {
        Record {
            id,
            kind: RecordKind::Known(self.kind),
            title: self.title,
            description: self.description,
            content: self.content,
            tags: self.tags,
            metadata: self.metadata,
            project_id: self.project_id,
            created_at,
        }
    }
}

fn validate_fields(title: &str, tags: &[String]) -> Result<(), RecordValidationError> {
    if title.trim().is_empty() {
        return Err(RecordValidationError::EmptyTitle);
    }
    if let Some(index) = tags.iter().position(|tag| tag.trim().is_empty()) {
        return Err(RecordValidationError::BlankTag { index });
    }
    Ok(())
}

pub(crate) fn metadata_price(metadata: &Metadata) -> Option<f64> {
    match metadata.get(METADATA_PRICE)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}
