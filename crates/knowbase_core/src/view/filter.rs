//! Client-side record filtering.
//!
//! # Responsibility
//! - Narrow an already-fetched record list by type and free-text query.
//!
//! # Invariants
//! - Pure: output depends only on the records, the type filter and the query.
//! - Stable: surviving records keep their relative order.
//! - Case-insensitive via simple lowercasing; no locale collation.
//! - Applying the same filter twice yields the same result as applying it once.

use crate::model::record::{Record, RecordKind, RecordType};
use std::fmt::{Display, Formatter};

/// Type scope of the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(RecordType),
}

impl TypeFilter {
    /// Stable string value (`all` or a record type tag).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(kind) => kind.as_str(),
        }
    }

    /// Parses `all` or a record type tag. Unknown values return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim() == "all" {
            return Some(Self::All);
        }
        RecordType::parse(value).map(Self::Only)
    }

    /// Kind to scope an upstream fetch with, if any.
    pub fn kind(self) -> Option<RecordType> {
        match self {
            Self::All => None,
            Self::Only(kind) => Some(kind),
        }
    }

    /// Records with an unknown type tag only pass `All`.
    pub fn admits(self, kind: &RecordKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *kind == only,
        }
    }
}

impl Display for TypeFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<RecordType>> for TypeFilter {
    fn from(value: Option<RecordType>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

/// One filter tab of the screen header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterTab {
    pub label: &'static str,
    pub filter: TypeFilter,
}

const FILTER_TABS: [FilterTab; 5] = [
    FilterTab {
        label: "All",
        filter: TypeFilter::All,
    },
    FilterTab {
        label: "Context",
        filter: TypeFilter::Only(RecordType::Context),
    },
    FilterTab {
        label: "Issues",
        filter: TypeFilter::Only(RecordType::Issue),
    },
    FilterTab {
        label: "Inquiries",
        filter: TypeFilter::Only(RecordType::Inquiry),
    },
    FilterTab {
        label: "Products",
        filter: TypeFilter::Only(RecordType::Product),
    },
];

/// Filter tabs in header order.
pub fn filter_tabs() -> &'static [FilterTab] {
    &FILTER_TABS
}

/// Combined type + text filter over fetched records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub kind: TypeFilter,
    /// Free text; empty keeps every record of the admitted type.
    pub query: String,
    /// Also match when a tag contains the query. Off by default.
    pub include_tags: bool,
}

impl RecordFilter {
    pub fn new(kind: TypeFilter, query: impl Into<String>) -> Self {
        Self {
            kind,
            query: query.into(),
            include_tags: false,
        }
    }

    pub fn with_tags(mut self, include_tags: bool) -> Self {
        self.include_tags = include_tags;
        self
    }

    /// Returns whether `record` survives this filter.
    pub fn matches(&self, record: &Record) -> bool {
        if !self.kind.admits(&record.kind) {
            return false;
        }
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        self.text_matches(record, needle.as_str())
    }

    /// Returns the surviving records in their original order.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        if self.query.is_empty() {
            return records
                .iter()
                .filter(|record| self.kind.admits(&record.kind))
                .collect();
        }

        let needle = self.query.to_lowercase();
        records
            .iter()
            .filter(|record| self.kind.admits(&record.kind))
            .filter(|record| self.text_matches(record, needle.as_str()))
            .collect()
    }

    fn text_matches(&self, record: &Record, needle: &str) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(needle);
        contains(&record.title)
            || record.description.as_deref().is_some_and(contains)
            || record.content.as_deref().is_some_and(contains)
            || (self.include_tags && record.tags.iter().any(|tag| contains(tag)))
    }
}

/// Filters `records` by type and query, preserving order.
pub fn filter_records<'a>(records: &'a [Record], kind: TypeFilter, query: &str) -> Vec<&'a Record> {
    RecordFilter::new(kind, query).apply(records)
}
