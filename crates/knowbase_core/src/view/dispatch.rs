//! Type-to-card dispatch and the per-type configuration table.
//!
//! # Responsibility
//! - Map each record kind to a card variant, icon, label and accent.
//! - Build the render model (`CardView`) for one record.
//!
//! # Invariants
//! - Every known kind has exactly one configuration row.
//! - Unknown type tags dispatch to `CardVariant::Generic`; dispatch never fails.
//! - Missing optional fields are omitted from the card, never an error.

use crate::model::record::{Record, RecordId, RecordKind, RecordType};
use crate::view::display::{
    format_date, format_price, preview_text, report_count, short_ref, visible_tags,
};
use crate::view::filter::TypeFilter;
use serde::Serialize;

/// Icon used when a type tag has no configuration row.
pub const FALLBACK_ICON: &str = "file-text";
const SKELETON_COUNT: usize = 6;

/// Rendering variant selected per record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardVariant {
    /// Square knowledge card.
    Context,
    /// Compact issue-tracker row.
    Issue,
    /// Discussion post with a left accent bar.
    Inquiry,
    /// Tall showcase card with an image area.
    Product,
    /// Fallback for type tags this build does not know.
    Generic,
}

impl CardVariant {
    pub fn for_kind(kind: RecordType) -> Self {
        match kind {
            RecordType::Context => Self::Context,
            RecordType::Issue => Self::Issue,
            RecordType::Inquiry => Self::Inquiry,
            RecordType::Product => Self::Product,
        }
    }

    /// Dispatches on a raw type tag, falling back to `Generic`.
    pub fn for_tag(tag: &str) -> Self {
        RecordType::parse(tag).map_or(Self::Generic, Self::for_kind)
    }

    /// Variant for a stored record kind; unknown tags get `Generic`.
    pub fn for_record(kind: &RecordKind) -> Self {
        match kind {
            RecordKind::Known(kind) => Self::for_kind(*kind),
            RecordKind::Unknown(tag) => Self::for_tag(tag),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Issue => "issue",
            Self::Inquiry => "inquiry",
            Self::Product => "product",
            Self::Generic => "generic",
        }
    }

    /// Layout parameters for this variant.
    pub fn layout(self) -> CardLayout {
        match self {
            Self::Context => CardLayout {
                accent: Accent::Blue,
                shape: CardShape::Square,
                max_tags: 3,
                show_tag_overflow: true,
            },
            Self::Issue => CardLayout {
                accent: Accent::Red,
                shape: CardShape::Row,
                max_tags: 0,
                show_tag_overflow: false,
            },
            Self::Inquiry => CardLayout {
                accent: Accent::Purple,
                shape: CardShape::Post,
                max_tags: 1,
                show_tag_overflow: false,
            },
            Self::Product => CardLayout {
                accent: Accent::Green,
                shape: CardShape::Showcase,
                max_tags: 2,
                show_tag_overflow: false,
            },
            Self::Generic => CardLayout {
                accent: Accent::Neutral,
                shape: CardShape::Square,
                max_tags: 3,
                show_tag_overflow: true,
            },
        }
    }
}

/// Accent color family of a card or badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    Blue,
    Red,
    Orange,
    Yellow,
    Purple,
    Green,
    Gray,
    Neutral,
}

/// Card footprint in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardShape {
    Square,
    Row,
    Post,
    Showcase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardLayout {
    pub accent: Accent,
    pub shape: CardShape,
    pub max_tags: usize,
    /// Show a `+N` badge when tags exceed `max_tags`.
    pub show_tag_overflow: bool,
}

/// One row of the per-type configuration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindConfig {
    pub kind: RecordType,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

const KIND_CONFIGS: [KindConfig; 4] = [
    KindConfig {
        kind: RecordType::Context,
        label: "Context",
        icon: "info",
        description: "Background information and knowledge",
    },
    KindConfig {
        kind: RecordType::Issue,
        label: "Issue",
        icon: "alert-circle",
        description: "Problems and bug reports",
    },
    KindConfig {
        kind: RecordType::Inquiry,
        label: "Inquiry",
        icon: "message-square",
        description: "Questions and requests",
    },
    KindConfig {
        kind: RecordType::Product,
        label: "Product",
        icon: "package",
        description: "Product information and details",
    },
];

/// Configuration rows in type-selector order.
pub fn kind_configs() -> &'static [KindConfig] {
    &KIND_CONFIGS
}

pub fn kind_config(kind: RecordType) -> &'static KindConfig {
    match kind {
        RecordType::Context => &KIND_CONFIGS[0],
        RecordType::Issue => &KIND_CONFIGS[1],
        RecordType::Inquiry => &KIND_CONFIGS[2],
        RecordType::Product => &KIND_CONFIGS[3],
    }
}

/// Icon name for a raw type tag.
pub fn icon_for_tag(tag: &str) -> &'static str {
    RecordType::parse(tag).map_or(FALLBACK_ICON, |kind| kind_config(kind).icon)
}

/// Skeleton variants shown while records load.
///
/// `All` mixes kinds; a single-kind filter repeats that kind.
pub fn skeleton_variants(filter: TypeFilter) -> Vec<CardVariant> {
    match filter {
        TypeFilter::All => vec![
            CardVariant::Context,
            CardVariant::Issue,
            CardVariant::Inquiry,
            CardVariant::Product,
            CardVariant::Context,
            CardVariant::Product,
        ],
        TypeFilter::Only(kind) => vec![CardVariant::for_kind(kind); SKELETON_COUNT],
    }
}

/// Priority badge shown on issue cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityBadge {
    pub label: String,
    pub accent: Accent,
}

impl PriorityBadge {
    pub fn new(priority: &str) -> Self {
        let accent = match priority {
            "critical" => Accent::Red,
            "high" => Accent::Orange,
            "medium" => Accent::Yellow,
            _ => Accent::Gray,
        };
        Self {
            label: priority.to_string(),
            accent,
        }
    }
}

/// Variant-specific card fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum CardDetail {
    Plain,
    Issue {
        priority: Option<PriorityBadge>,
        reference: String,
        report_count: u32,
    },
    Inquiry {
        /// Label shown next to the author avatar.
        channel: &'static str,
    },
    Product {
        price: Option<String>,
    },
}

/// Render model for one record card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: RecordId,
    pub variant: CardVariant,
    pub layout: CardLayout,
    pub badge: &'static str,
    pub icon: &'static str,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub tag_overflow: Option<String>,
    pub date: String,
    pub detail: CardDetail,
}

/// Builds the card for `record` using its own kind.
pub fn render_card(record: &Record) -> CardView {
    render_card_as(record, CardVariant::for_record(&record.kind))
}

/// Builds the card for `record` with an explicit variant.
///
/// Used when the variant came from a raw type tag (`CardVariant::for_tag`).
pub fn render_card_as(record: &Record, variant: CardVariant) -> CardView {
    let layout = variant.layout();
    let (tags, overflow) = visible_tags(&record.tags, layout.max_tags);
    let tag_overflow = overflow.filter(|_| layout.show_tag_overflow);
    let (badge, icon) = match (variant, record.kind.known()) {
        (CardVariant::Generic, _) | (_, None) => ("Data", FALLBACK_ICON),
        (_, Some(kind)) => {
            let config = kind_config(kind);
            (config.label, config.icon)
        }
    };

    let detail = match variant {
        CardVariant::Issue => {
            let id = record.id.to_string();
            CardDetail::Issue {
                priority: record.priority().map(PriorityBadge::new),
                reference: short_ref(&id),
                report_count: report_count(&id),
            }
        }
        CardVariant::Inquiry => CardDetail::Inquiry { channel: "inquiry" },
        CardVariant::Product => CardDetail::Product {
            price: record.price().map(format_price),
        },
        CardVariant::Context | CardVariant::Generic => CardDetail::Plain,
    };

    CardView {
        id: record.id,
        variant,
        layout,
        badge,
        icon,
        title: record.title.clone(),
        description: preview_text(record.description.as_deref()),
        tags,
        tag_overflow,
        date: format_date(record.created_at),
        detail,
    }
}
