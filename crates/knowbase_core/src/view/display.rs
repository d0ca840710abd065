//! Derived display fields computed at render time.
//!
//! Nothing here is persisted; every helper is a pure function of its input.

use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Upper bound of the cosmetic issue report counter.
pub const REPORT_COUNT_MAX: u32 = 50;
const SHORT_REF_CHARS: usize = 6;

/// Formats epoch milliseconds as `Mon D, YYYY` (en-US short month, UTC).
///
/// Out-of-range timestamps fall back to an empty label instead of failing.
pub fn format_date(epoch_ms: i64) -> String {
    match Utc.timestamp_millis_opt(epoch_ms).single() {
        Some(at) => at.format("%b %-d, %Y").to_string(),
        None => String::new(),
    }
}

/// Cosmetic "report count" badge for issues, derived from the record id.
///
/// Same id always yields the same value in `1..=REPORT_COUNT_MAX`.
pub fn report_count(id: &str) -> u32 {
    let hash = id.chars().fold(0_i32, |hash, ch| {
        // (hash << 5) - hash == hash * 31
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(ch as u32 as i32)
    });
    hash.unsigned_abs() % REPORT_COUNT_MAX + 1
}

/// Short issue reference: `#` plus the last six characters of the id.
pub fn short_ref(id: &str) -> String {
    let count = id.chars().count();
    let tail: String = id.chars().skip(count.saturating_sub(SHORT_REF_CHARS)).collect();
    format!("#{tail}")
}

/// Renders a product price the way the card shows it (`$12.5`, `$10`).
pub fn format_price(price: f64) -> String {
    format!("${price}")
}

/// Collapses whitespace runs; returns `None` for absent or blank text.
pub fn preview_text(text: Option<&str>) -> Option<String> {
    let text = text?;
    let normalized = WHITESPACE_RE.replace_all(text, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Splits tags into the visible prefix and an optional `+N` overflow label.
pub fn visible_tags(tags: &[String], max_visible: usize) -> (Vec<String>, Option<String>) {
    let shown = tags.iter().take(max_visible).cloned().collect();
    let hidden = tags.len().saturating_sub(max_visible);
    let overflow = (hidden > 0).then(|| format!("+{hidden}"));
    (shown, overflow)
}

#[cfg(test)]
mod tests {
    use super::{
        format_date, format_price, preview_text, report_count, short_ref, visible_tags,
        REPORT_COUNT_MAX,
    };

    #[test]
    fn format_date_uses_short_month_day_year() {
        // 2024-01-05T12:00:00Z
        assert_eq!(format_date(1_704_456_000_000), "Jan 5, 2024");
        assert_eq!(format_date(0), "Jan 1, 1970");
    }

    #[test]
    fn format_date_tolerates_out_of_range_values() {
        assert_eq!(format_date(i64::MAX), "");
    }

    #[test]
    fn report_count_is_stable_and_bounded() {
        let first = report_count("abc123");
        for _ in 0..10 {
            assert_eq!(report_count("abc123"), first);
        }
        assert!((1..=REPORT_COUNT_MAX).contains(&first));
        assert_eq!(report_count(""), 1);
    }

    #[test]
    fn report_count_stays_bounded_for_long_ids() {
        let id = "f".repeat(512);
        assert!((1..=REPORT_COUNT_MAX).contains(&report_count(&id)));
        let uuid = "7d1f0c57-2b8e-4a8e-9a57-7b1d3b6c9e01";
        assert!((1..=REPORT_COUNT_MAX).contains(&report_count(uuid)));
    }

    #[test]
    fn short_ref_takes_last_six_chars() {
        assert_eq!(short_ref("0123456789"), "#456789");
        assert_eq!(short_ref("abc"), "#abc");
    }

    #[test]
    fn price_and_preview_formatting() {
        assert_eq!(format_price(12.5), "$12.5");
        assert_eq!(format_price(10.0), "$10");
        assert_eq!(
            preview_text(Some("  two\n\nlines  ")).as_deref(),
            Some("two lines")
        );
        assert_eq!(preview_text(Some("   ")), None);
        assert_eq!(preview_text(None), None);
    }

    #[test]
    fn visible_tags_reports_overflow() {
        let tags = vec!["a", "b", "c", "d", "e"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        let (shown, overflow) = visible_tags(&tags, 3);
        assert_eq!(shown, vec!["a", "b", "c"]);
        assert_eq!(overflow.as_deref(), Some("+2"));

        let (shown, overflow) = visible_tags(&tags[..1], 3);
        assert_eq!(shown, vec!["a"]);
        assert_eq!(overflow, None);
    }
}
