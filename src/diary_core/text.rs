//! Text processing for diary content.
//!
//! Hashtag extraction, tag merging, excerpt generation and the diary date
//! window rule. Everything here is pure; the current date is passed in by
//! callers that need a deterministic clock.

use crate::constants::{DIARY_DATE_WINDOW_MONTHS, EXCERPT_ELLIPSIS};
use chrono::{Local, Months, NaiveDate};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#((?-u:\w)+)").expect("valid hashtag regex"));

/// Extracts hashtag-style tags from free text.
///
/// Returns the distinct words following a `#`, without the hash, in order of
/// first occurrence. A tag is a run of ASCII word characters (`[A-Za-z0-9_]`).
/// Matching is case-sensitive and no normalization is applied.
///
/// # Examples
///
/// ```
/// use daybook::diary_core::text::extract_tags;
///
/// let tags = extract_tags("Went hiking #outdoors #fitness #outdoors");
/// assert_eq!(tags, vec!["outdoors", "fitness"]);
/// ```
pub fn extract_tags(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    HASHTAG_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|tag| seen.insert(*tag))
        .map(str::to_string)
        .collect()
}

/// Merges caller-supplied tags with extracted ones.
///
/// Concatenates `explicit` then `extracted`, keeps the first occurrence of each
/// exact string and drops entries that are blank after trimming.
pub fn merge_tags(explicit: &[String], extracted: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    explicit
        .iter()
        .chain(extracted.iter())
        .filter(|tag| !tag.trim().is_empty())
        .filter(|tag| seen.insert(*tag))
        .cloned()
        .collect()
}

/// Splits a comma-separated tag list, trimming each segment.
///
/// Segments that are empty after trimming are dropped.
pub fn split_tag_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Generates a bounded preview of `text`.
///
/// Lengths are measured in characters. Text no longer than `max_length` is
/// returned unchanged. Longer text is cut to `max_length` characters, then back
/// to the last space in that slice if one follows its first character, and the
/// ellipsis marker is appended in both cases.
///
/// # Examples
///
/// ```
/// use daybook::diary_core::text::generate_excerpt;
///
/// assert_eq!(generate_excerpt("short", 10), "short");
/// assert_eq!(generate_excerpt("hello brave new world", 12), "hello brave...");
/// assert_eq!(generate_excerpt("abcdefghij", 4), "abcd...");
/// ```
pub fn generate_excerpt(text: &str, max_length: usize) -> String {
    let cut = match text.char_indices().nth(max_length) {
        Some((byte_idx, _)) => byte_idx,
        None => return text.to_string(),
    };

    let truncated = &text[..cut];
    let kept = match truncated.rfind(' ') {
        Some(space_idx) if space_idx > 0 => &truncated[..space_idx],
        _ => truncated,
    };

    format!("{}{}", kept, EXCERPT_ELLIPSIS)
}

/// Returns true if `date` lies within one calendar year either side of today.
///
/// Today is read from the local wall clock at the time of the call.
pub fn validate_diary_date(date: NaiveDate) -> bool {
    validate_diary_date_on(date, Local::now().date_naive())
}

/// Window check against an explicit `today`.
///
/// The window is closed: both `today - 1 year` and `today + 1 year` are accepted.
/// On February 29th the bounds clamp to February 28th of the neighbouring years.
pub fn validate_diary_date_on(date: NaiveDate, today: NaiveDate) -> bool {
    let window = Months::new(DIARY_DATE_WINDOW_MONTHS);
    let (Some(earliest), Some(latest)) = (
        today.checked_sub_months(window),
        today.checked_add_months(window),
    ) else {
        return false;
    };

    earliest <= date && date <= latest
}
