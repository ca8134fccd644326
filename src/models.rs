//! Plain value types shared by the store and the query engine.
//!
//! Records are immutable read models: the store hands them out, the engine
//! enriches them, nothing mutates them in place.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A stored diary entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: Uuid,
    pub owner_id: String,
    pub content: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new entry. Tags must already be merged and deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub owner_id: String,
    pub content: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
}

/// Merge-patch for an existing entry: `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub content: Option<String>,
    pub date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.date.is_none() && self.tags.is_none()
    }
}

/// An entry as returned to callers, with its derived excerpt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: DiaryEntry,
    pub excerpt: String,
}

/// The slice of an entry carried inside aggregation groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySummary {
    pub id: Uuid,
    pub content: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
}

impl From<DiaryEntry> for EntrySummary {
    fn from(entry: DiaryEntry) -> Self {
        EntrySummary {
            id: entry.id,
            content: entry.content,
            date: entry.date,
            tags: entry.tags,
        }
    }
}

/// Usage statistics for one tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagStat {
    pub tag: String,
    pub count: u64,
    pub last_used: NaiveDate,
}

/// Entries written within one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyBucket {
    pub key: String,
    pub count: u64,
    pub entries: Vec<EntrySummary>,
}

/// Entries from one earlier year sharing the target's month and day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearGroup {
    pub year: i32,
    pub entries: Vec<EntrySummary>,
}
