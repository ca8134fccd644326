//! The persistence contract the query engine depends on.
//!
//! `DiaryStore` is the seam between the diary operations and storage. Every
//! method is scoped to one owner; records belonging to other owners are never
//! visible through it. `SqliteStore` implements it over the pooled `Database`.

use crate::db::entries::{self, EntryPage};
use crate::db::{stats, Database};
use crate::diary_core::dates::Granularity;
use crate::diary_core::pagination::PageRequest;
use crate::errors::AppResult;
use crate::models::{DiaryEntry, EntryPatch, FrequencyBucket, NewEntry, TagStat, YearGroup};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

/// Owner-scoped storage for diary entries.
pub trait DiaryStore: Send + Sync {
    /// Persists a new entry, assigning its id and timestamps.
    fn create(&self, entry: &NewEntry) -> AppResult<DiaryEntry>;

    /// Looks up one entry. `None` when missing or owned by someone else.
    fn find_by_id(&self, owner_id: &str, id: Uuid) -> AppResult<Option<DiaryEntry>>;

    /// Lists entries newest date first.
    fn list_by_owner(&self, owner_id: &str, page: &PageRequest) -> AppResult<EntryPage>;

    /// Lists entries carrying at least one of `tags`, newest date first.
    fn list_by_tags(&self, owner_id: &str, tags: &[String], page: &PageRequest)
        -> AppResult<EntryPage>;

    /// Full-text search ordered by relevance.
    fn search(&self, owner_id: &str, query: &str, page: &PageRequest) -> AppResult<EntryPage>;

    /// Applies a merge-patch. `None` when the entry is not the owner's.
    fn update(&self, owner_id: &str, id: Uuid, patch: &EntryPatch)
        -> AppResult<Option<DiaryEntry>>;

    /// Removes an entry, returning whether anything was deleted.
    fn delete(&self, owner_id: &str, id: Uuid) -> AppResult<bool>;

    /// Every tag the owner has used, ascending.
    fn distinct_tags(&self, owner_id: &str) -> AppResult<Vec<String>>;

    /// Usage count and most recent date per tag, most used first.
    fn tag_stats(&self, owner_id: &str) -> AppResult<Vec<TagStat>>;

    /// Entries within `[start, end]` grouped into buckets.
    fn writing_frequency(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        granularity: Granularity,
    ) -> AppResult<Vec<FrequencyBucket>>;

    /// Entries from earlier or later years sharing `target`'s month and day.
    fn on_this_day(&self, owner_id: &str, target: NaiveDate) -> AppResult<Vec<YearGroup>>;
}

/// `DiaryStore` backed by SQLite.
///
/// Each call checks a connection out of the pool, so a `SqliteStore` can be
/// shared between threads.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl DiaryStore for SqliteStore {
    fn create(&self, entry: &NewEntry) -> AppResult<DiaryEntry> {
        let mut conn = self.db.get_conn()?;
        entries::insert_entry(&mut conn, entry, Utc::now())
    }

    fn find_by_id(&self, owner_id: &str, id: Uuid) -> AppResult<Option<DiaryEntry>> {
        let conn = self.db.get_conn()?;
        entries::get_entry(&conn, owner_id, id)
    }

    fn list_by_owner(&self, owner_id: &str, page: &PageRequest) -> AppResult<EntryPage> {
        let conn = self.db.get_conn()?;
        entries::list_entries(&conn, owner_id, page)
    }

    fn list_by_tags(
        &self,
        owner_id: &str,
        tags: &[String],
        page: &PageRequest,
    ) -> AppResult<EntryPage> {
        let conn = self.db.get_conn()?;
        entries::list_entries_by_tags(&conn, owner_id, tags, page)
    }

    fn search(&self, owner_id: &str, query: &str, page: &PageRequest) -> AppResult<EntryPage> {
        let conn = self.db.get_conn()?;
        entries::search_entries(&conn, owner_id, query, page)
    }

    fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        patch: &EntryPatch,
    ) -> AppResult<Option<DiaryEntry>> {
        let mut conn = self.db.get_conn()?;
        entries::update_entry(&mut conn, owner_id, id, patch, Utc::now())
    }

    fn delete(&self, owner_id: &str, id: Uuid) -> AppResult<bool> {
        let mut conn = self.db.get_conn()?;
        entries::delete_entry(&mut conn, owner_id, id)
    }

    fn distinct_tags(&self, owner_id: &str) -> AppResult<Vec<String>> {
        let conn = self.db.get_conn()?;
        stats::distinct_tags(&conn, owner_id)
    }

    fn tag_stats(&self, owner_id: &str) -> AppResult<Vec<TagStat>> {
        let conn = self.db.get_conn()?;
        stats::tag_stats(&conn, owner_id)
    }

    fn writing_frequency(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        granularity: Granularity,
    ) -> AppResult<Vec<FrequencyBucket>> {
        let conn = self.db.get_conn()?;
        stats::writing_frequency(&conn, owner_id, start, end, granularity)
    }

    fn on_this_day(&self, owner_id: &str, target: NaiveDate) -> AppResult<Vec<YearGroup>> {
        let conn = self.db.get_conn()?;
        stats::on_this_day(&conn, owner_id, target)
    }
}
