//! High-level diary operations.
//!
//! `DiaryService` is the query engine callers talk to. It normalizes inputs
//! (pagination, dates, tags), delegates persistence to a `DiaryStore` and
//! enriches what comes back with excerpts and pagination envelopes.
//!
//! Operations are split by concern:
//!
//! - `entries`: create, read, update, delete, list and search
//! - `insights`: tag listings, tag statistics, writing frequency and on-this-day
//!
//! # Example
//!
//! ```no_run
//! use daybook::db::{Database, SqliteStore};
//! use daybook::ops::DiaryService;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/daybook.db"))?;
//! db.initialize_schema()?;
//!
//! let service = DiaryService::new(SqliteStore::new(db));
//! let page = service.list_entries("alice", None, None)?;
//! println!("{} entries", page.total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entries;
pub mod insights;

use crate::constants::DEFAULT_EXCERPT_LENGTH;
use crate::db::entries::EntryPage;
use crate::db::DiaryStore;
use crate::diary_core::pagination::{build_pagination_result, Page, PageRequest};
use crate::diary_core::text::generate_excerpt;
use crate::models::{DiaryEntry, EntryView};
use chrono::{Local, NaiveDate};

/// Source of "today" for date windows and defaults.
pub type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// The diary query engine.
pub struct DiaryService<S: DiaryStore> {
    store: S,
    clock: Clock,
}

impl<S: DiaryStore> DiaryService<S> {
    /// Creates a service reading today's date from the local wall clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, || Local::now().date_naive())
    }

    /// Creates a service with an explicit source of today's date.
    pub fn with_clock<F>(store: S, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        DiaryService {
            store,
            clock: Box::new(clock),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}

/// Attaches the derived excerpt to a stored entry.
pub fn enrich(entry: DiaryEntry) -> EntryView {
    let excerpt = generate_excerpt(&entry.content, DEFAULT_EXCERPT_LENGTH);
    EntryView { entry, excerpt }
}

fn enrich_page(page: EntryPage, request: &PageRequest) -> Page<EntryView> {
    let data = page.entries.into_iter().map(enrich).collect();
    build_pagination_result(data, page.total, request)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::db::{Database, SqliteStore};

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    pub fn service() -> DiaryService<SqliteStore> {
        let db = Database::open_in_memory().unwrap();
        db.initialize_schema().unwrap();
        DiaryService::with_clock(SqliteStore::new(db), today)
    }
}
