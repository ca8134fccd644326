//! Entry lifecycle and listing operations.

use super::{enrich, enrich_page, DiaryService};
use crate::db::DiaryStore;
use crate::diary_core::pagination::{normalize_pagination, Page};
use crate::diary_core::text::{extract_tags, merge_tags, split_tag_list, validate_diary_date_on};
use crate::errors::{AppError, AppResult};
use crate::models::{EntryPatch, EntryView, NewEntry};
use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

impl<S: DiaryStore> DiaryService<S> {
    /// Creates an entry.
    ///
    /// Tags are the supplied ones followed by hashtags found in `content`,
    /// deduplicated with blanks removed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `content` is blank or `date` is more
    /// than a year away from today, or a database error if the insert fails.
    pub fn create_entry(
        &self,
        owner_id: &str,
        content: &str,
        date: NaiveDate,
        tags: &[String],
    ) -> AppResult<EntryView> {
        check_content(content)?;
        self.check_date(date)?;

        let tags = merge_tags(tags, &extract_tags(content));
        let entry = self.store.create(&NewEntry {
            owner_id: owner_id.to_string(),
            content: content.to_string(),
            date,
            tags,
        })?;

        info!("Created entry {} dated {}", entry.id, entry.date);
        Ok(enrich(entry))
    }

    /// Fetches one of the owner's entries.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry does not exist or belongs to
    /// another owner.
    pub fn get_entry(&self, owner_id: &str, id: Uuid) -> AppResult<EntryView> {
        self.store
            .find_by_id(owner_id, id)?
            .map(enrich)
            .ok_or_else(|| not_found(id))
    }

    /// Lists the owner's entries, newest date first.
    pub fn list_entries(
        &self,
        owner_id: &str,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<Page<EntryView>> {
        let request = normalize_pagination(page, limit);
        let found = self.store.list_by_owner(owner_id, &request)?;
        Ok(enrich_page(found, &request))
    }

    /// Full-text search over the owner's entries, most relevant first.
    pub fn search_entries(
        &self,
        owner_id: &str,
        query: &str,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<Page<EntryView>> {
        let request = normalize_pagination(page, limit);
        let found = self.store.search(owner_id, query, &request)?;
        debug!("Search {:?} matched {} entries", query, found.total);
        Ok(enrich_page(found, &request))
    }

    /// Lists entries carrying any tag from a comma-separated list.
    pub fn list_by_tags(
        &self,
        owner_id: &str,
        tags_csv: &str,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<Page<EntryView>> {
        let request = normalize_pagination(page, limit);
        let tags = split_tag_list(tags_csv);
        let found = self.store.list_by_tags(owner_id, &tags, &request)?;
        Ok(enrich_page(found, &request))
    }

    /// Applies a partial update.
    ///
    /// New content recomputes the tag set from scratch: the supplied tags (if
    /// any) merged with hashtags in the new content. The previous tags are
    /// discarded. Tags supplied without content replace the stored set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an out-of-window date and
    /// `AppError::NotFound` if the entry is not the owner's.
    pub fn update_entry(
        &self,
        owner_id: &str,
        id: Uuid,
        patch: EntryPatch,
    ) -> AppResult<EntryView> {
        if let Some(content) = &patch.content {
            check_content(content)?;
        }
        if let Some(date) = patch.date {
            self.check_date(date)?;
        }

        let tags = match (&patch.content, &patch.tags) {
            (Some(content), supplied) => Some(merge_tags(
                supplied.as_deref().unwrap_or_default(),
                &extract_tags(content),
            )),
            (None, Some(supplied)) => Some(merge_tags(supplied, &[])),
            (None, None) => None,
        };
        let patch = EntryPatch { tags, ..patch };

        if patch.is_empty() {
            debug!("Empty patch for entry {}; refreshing updatedAt only", id);
        }

        let entry = self
            .store
            .update(owner_id, id, &patch)?
            .ok_or_else(|| not_found(id))?;

        info!("Updated entry {}", entry.id);
        Ok(enrich(entry))
    }

    /// Permanently deletes an entry.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if nothing was deleted.
    pub fn delete_entry(&self, owner_id: &str, id: Uuid) -> AppResult<()> {
        if !self.store.delete(owner_id, id)? {
            return Err(not_found(id));
        }
        info!("Deleted entry {}", id);
        Ok(())
    }

    fn check_date(&self, date: NaiveDate) -> AppResult<()> {
        if validate_diary_date_on(date, self.today()) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Diary date {} must be within one year of today",
                date
            )))
        }
    }
}

fn check_content(content: &str) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::Validation(
            "Entry content cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Diary entry {} not found", id))
}
