//! Read-only aggregations over an owner's diary.

use super::DiaryService;
use crate::db::DiaryStore;
use crate::diary_core::dates::Granularity;
use crate::errors::AppResult;
use crate::models::{FrequencyBucket, TagStat, YearGroup};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

impl<S: DiaryStore> DiaryService<S> {
    /// Every tag the owner has used, sorted ascending.
    pub fn get_distinct_tags(&self, owner_id: &str) -> AppResult<Vec<String>> {
        self.store.distinct_tags(owner_id)
    }

    /// Per-tag usage counts and last-used dates, most used first.
    pub fn get_tag_stats(&self, owner_id: &str) -> AppResult<Vec<TagStat>> {
        self.store.tag_stats(owner_id)
    }

    /// Entry counts grouped into daily, weekly or monthly buckets.
    ///
    /// `start` defaults to January 1st of the current year, `end` to today
    /// and `granularity` to daily.
    pub fn get_writing_frequency(
        &self,
        owner_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        granularity: Option<Granularity>,
    ) -> AppResult<Vec<FrequencyBucket>> {
        let today = self.today();
        let start = start.unwrap_or_else(|| today.with_ordinal(1).unwrap_or(today));
        let end = end.unwrap_or(today);
        let granularity = granularity.unwrap_or_default();

        debug!(
            "Writing frequency for {} from {} to {} ({})",
            owner_id, start, end, granularity
        );
        self.store
            .writing_frequency(owner_id, start, end, granularity)
    }

    /// Entries from other years written on the same month and day as `date`
    /// (today when absent), grouped by year, newest first.
    pub fn get_on_this_day(
        &self,
        owner_id: &str,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<YearGroup>> {
        let target = date.unwrap_or_else(|| self.today());
        self.store.on_this_day(owner_id, target)
    }
}
