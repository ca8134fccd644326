//! Read-only aggregations over an owner's entries.
//!
//! Tag statistics and distinct tags are grouped in SQL. Writing frequency and
//! on-this-day select the matching rows in SQL and group them here, because
//! their bucket keys come from `diary_core::dates`.

use crate::db::entries::{entry_from_row, ENTRY_COLUMNS};
use crate::diary_core::dates::{bucket_key, is_same_month_day, month_day, Granularity};
use crate::errors::{AppResult, DatabaseError};
use crate::models::{DiaryEntry, EntrySummary, FrequencyBucket, TagStat, YearGroup};
use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection, Params};
use std::collections::BTreeMap;
use tracing::debug;

fn query_entries<P: Params>(conn: &Connection, sql: &str, params: P) -> AppResult<Vec<DiaryEntry>> {
    let mut stmt = conn.prepare(sql).map_err(DatabaseError::Sqlite)?;
    let entries = stmt
        .query_map(params, entry_from_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(entries)
}

/// Every tag the owner has used, sorted ascending.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn distinct_tags(conn: &Connection, owner_id: &str) -> AppResult<Vec<String>> {
    debug!("Listing distinct tags for owner {}", owner_id);

    let mut stmt = conn
        .prepare("SELECT DISTINCT tag FROM entry_tags WHERE owner_id = ?1 ORDER BY tag ASC")
        .map_err(DatabaseError::Sqlite)?;
    let tags = stmt
        .query_map(params![owner_id], |row| row.get(0))
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<String>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    Ok(tags)
}

/// Per-tag usage count and most recent diary date, most used first.
///
/// Tags with equal counts are ordered alphabetically.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn tag_stats(conn: &Connection, owner_id: &str) -> AppResult<Vec<TagStat>> {
    debug!("Computing tag stats for owner {}", owner_id);

    let mut stmt = conn
        .prepare(
            r#"
            SELECT t.tag, COUNT(*) AS uses, MAX(e.date) AS last_used
            FROM entry_tags t
            JOIN entries e ON e.id = t.entry_id
            WHERE t.owner_id = ?1 AND e.owner_id = ?1
            GROUP BY t.tag
            ORDER BY uses DESC, t.tag ASC
            "#,
        )
        .map_err(DatabaseError::Sqlite)?;

    let stats = stmt
        .query_map(params![owner_id], |row| {
            let last_used: String = row.get(2)?;
            Ok(TagStat {
                tag: row.get(0)?,
                count: row.get::<_, i64>(1)? as u64,
                last_used: NaiveDate::parse_from_str(&last_used, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?,
            })
        })
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    Ok(stats)
}

/// Entries dated within `[start, end]`, grouped into time buckets.
///
/// Buckets are sorted ascending by key; entries inside a bucket are in date
/// order. An inverted range yields no buckets.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn writing_frequency(
    conn: &Connection,
    owner_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    granularity: Granularity,
) -> AppResult<Vec<FrequencyBucket>> {
    debug!(
        "Computing {} writing frequency for owner {} from {} to {}",
        granularity, owner_id, start, end
    );

    let sql = format!(
        r#"
        SELECT {}
        FROM entries e
        WHERE e.owner_id = ?1 AND e.date >= ?2 AND e.date <= ?3
        ORDER BY e.date ASC, e.created_at ASC, e.id ASC
        "#,
        ENTRY_COLUMNS
    );
    let entries = query_entries(
        conn,
        &sql,
        params![owner_id, start.to_string(), end.to_string()],
    )?;

    let mut buckets: BTreeMap<String, FrequencyBucket> = BTreeMap::new();
    for entry in entries {
        let key = bucket_key(entry.date, granularity);
        let bucket = buckets
            .entry(key.clone())
            .or_insert_with(|| FrequencyBucket {
                key,
                count: 0,
                entries: Vec::new(),
            });
        bucket.count += 1;
        bucket.entries.push(entry.into());
    }

    debug!("Writing frequency produced {} buckets", buckets.len());
    Ok(buckets.into_values().collect())
}

/// Entries from other years sharing `target`'s month and day, newest year first.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn on_this_day(conn: &Connection, owner_id: &str, target: NaiveDate) -> AppResult<Vec<YearGroup>> {
    let md = month_day(target);
    debug!(
        "Finding on-this-day entries for owner {} ({:02}-{:02}, excluding {})",
        owner_id,
        md.month,
        md.day,
        target.year()
    );

    let sql = format!(
        r#"
        SELECT {}
        FROM entries e
        WHERE e.owner_id = ?1
          AND strftime('%m', e.date) = ?2
          AND strftime('%d', e.date) = ?3
          AND strftime('%Y', e.date) <> ?4
        ORDER BY e.date DESC, e.created_at DESC, e.id DESC
        "#,
        ENTRY_COLUMNS
    );
    let month = format!("{:02}", md.month);
    let day = format!("{:02}", md.day);
    let year = format!("{:04}", target.year());
    let entries = query_entries(conn, &sql, params![owner_id, month, day, year])?;

    let mut groups: Vec<YearGroup> = Vec::new();
    for entry in entries
        .into_iter()
        .filter(|e| is_same_month_day(e.date, target) && e.date.year() != target.year())
    {
        let year = entry.date.year();
        match groups.last_mut() {
            Some(group) if group.year == year => group.entries.push(EntrySummary::from(entry)),
            _ => groups.push(YearGroup {
                year,
                entries: vec![EntrySummary::from(entry)],
            }),
        }
    }

    debug!("On-this-day found {} earlier years", groups.len());
    Ok(groups)
}
