//! Entry CRUD operations.
//!
//! This module provides functions for creating, reading, updating, deleting and
//! listing diary entries. Every function takes the owner id and filters on it;
//! an entry owned by someone else behaves exactly like a missing one.

use crate::diary_core::pagination::PageRequest;
use crate::errors::{AppResult, DatabaseError};
use crate::models::{DiaryEntry, EntryPatch, NewEntry};
use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

/// Column list shared by every entry query. Tags are folded into a JSON array
/// in insertion order so one row carries the whole entry.
pub(crate) const ENTRY_COLUMNS: &str = r#"
    e.id, e.owner_id, e.content, e.date, e.created_at, e.updated_at,
    (SELECT json_group_array(t.tag)
       FROM (SELECT tag FROM entry_tags WHERE entry_id = e.id ORDER BY position) t
    ) AS tags
"#;

/// A page of entries and the total number of matches across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPage {
    pub entries: Vec<DiaryEntry>,
    pub total: u64,
}

impl EntryPage {
    fn empty() -> Self {
        EntryPage {
            entries: Vec::new(),
            total: 0,
        }
    }
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Maps a row selected with [`ENTRY_COLUMNS`] to an entry.
pub(crate) fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<DiaryEntry> {
    let id: String = row.get(0)?;
    let date: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;
    let tags: String = row.get(6)?;

    Ok(DiaryEntry {
        id: Uuid::parse_str(&id).map_err(|e| conversion_error(0, e))?,
        owner_id: row.get(1)?,
        content: row.get(2)?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| conversion_error(3, e))?,
        tags: serde_json::from_str(&tags).map_err(|e| conversion_error(6, e))?,
        created_at: parse_timestamp(4, &created_at)?,
        updated_at: parse_timestamp(5, &updated_at)?,
    })
}

fn sql_limit(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn insert_tags(conn: &Connection, entry_id: &str, owner_id: &str, tags: &[String]) -> AppResult<()> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO entry_tags (entry_id, owner_id, tag, position) VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(DatabaseError::Sqlite)?;

    for (position, tag) in tags.iter().enumerate() {
        stmt.execute(params![entry_id, owner_id, tag, position as i64])
            .map_err(DatabaseError::Sqlite)?;
    }
    Ok(())
}

/// Inserts a new entry and its tags in one transaction.
///
/// The id is generated here; `created_at` and `updated_at` are both set to `now`.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_entry(
    conn: &mut Connection,
    new_entry: &NewEntry,
    now: DateTime<Utc>,
) -> AppResult<DiaryEntry> {
    let id = Uuid::new_v4();
    // Stored timestamps keep microseconds; match that in the returned value
    let now = now.trunc_subsecs(6);
    debug!(
        "Inserting entry {} for owner {} dated {}",
        id, new_entry.owner_id, new_entry.date
    );

    let id_str = id.to_string();
    let stamp = format_timestamp(now);
    let tx = conn.transaction().map_err(DatabaseError::Sqlite)?;

    tx.execute(
        r#"
        INSERT INTO entries (id, owner_id, content, date, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        "#,
        params![
            id_str,
            new_entry.owner_id,
            new_entry.content,
            new_entry.date.to_string(),
            stamp
        ],
    )
    .map_err(DatabaseError::Sqlite)?;

    insert_tags(&tx, &id_str, &new_entry.owner_id, &new_entry.tags)?;
    tx.commit().map_err(DatabaseError::Sqlite)?;

    Ok(DiaryEntry {
        id,
        owner_id: new_entry.owner_id.clone(),
        content: new_entry.content.clone(),
        date: new_entry.date,
        tags: new_entry.tags.clone(),
        created_at: now,
        updated_at: now,
    })
}

/// Retrieves an entry by id for the given owner.
///
/// # Errors
///
/// Returns an error if the database operation fails.
/// Returns `Ok(None)` if the entry doesn't exist or belongs to another owner.
pub fn get_entry(conn: &Connection, owner_id: &str, id: Uuid) -> AppResult<Option<DiaryEntry>> {
    debug!("Getting entry {} for owner {}", id, owner_id);

    let sql = format!(
        "SELECT {} FROM entries e WHERE e.id = ?1 AND e.owner_id = ?2",
        ENTRY_COLUMNS
    );
    let entry = conn
        .query_row(&sql, params![id.to_string(), owner_id], entry_from_row)
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    Ok(entry)
}

/// Lists an owner's entries, newest diary date first.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_entries(conn: &Connection, owner_id: &str, page: &PageRequest) -> AppResult<EntryPage> {
    debug!(
        "Listing entries for owner {} (page {}, limit {})",
        owner_id, page.page, page.limit
    );

    let total: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM entries WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;

    let sql = format!(
        r#"
        SELECT {}
        FROM entries e
        WHERE e.owner_id = ?1
        ORDER BY e.date DESC, e.created_at DESC, e.id DESC
        LIMIT ?2 OFFSET ?3
        "#,
        ENTRY_COLUMNS
    );
    let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let entries = stmt
        .query_map(
            params![owner_id, sql_limit(page.limit), sql_limit(page.skip)],
            entry_from_row,
        )
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    Ok(EntryPage {
        entries,
        total: total as u64,
    })
}

/// Lists an owner's entries carrying at least one of `tags`, newest first.
///
/// An empty tag list matches nothing.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_entries_by_tags(
    conn: &Connection,
    owner_id: &str,
    tags: &[String],
    page: &PageRequest,
) -> AppResult<EntryPage> {
    debug!("Listing entries for owner {} tagged {:?}", owner_id, tags);

    if tags.is_empty() {
        return Ok(EntryPage::empty());
    }

    // Tags are bound as one JSON array and expanded with json_each
    let tags_json = serde_json::Value::from(tags.to_vec()).to_string();
    let tag_filter = r#"
        EXISTS (
            SELECT 1 FROM entry_tags t
            WHERE t.entry_id = e.id
              AND t.owner_id = ?1
              AND t.tag IN (SELECT value FROM json_each(?2))
        )
    "#;

    let total: i64 = conn
        .query_row(
            &format!(
                "SELECT COUNT(*) FROM entries e WHERE e.owner_id = ?1 AND {}",
                tag_filter
            ),
            params![owner_id, tags_json],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;

    let sql = format!(
        r#"
        SELECT {}
        FROM entries e
        WHERE e.owner_id = ?1 AND {}
        ORDER BY e.date DESC, e.created_at DESC, e.id DESC
        LIMIT ?3 OFFSET ?4
        "#,
        ENTRY_COLUMNS, tag_filter
    );
    let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let entries = stmt
        .query_map(
            params![
                owner_id,
                tags_json,
                sql_limit(page.limit),
                sql_limit(page.skip)
            ],
            entry_from_row,
        )
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    Ok(EntryPage {
        entries,
        total: total as u64,
    })
}

/// Builds an FTS5 query from free text.
///
/// Each whitespace-separated term is quoted so that FTS5 operators in user
/// input are matched literally, and terms are OR-combined. Terms without any
/// alphanumeric character are dropped. Returns `None` when nothing is left.
pub fn build_fts_query(text: &str) -> Option<String> {
    let terms: Vec<String> = text
        .split_whitespace()
        .filter(|term| term.chars().any(char::is_alphanumeric))
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

/// Full-text search over an owner's entry content, most relevant first.
///
/// Relevance is BM25; equally relevant entries are ordered by date descending.
/// A blank query returns an empty page.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn search_entries(
    conn: &Connection,
    owner_id: &str,
    query: &str,
    page: &PageRequest,
) -> AppResult<EntryPage> {
    debug!("Searching entries for owner {}: {:?}", owner_id, query);

    let Some(fts_query) = build_fts_query(query) else {
        return Ok(EntryPage::empty());
    };

    let total: i64 = conn
        .query_row(
            r#"
            SELECT COUNT(*)
            FROM entries_fts
            JOIN entries e ON e.seq = entries_fts.rowid
            WHERE entries_fts MATCH ?1 AND e.owner_id = ?2
            "#,
            params![fts_query, owner_id],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Sqlite)?;

    let sql = format!(
        r#"
        SELECT {}
        FROM entries_fts
        JOIN entries e ON e.seq = entries_fts.rowid
        WHERE entries_fts MATCH ?1 AND e.owner_id = ?2
        ORDER BY bm25(entries_fts) ASC, e.date DESC, e.id DESC
        LIMIT ?3 OFFSET ?4
        "#,
        ENTRY_COLUMNS
    );
    let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let entries = stmt
        .query_map(
            params![
                fts_query,
                owner_id,
                sql_limit(page.limit),
                sql_limit(page.skip)
            ],
            entry_from_row,
        )
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    debug!("Search matched {} entries", total);
    Ok(EntryPage {
        entries,
        total: total as u64,
    })
}

/// Applies a merge-patch to an owner's entry and refreshes `updated_at`.
///
/// Supplied tags replace the stored tag set wholesale.
///
/// # Errors
///
/// Returns an error if the database operation fails.
/// Returns `Ok(None)` if the entry doesn't exist or belongs to another owner.
pub fn update_entry(
    conn: &mut Connection,
    owner_id: &str,
    id: Uuid,
    patch: &EntryPatch,
    now: DateTime<Utc>,
) -> AppResult<Option<DiaryEntry>> {
    debug!("Updating entry {} for owner {}", id, owner_id);

    let id_str = id.to_string();
    let tx = conn.transaction().map_err(DatabaseError::Sqlite)?;

    let rows_affected = tx
        .execute(
            r#"
            UPDATE entries SET
                content = COALESCE(?1, content),
                date = COALESCE(?2, date),
                updated_at = ?3
            WHERE id = ?4 AND owner_id = ?5
            "#,
            params![
                patch.content,
                patch.date.map(|d| d.to_string()),
                format_timestamp(now),
                id_str,
                owner_id
            ],
        )
        .map_err(DatabaseError::Sqlite)?;

    if rows_affected == 0 {
        debug!("Entry {} not found for owner {}", id, owner_id);
        return Ok(None);
    }

    if let Some(tags) = &patch.tags {
        tx.execute("DELETE FROM entry_tags WHERE entry_id = ?1", params![id_str])
            .map_err(DatabaseError::Sqlite)?;
        insert_tags(&tx, &id_str, owner_id, tags)?;
    }

    let entry = get_entry(&tx, owner_id, id)?;
    tx.commit().map_err(DatabaseError::Sqlite)?;

    Ok(entry)
}

/// Deletes an owner's entry. Returns `true` if a record was removed.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_entry(conn: &mut Connection, owner_id: &str, id: Uuid) -> AppResult<bool> {
    debug!("Deleting entry {} for owner {}", id, owner_id);

    let id_str = id.to_string();
    let tx = conn.transaction().map_err(DatabaseError::Sqlite)?;

    let rows_affected = tx
        .execute(
            "DELETE FROM entries WHERE id = ?1 AND owner_id = ?2",
            params![id_str, owner_id],
        )
        .map_err(DatabaseError::Sqlite)?;

    if rows_affected > 0 {
        tx.execute("DELETE FROM entry_tags WHERE entry_id = ?1", params![id_str])
            .map_err(DatabaseError::Sqlite)?;
    }
    tx.commit().map_err(DatabaseError::Sqlite)?;

    Ok(rows_affected > 0)
}
