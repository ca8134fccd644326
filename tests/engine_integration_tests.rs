//! Integration tests for the diary engine over a file-backed database.
//!
//! These tests drive `DiaryService` end to end: tag derivation, excerpts,
//! owner scoping, update semantics and the aggregation queries.

use chrono::{Local, Months, NaiveDate};
use daybook::db::{Database, DiaryStore, SqliteStore};
use daybook::diary_core::dates::Granularity;
use daybook::diary_core::text::validate_diary_date;
use daybook::errors::AppError;
use daybook::models::{EntryPatch, NewEntry};
use daybook::ops::DiaryService;
use std::collections::HashSet;
use tempfile::TempDir;

const OWNER: &str = "alice";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Opens a fresh database in a temp dir; the service believes today is `today`.
fn setup(today: NaiveDate) -> (TempDir, DiaryService<SqliteStore>) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let db = Database::open(&temp_dir.path().join("daybook.db")).expect("open database");
    db.initialize_schema().expect("initialize schema");
    let service = DiaryService::with_clock(SqliteStore::new(db), move || today);
    (temp_dir, service)
}

#[test]
fn test_create_derives_tags_and_excerpt() {
    let (_dir, service) = setup(date(2025, 3, 15));

    let created = service
        .create_entry(
            OWNER,
            "Went hiking #outdoors #fitness",
            date(2025, 3, 14),
            &["health".to_string()],
        )
        .unwrap();

    let tags: HashSet<_> = created.entry.tags.iter().map(String::as_str).collect();
    assert_eq!(tags, HashSet::from(["health", "outdoors", "fitness"]));

    let fetched = service.get_entry(OWNER, created.entry.id).unwrap();
    assert_eq!(fetched.entry.tags.len(), 3);
    assert!(fetched.excerpt.chars().count() <= 150 + 3);
    assert_eq!(fetched.excerpt, "Went hiking #outdoors #fitness");
}

#[test]
fn test_long_content_gets_truncated_excerpt() {
    let (_dir, service) = setup(date(2025, 3, 15));
    let content = "a long day of walking and thinking ".repeat(20);

    let created = service
        .create_entry(OWNER, &content, date(2025, 3, 15), &[])
        .unwrap();

    let fetched = service.get_entry(OWNER, created.entry.id).unwrap();
    assert!(fetched.excerpt.ends_with("..."));
    assert!(fetched.excerpt.chars().count() <= 153);
    assert_eq!(fetched.entry.content, content);
}

#[test]
fn test_date_window_against_wall_clock() {
    let today = Local::now().date_naive();
    let two_years_ago = today.checked_sub_months(Months::new(24)).unwrap();
    let six_months_ahead = today.checked_add_months(Months::new(6)).unwrap();

    assert!(!validate_diary_date(two_years_ago));
    assert!(validate_diary_date(six_months_ahead));
}

#[test]
fn test_create_rejects_out_of_window_dates() {
    let (_dir, service) = setup(date(2025, 3, 15));

    let result = service.create_entry(OWNER, "too old", date(2023, 3, 14), &[]);
    assert!(matches!(result, Err(AppError::Validation(_))));

    let edge = service.create_entry(OWNER, "just in", date(2024, 3, 15), &[]);
    assert!(edge.is_ok());
}

#[test]
fn test_on_this_day_groups_previous_years() {
    let (_dir, service) = setup(date(2025, 3, 15));
    service.create_entry(OWNER, "2024 entry", date(2024, 3, 15), &[]).unwrap();
    service.create_entry(OWNER, "2025 entry", date(2025, 3, 15), &[]).unwrap();
    service.create_entry(OWNER, "next day", date(2024, 3, 16), &[]).unwrap();
    service.create_entry("bob", "bob's 2024", date(2024, 3, 15), &[]).unwrap();

    // 2023 lies outside the service's window, so write it through the store
    service
        .store()
        .create(&NewEntry {
            owner_id: OWNER.to_string(),
            content: "2023 entry".to_string(),
            date: date(2023, 3, 15),
            tags: vec![],
        })
        .unwrap();

    let groups = service.get_on_this_day(OWNER, Some(date(2025, 3, 15))).unwrap();
    let years: Vec<i32> = groups.iter().map(|g| g.year).collect();
    assert_eq!(years, vec![2024, 2023]);
    assert_eq!(groups[0].entries.len(), 1);
    assert_eq!(groups[0].entries[0].content, "2024 entry");
    assert_eq!(groups[1].entries[0].content, "2023 entry");
}

#[test]
fn test_writing_frequency_daily_buckets() {
    let (_dir, service) = setup(date(2025, 3, 15));
    service.create_entry(OWNER, "one", date(2025, 1, 5), &[]).unwrap();
    service.create_entry(OWNER, "two", date(2025, 1, 5), &[]).unwrap();
    service.create_entry(OWNER, "three", date(2025, 1, 20), &[]).unwrap();
    service.create_entry(OWNER, "outside", date(2025, 2, 1), &[]).unwrap();

    let buckets = service
        .get_writing_frequency(
            OWNER,
            Some(date(2025, 1, 1)),
            Some(date(2025, 1, 31)),
            Some(Granularity::Daily),
        )
        .unwrap();

    let summary: Vec<(&str, u64)> = buckets.iter().map(|b| (b.key.as_str(), b.count)).collect();
    assert_eq!(summary, vec![("2025-01-05", 2), ("2025-01-20", 1)]);
    assert_eq!(buckets[0].entries.len(), 2);
}

#[test]
fn test_update_content_discards_previous_tags() {
    let (_dir, service) = setup(date(2025, 3, 15));
    let created = service
        .create_entry(OWNER, "Gym session #fitness", date(2025, 3, 15), &["health".to_string()])
        .unwrap();

    let updated = service
        .update_entry(
            OWNER,
            created.entry.id,
            EntryPatch {
                content: Some("Read a novel #books".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.entry.tags, vec!["books".to_string()]);
    assert!(!updated.entry.tags.contains(&"health".to_string()));
    assert!(!updated.entry.tags.contains(&"fitness".to_string()));

    let tags = service.get_distinct_tags(OWNER).unwrap();
    assert_eq!(tags, vec!["books".to_string()]);
}

#[test]
fn test_update_date_only_keeps_tags() {
    let (_dir, service) = setup(date(2025, 3, 15));
    let created = service
        .create_entry(OWNER, "Gym session #fitness", date(2025, 3, 15), &[])
        .unwrap();

    let updated = service
        .update_entry(
            OWNER,
            created.entry.id,
            EntryPatch {
                date: Some(date(2025, 3, 10)),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.entry.date, date(2025, 3, 10));
    assert_eq!(updated.entry.tags, vec!["fitness".to_string()]);
    assert_eq!(updated.entry.created_at, created.entry.created_at);
}

#[test]
fn test_delete_is_owner_scoped_and_final() {
    let (_dir, service) = setup(date(2025, 3, 15));
    let created = service
        .create_entry(OWNER, "delete me", date(2025, 3, 15), &[])
        .unwrap();
    let id = created.entry.id;

    assert!(matches!(
        service.delete_entry("bob", id),
        Err(AppError::NotFound(_))
    ));
    assert!(service.get_entry(OWNER, id).is_ok());

    service.delete_entry(OWNER, id).unwrap();
    assert!(matches!(
        service.get_entry(OWNER, id),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_search_ranks_and_scopes() {
    let (_dir, service) = setup(date(2025, 3, 15));
    service
        .create_entry(OWNER, "garden garden garden, the garden again", date(2025, 3, 1), &[])
        .unwrap();
    service
        .create_entry(OWNER, "a quick note about the garden and other things", date(2025, 3, 2), &[])
        .unwrap();
    service
        .create_entry("bob", "my garden", date(2025, 3, 3), &[])
        .unwrap();

    let page = service.search_entries(OWNER, "garden", None, None).unwrap();
    assert_eq!(page.total, 2);
    assert!(page.data[0].entry.content.starts_with("garden garden"));
    assert!(page.data.iter().all(|v| v.entry.owner_id == OWNER));
}

#[test]
fn test_pagination_across_store() {
    let (_dir, service) = setup(date(2025, 3, 15));
    for day in 1..=12 {
        service
            .create_entry(OWNER, &format!("day {} #daily", day), date(2025, 3, day), &[])
            .unwrap();
    }

    let first = service.list_entries(OWNER, None, None).unwrap();
    assert_eq!(first.total, 12);
    assert_eq!(first.limit, 10);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.data[0].entry.date, date(2025, 3, 12));

    let second = service.list_by_tags(OWNER, "daily", Some(2), Some(10)).unwrap();
    assert_eq!(second.data.len(), 2);
    assert!(second.has_prev);
    assert!(!second.has_next);
    assert_eq!(second.data[1].entry.date, date(2025, 3, 1));

    let clamped = service.list_entries(OWNER, Some(-5), Some(1000)).unwrap();
    assert_eq!(clamped.page, 1);
    assert_eq!(clamped.limit, 100);
    assert_eq!(clamped.data.len(), 12);
}
