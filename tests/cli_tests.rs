
use predicates::prelude::*;
use tempfile::TempDir;
use test_helpers::{base_daybook_command, run_json};

fn create_entry(temp: &TempDir, content: &str, tags: &[&str]) -> String {
    let db_path = temp.path().join("daybook.db");
    let mut cmd = base_daybook_command(&db_path);
    cmd.arg("new").arg(content);
    for tag in tags {
        cmd.arg("--tag").arg(tag);
    }
    let created = run_json(&mut cmd);
    created["id"].as_str().expect("id is a string").to_string()
}

#[test]
fn test_cli_new_and_show() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");

    let id = create_entry(&temp, "Went hiking #outdoors #fitness", &["health"]);

    let shown = run_json(base_daybook_command(&db_path).args(["show", &id]));
    assert_eq!(shown["id"], id.as_str());
    assert_eq!(shown["ownerId"], "alice");
    assert_eq!(shown["content"], "Went hiking #outdoors #fitness");
    assert_eq!(
        shown["tags"],
        serde_json::json!(["health", "outdoors", "fitness"])
    );
    assert_eq!(shown["excerpt"], "Went hiking #outdoors #fitness");
}

#[test]
fn test_cli_creates_database_directory() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("nested").join("daybook.db");

    base_daybook_command(&db_path)
        .args(["new", "first page"])
        .assert()
        .success();
    assert!(db_path.exists());
}

#[test]
fn test_cli_list_envelope() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");
    for n in 0..3 {
        create_entry(&temp, &format!("entry number {}", n), &[]);
    }

    let page = run_json(base_daybook_command(&db_path).args(["list", "--limit", "2"]));
    assert_eq!(page["total"], 3);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["hasNext"], true);
    assert_eq!(page["hasPrev"], false);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_entries_are_scoped_to_user() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");
    let id = create_entry(&temp, "private thoughts", &[]);

    base_daybook_command(&db_path)
        .args(["--user", "bob", "show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));

    let page = run_json(base_daybook_command(&db_path).args(["list", "--user", "bob"]));
    assert_eq!(page["total"], 0);
}

#[test]
fn test_cli_edit_replaces_tags() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");
    let id = create_entry(&temp, "Morning #run", &["sport"]);

    let edited = run_json(base_daybook_command(&db_path).args([
        "edit",
        &id,
        "--content",
        "Quiet evening #reading",
    ]));
    assert_eq!(edited["content"], "Quiet evening #reading");
    assert_eq!(edited["tags"], serde_json::json!(["reading"]));
}

#[test]
fn test_cli_delete_then_show_fails() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");
    let id = create_entry(&temp, "short lived", &[]);

    let deleted = run_json(base_daybook_command(&db_path).args(["delete", &id]));
    assert_eq!(deleted["deleted"], id.as_str());

    base_daybook_command(&db_path)
        .args(["show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));

    base_daybook_command(&db_path)
        .args(["delete", &id])
        .assert()
        .failure();
}

#[test]
fn test_cli_search_and_tags() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");
    create_entry(&temp, "walked along the river #walk", &[]);
    create_entry(&temp, "baked sourdough #food", &[]);
    create_entry(&temp, "river picnic #food", &[]);

    let found = run_json(base_daybook_command(&db_path).args(["search", "river"]));
    assert_eq!(found["total"], 2);

    let tags = run_json(base_daybook_command(&db_path).arg("tags"));
    assert_eq!(tags, serde_json::json!(["food", "walk"]));

    let tagged = run_json(base_daybook_command(&db_path).args(["tagged", "walk, nope"]));
    assert_eq!(tagged["total"], 1);

    let stats = run_json(base_daybook_command(&db_path).arg("tag-stats"));
    assert_eq!(stats[0]["tag"], "food");
    assert_eq!(stats[0]["count"], 2);
    assert!(stats[0]["lastUsed"].is_string());
}

#[test]
fn test_cli_frequency_and_on_this_day() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");
    create_entry(&temp, "today", &[]);

    let buckets = run_json(
        base_daybook_command(&db_path).args(["frequency", "--granularity", "monthly"]),
    );
    assert_eq!(buckets.as_array().unwrap().len(), 1);
    assert_eq!(buckets[0]["count"], 1);

    let groups = run_json(base_daybook_command(&db_path).arg("on-this-day"));
    assert_eq!(groups, serde_json::json!([]));
}

#[test]
fn test_cli_invalid_date() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");

    base_daybook_command(&db_path)
        .args(["new", "text", "--date", "not-a-date"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_cli_date_outside_window() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");

    base_daybook_command(&db_path)
        .args(["new", "ancient history", "--date", "19990101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_cli_invalid_id_and_granularity() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");

    base_daybook_command(&db_path)
        .args(["show", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid entry id"));

    base_daybook_command(&db_path)
        .args(["frequency", "--granularity", "hourly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_cli_json_logs() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");

    base_daybook_command(&db_path)
        .env("DAYBOOK_LOG_FORMAT", "json")
        .env("DAYBOOK_LOG_LEVEL", "info")
        .args(["new", "logged"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\"level\":\"INFO\""));
}

#[test]
fn test_cli_failure_reported_once() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");
    let missing = "00000000-0000-4000-8000-000000000000";

    for format in ["text", "json"] {
        let output = base_daybook_command(&db_path)
            .env("DAYBOOK_LOG_FORMAT", format)
            .env("DAYBOOK_LOG_LEVEL", "info")
            .args(["show", missing])
            .assert()
            .failure()
            .get_output()
            .stderr
            .clone();

        let stderr = String::from_utf8_lossy(&output);
        assert_eq!(stderr.matches("Not found").count(), 1, "{}", stderr);
        assert_eq!(stderr.matches("Error: ").count(), 1, "{}", stderr);
    }
}

#[test]
fn test_cli_config_failure_reported_once() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");

    let output = base_daybook_command(&db_path)
        .env("DAYBOOK_LOG_FORMAT", "xml")
        .arg("tags")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    let stderr = String::from_utf8_lossy(&output);
    assert_eq!(stderr.matches("Configuration error").count(), 1, "{}", stderr);
}

#[test]
fn test_cli_unknown_log_format() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");

    base_daybook_command(&db_path)
        .env("DAYBOOK_LOG_FORMAT", "xml")
        .arg("tags")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_cli_help() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("daybook.db");

    base_daybook_command(&db_path)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("on-this-day"));
}
