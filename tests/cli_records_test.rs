//! Integration tests for links, calendar events and goals.

mod common;

use common::TestEnv;
use predicates::prelude::*;

// === Links ===

#[test]
fn test_link_add_list_delete() {
    let env = TestEnv::new();

    let created = env.json(&["link", "add", "Rust", "https://www.rust-lang.org", "-d", "home"]);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("lnk-"));
    assert_eq!(created["description"], "home");
    assert!(created["createdAt"].as_str().unwrap().ends_with('Z'));

    let listed = env.json(&["link", "list"]);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["items"][0]["url"], "https://www.rust-lang.org");

    let deleted = env.json(&["link", "delete", &id]);
    assert_eq!(deleted["changed"], true);
    assert_eq!(env.json(&["link", "list"])["count"], 0);

    // The file holds an empty array, never null
    assert_eq!(env.read_document("links_data.json"), serde_json::json!([]));
}

#[test]
fn test_link_update_unknown_id_is_noop() {
    let env = TestEnv::new();

    let result = env.json(&["link", "update", "lnk-none", "--title", "x"]);
    assert_eq!(result["changed"], false);
    assert!(!env.init_path().join("links_data.json").exists());
}

#[test]
fn test_link_list_human() {
    let env = TestEnv::new();
    env.org()
        .args(["link", "add", "Docs", "https://docs.rs", "--id", "l1"])
        .assert()
        .success();

    env.org()
        .args(["-H", "link", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 link:"))
        .stdout(predicate::str::contains("[l1] Docs <https://docs.rs>"));
}

#[test]
fn test_malformed_document_lists_empty_with_warning() {
    let env = TestEnv::new();
    env.write_document("links_data.json", "{oops");

    let listed = env.json(&["link", "list"]);
    assert_eq!(listed["count"], 0);
    assert!(listed["warning"].as_str().unwrap().contains("links_data.json"));

    // Mutations refuse to overwrite the damaged file
    env.org()
        .args(["link", "add", "x", "https://x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed document"));
    assert_eq!(
        std::fs::read_to_string(env.init_path().join("links_data.json")).unwrap(),
        "{oops"
    );
}

// === Events ===

#[test]
fn test_event_add_and_filter_by_date() {
    let env = TestEnv::new();
    env.org()
        .args(["event", "add", "Dentist", "2024-03-01", "09:30", "--color", "#22c55e"])
        .assert()
        .success();
    env.org()
        .args(["event", "add", "Review", "2024-03-02", "14:00"])
        .assert()
        .success();

    let day = env.json(&["event", "list", "--date", "2024-03-01"]);
    assert_eq!(day["count"], 1);
    assert_eq!(day["items"][0]["title"], "Dentist");
    assert_eq!(day["items"][0]["color"], "#22c55e");

    let stored = env.read_document("calendario_data.json");
    assert_eq!(stored.as_array().unwrap().len(), 2);
}

#[test]
fn test_event_rejects_bad_date() {
    let env = TestEnv::new();
    env.org()
        .args(["event", "add", "x", "01/03/2024", "09:30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

// === Goals ===

#[test]
fn test_goal_scenario() {
    let env = TestEnv::new();

    let created = env.json(&["goal", "add", "Read", "--id", "g1"]);
    assert_eq!(created["progress"], 0.0);
    assert_eq!(created["done"], false);

    let listed = env.json(&["goal", "list"]);
    assert_eq!(listed["items"], serde_json::json!([created]));

    env.json(&["goal", "delete", "g1"]);
    assert_eq!(env.json(&["goal", "list"])["items"], serde_json::json!([]));
}

#[test]
fn test_goal_update_progress() {
    let env = TestEnv::new();
    env.json(&["goal", "add", "Run", "--id", "g1", "--deadline", "2024-12-31"]);

    let result = env.json(&["goal", "update", "g1", "--progress", "75", "--done", "true"]);
    assert_eq!(result["changed"], true);

    let stored = env.read_document("objetivos_data.json");
    assert_eq!(stored[0]["progress"], 75.0);
    assert_eq!(stored[0]["done"], true);
    assert_eq!(stored[0]["deadline"], "2024-12-31");
}

#[test]
fn test_goal_progress_out_of_range() {
    let env = TestEnv::new();
    env.org()
        .args(["goal", "add", "x", "--progress", "120"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 100"));
}
