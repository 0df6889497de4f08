//! CLI command tests
//!
//! This module contains tests for the CLI commands that work against the
//! local store; networked commands are covered by the core integration
//! suite through the mock gateway.

use ledge_core::db::Database;
use ledge_core::models::EntryFilter;

use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

// ========== Entry Command Tests ==========

#[test]
fn test_cmd_add_and_list() {
    let db = setup_test_db();

    let result = commands::cmd_add(
        &db,
        Some("2025-06-10"),
        "Street market",
        -52.40,
        "Food",
        "Checking",
    );
    assert!(result.is_ok());

    let entries = db.list_entries(&EntryFilter::default()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].description, "Street market");
    assert_eq!(entries[0].amount, -52.40);
    assert!(!entries[0].synced);

    let result = commands::cmd_list(&db, None, None, None, None, None);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_add_defaults_to_today() {
    let db = setup_test_db();

    commands::cmd_add(&db, None, "Coffee", -4.50, "Food", "Cash").unwrap();

    let entries = db.list_entries(&EntryFilter::default()).unwrap();
    assert_eq!(entries[0].occurred_on, chrono::Local::now().date_naive());
}

#[test]
fn test_cmd_add_rejects_bad_date() {
    let db = setup_test_db();

    let result = commands::cmd_add(&db, Some("10/06/2025"), "Coffee", -4.50, "Food", "Cash");
    assert!(result.is_err());
    assert!(db.list_entries(&EntryFilter::default()).unwrap().is_empty());
}

#[test]
fn test_cmd_edit_updates_and_marks_unsynced() {
    let db = setup_test_db();
    commands::cmd_add(&db, Some("2025-06-10"), "Dinner", -40.0, "Food", "Checking").unwrap();
    let id = db.list_entries(&EntryFilter::default()).unwrap()[0].local_id;

    // pretend the entry was synced, then edit it
    db.confirm_pushed(id, 7).unwrap();

    commands::cmd_edit(&db, id, None, None, Some(-50.0), None, None).unwrap();

    let entry = db.get_entry(id).unwrap().unwrap();
    assert_eq!(entry.amount, -50.0);
    assert_eq!(entry.description, "Dinner");
    assert!(!entry.synced, "an edit must make the entry pending again");
}

#[test]
fn test_cmd_edit_missing_entry_fails() {
    let db = setup_test_db();
    let result = commands::cmd_edit(&db, 42, None, Some("ghost"), None, None, None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_rm_local_only_entry_disappears() {
    let db = setup_test_db();
    commands::cmd_add(&db, Some("2025-06-10"), "Typo", -1.0, "Food", "Cash").unwrap();
    let id = db.list_entries(&EntryFilter::default()).unwrap()[0].local_id;

    commands::cmd_rm(&db, id).unwrap();

    assert!(db.get_entry(id).unwrap().is_none());
    assert!(db.pending_deletions().unwrap().is_empty());
}

#[test]
fn test_cmd_rm_synced_entry_is_queued_for_deletion() {
    let db = setup_test_db();
    commands::cmd_add(&db, Some("2025-06-10"), "Dinner", -40.0, "Food", "Checking").unwrap();
    let id = db.list_entries(&EntryFilter::default()).unwrap()[0].local_id;
    db.confirm_pushed(id, 7).unwrap();

    commands::cmd_rm(&db, id).unwrap();

    let deletions = db.pending_deletions().unwrap();
    assert_eq!(deletions.len(), 1);
    assert_eq!(deletions[0].remote_id, Some(7));
    // gone from the visible ledger immediately
    assert!(db.list_entries(&EntryFilter::default()).unwrap().is_empty());
}

#[test]
fn test_cmd_list_with_filters() {
    let db = setup_test_db();
    commands::cmd_add(&db, Some("2025-06-10"), "Street market", -30.0, "Food", "Cash").unwrap();
    commands::cmd_add(&db, Some("2025-06-15"), "Bus pass", -10.0, "Transport", "Cash").unwrap();

    let result = commands::cmd_list(&db, Some("market"), None, None, None, None);
    assert!(result.is_ok());

    let result = commands::cmd_list(&db, None, Some("2025-06-01"), Some("2025-06-30"), None, None);
    assert!(result.is_ok());

    let result = commands::cmd_list(&db, None, Some("not-a-date"), None, None, None);
    assert!(result.is_err());
}

// ========== Helper Tests ==========

#[test]
fn test_parse_date() {
    assert!(commands::parse_date("2025-06-10").is_ok());
    assert!(commands::parse_date("2025-13-01").is_err());
    assert!(commands::parse_date("junk").is_err());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long description", 10), "a very ...");
}
