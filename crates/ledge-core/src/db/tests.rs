//! Database tests

use super::*;
use crate::models::{Entry, EntryFilter};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn local_entry(day: u32, description: &str, amount: f64) -> Entry {
    Entry::new_local(date(2025, 6, day), description, amount, "Food", "Checking")
}

#[test]
fn test_open_empty() {
    let db = Database::in_memory().unwrap();
    let entries = db.list_entries(&EntryFilter::default()).unwrap();
    assert!(entries.is_empty());
    assert_eq!(db.count_active().unwrap(), 0);
}

#[test]
fn test_insert_and_get() {
    let db = Database::in_memory().unwrap();

    let id = db.insert_entry(&local_entry(10, "Groceries", -52.4)).unwrap();
    assert!(id > 0);

    let entry = db.get_entry(id).unwrap().unwrap();
    assert_eq!(entry.local_id, id);
    assert_eq!(entry.description, "Groceries");
    assert_eq!(entry.occurred_on, date(2025, 6, 10));
    assert!(!entry.synced);
    assert!(entry.remote_id.is_none());
}

#[test]
fn test_local_keys_are_monotonic() {
    let db = Database::in_memory().unwrap();

    let a = db.insert_entry(&local_entry(1, "a", -1.0)).unwrap();
    let b = db.insert_entry(&local_entry(2, "b", -2.0)).unwrap();
    db.delete_local(b).unwrap();
    let c = db.insert_entry(&local_entry(3, "c", -3.0)).unwrap();

    // AUTOINCREMENT never hands a deleted key back out
    assert!(b > a);
    assert!(c > b);
}

#[test]
fn test_listing_order_newest_first() {
    let db = Database::in_memory().unwrap();

    let older = db.insert_entry(&local_entry(5, "older", -1.0)).unwrap();
    let first_today = db.insert_entry(&local_entry(12, "first today", -2.0)).unwrap();
    let second_today = db.insert_entry(&local_entry(12, "second today", -3.0)).unwrap();

    let entries = db.list_entries(&EntryFilter::default()).unwrap();
    let ids: Vec<i64> = entries.iter().map(|e| e.local_id).collect();
    // date descending, then local key descending for same-day entries
    assert_eq!(ids, vec![second_today, first_today, older]);
}

#[test]
fn test_list_filters() {
    let db = Database::in_memory().unwrap();

    db.insert_entry(&Entry::new_local(date(2025, 6, 1), "Street market", -30.0, "Food", "Cash"))
        .unwrap();
    db.insert_entry(&Entry::new_local(date(2025, 6, 15), "Bus pass", -10.0, "Transport", "Cash"))
        .unwrap();
    db.insert_entry(&Entry::new_local(date(2025, 7, 1), "Salary", 2500.0, "Income", "Checking"))
        .unwrap();

    let by_search = db
        .list_entries(&EntryFilter {
            search: Some("MARKET".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_search.len(), 1);
    assert_eq!(by_search[0].description, "Street market");

    let by_account = db
        .list_entries(&EntryFilter {
            account: Some("Cash".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_account.len(), 2);

    let by_range = db
        .list_entries(&EntryFilter {
            from: Some(date(2025, 6, 10)),
            to: Some(date(2025, 6, 30)),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_range.len(), 1);
    assert_eq!(by_range[0].description, "Bus pass");
}

#[test]
fn test_pending_queries_split_by_flags() {
    let db = Database::in_memory().unwrap();

    // unsynced local create
    let created = db.insert_entry(&local_entry(1, "created", -1.0)).unwrap();

    // synced server copy
    let mut pulled = local_entry(2, "pulled", -2.0);
    pulled.remote_id = Some(40);
    pulled.synced = true;
    db.insert_entry(&pulled).unwrap();

    // tombstone with a remote key
    let mut doomed = local_entry(3, "doomed", -3.0);
    doomed.remote_id = Some(41);
    doomed.synced = true;
    let doomed_id = db.insert_entry(&doomed).unwrap();
    db.delete_entry(doomed_id).unwrap();

    let unsynced = db.unsynced_entries().unwrap();
    assert_eq!(unsynced.len(), 1);
    assert_eq!(unsynced[0].local_id, created);

    let deletions = db.pending_deletions().unwrap();
    assert_eq!(deletions.len(), 1);
    assert_eq!(deletions[0].remote_id, Some(41));

    // tombstoned rows never show up in listings
    let listed = db.list_entries(&EntryFilter::default()).unwrap();
    assert_eq!(listed.len(), 2);
}

#[test]
fn test_delete_entry_unconfirmed_is_hard_delete() {
    let db = Database::in_memory().unwrap();

    let id = db.insert_entry(&local_entry(1, "never pushed", -5.0)).unwrap();
    db.delete_entry(id).unwrap();

    assert!(db.get_entry(id).unwrap().is_none());
    assert!(db.pending_deletions().unwrap().is_empty());
}

#[test]
fn test_delete_entry_confirmed_is_tombstone() {
    let db = Database::in_memory().unwrap();

    let id = db.insert_entry(&local_entry(1, "pushed", -5.0)).unwrap();
    db.confirm_pushed(id, 9).unwrap();
    db.delete_entry(id).unwrap();

    let entry = db.get_entry(id).unwrap().unwrap();
    assert!(entry.deleted);
    assert!(!entry.synced);
    assert_eq!(entry.remote_id, Some(9));
}

#[test]
fn test_confirm_pushed_sets_flags() {
    let db = Database::in_memory().unwrap();

    let id = db.insert_entry(&local_entry(1, "out", -5.0)).unwrap();
    db.confirm_pushed(id, 77).unwrap();

    let entry = db.get_entry(id).unwrap().unwrap();
    assert_eq!(entry.remote_id, Some(77));
    assert!(entry.synced);

    // the payload itself is untouched
    assert_eq!(entry.amount, -5.0);
}

#[test]
fn test_purge_local_tombstones() {
    let db = Database::in_memory().unwrap();

    // tombstone without a remote key, inserted directly
    let mut orphan = local_entry(1, "orphan", -1.0);
    orphan.deleted = true;
    db.insert_entry(&orphan).unwrap();

    let mut kept = local_entry(2, "kept", -2.0);
    kept.remote_id = Some(5);
    kept.deleted = true;
    db.insert_entry(&kept).unwrap();

    assert_eq!(db.purge_local_tombstones().unwrap(), 1);
    assert_eq!(db.pending_deletions().unwrap().len(), 1);
}

#[test]
fn test_replace_active_spares_tombstones() {
    let db = Database::in_memory().unwrap();

    let mut doomed = local_entry(1, "doomed", -1.0);
    doomed.remote_id = Some(3);
    doomed.synced = true;
    let doomed_id = db.insert_entry(&doomed).unwrap();
    db.delete_entry(doomed_id).unwrap();

    db.insert_entry(&local_entry(2, "old active", -2.0)).unwrap();

    let mut incoming = local_entry(3, "server copy", -9.0);
    incoming.remote_id = Some(8);
    incoming.synced = true;
    db.replace_active(&[incoming]).unwrap();

    let listed = db.list_entries(&EntryFilter::default()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].description, "server copy");

    // the tombstone is still awaiting remote confirmation
    let deletions = db.pending_deletions().unwrap();
    assert_eq!(deletions.len(), 1);
    assert_eq!(deletions[0].local_id, doomed_id);
}

#[test]
fn test_replace_active_keeps_explicit_keys() {
    let db = Database::in_memory().unwrap();

    let keep = db.insert_entry(&local_entry(1, "pending edit", -4.0)).unwrap();
    let pending = db.get_entry(keep).unwrap().unwrap();

    let mut fresh = local_entry(2, "pulled", -6.0);
    fresh.remote_id = Some(11);
    fresh.synced = true;

    db.replace_active(&[fresh, pending]).unwrap();

    let survivor = db.get_entry(keep).unwrap().unwrap();
    assert_eq!(survivor.description, "pending edit");
    assert_eq!(db.count_active().unwrap(), 2);
}

#[test]
fn test_upsert_entry_replaces_by_key() {
    let db = Database::in_memory().unwrap();

    let id = db.insert_entry(&local_entry(1, "before", -1.0)).unwrap();

    let mut replacement = local_entry(2, "after", -2.0);
    replacement.local_id = id;
    assert_eq!(db.upsert_entry(&replacement).unwrap(), id);

    let entry = db.get_entry(id).unwrap().unwrap();
    assert_eq!(entry.description, "after");
    assert_eq!(db.count_active().unwrap(), 1);

    // local_id 0 means "assign a fresh key"
    let fresh = db.upsert_entry(&local_entry(3, "fresh", -3.0)).unwrap();
    assert!(fresh > id);
}

#[test]
fn test_suggestions_dedupe_and_skip_blanks() {
    let db = Database::in_memory().unwrap();

    db.add_suggestions(
        &["Food".into(), "".into(), "Transport".into()],
        &["Checking".into(), "  ".into()],
    )
    .unwrap();
    db.add_suggestions(&["Food".into()], &["Cash".into()]).unwrap();

    assert_eq!(db.suggested_categories().unwrap(), vec!["Food", "Transport"]);
    assert_eq!(db.suggested_accounts().unwrap(), vec!["Cash", "Checking"]);
}

#[test]
fn test_change_notification_bumps_generation() {
    let db = Database::in_memory().unwrap();
    let rx = db.changes();
    let before = *rx.borrow();

    db.insert_entry(&local_entry(1, "ping", -1.0)).unwrap();

    assert!(*rx.borrow() > before);
}

#[test]
fn test_update_missing_entry_is_not_found() {
    let db = Database::in_memory().unwrap();
    let mut ghost = local_entry(1, "ghost", -1.0);
    ghost.local_id = 999;
    let err = db.update_entry(&ghost).unwrap_err();
    assert!(matches!(err, crate::error::Error::NotFound(_)));
}
