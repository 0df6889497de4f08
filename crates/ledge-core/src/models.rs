//! Domain models for Ledge

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single ledger entry in the local store.
///
/// An entry exists locally first (`remote_id` is `None` until the server
/// accepts it) or arrives via a pull from the server (`remote_id` set,
/// `synced` true). `synced == false` means the local payload differs from
/// the last server-confirmed payload; `deleted == true` means the entry is
/// tombstoned locally and awaits remote deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Local key. Assigned by the store, monotonic, never reused.
    pub local_id: i64,
    /// Server key. `None` until the server has accepted the entry.
    pub remote_id: Option<i64>,
    pub occurred_on: NaiveDate,
    pub description: String,
    /// Signed amount; negative is an outflow.
    pub amount: f64,
    pub category: String,
    pub account: String,
    pub synced: bool,
    pub deleted: bool,
}

impl Entry {
    /// A fresh local entry that has never been pushed.
    pub fn new_local(
        occurred_on: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        account: impl Into<String>,
    ) -> Self {
        Self {
            local_id: 0,
            remote_id: None,
            occurred_on,
            description: description.into(),
            amount,
            category: category.into(),
            account: account.into(),
            synced: false,
            deleted: false,
        }
    }
}

/// An entry as the server returns it from the collection endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEntry {
    pub remote_id: i64,
    pub occurred_on: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub account: String,
}

impl RemoteEntry {
    /// Convert into a clean local entry (server copy, nothing pending).
    ///
    /// `local_id` is 0: the store assigns a fresh key on insert.
    pub fn into_entry(self) -> Entry {
        Entry {
            local_id: 0,
            remote_id: Some(self.remote_id),
            occurred_on: self.occurred_on,
            description: self.description,
            amount: self.amount,
            category: self.category,
            account: self.account,
            synced: true,
            deleted: false,
        }
    }
}

/// Filter for listing entries, locally or on the server.
///
/// All fields are optional; the default filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryFilter {
    /// Case-insensitive substring match on the description.
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<String>,
    pub account: Option<String>,
}

impl EntryFilter {
    pub fn is_empty(&self) -> bool {
        self == &EntryFilter::default()
    }
}

/// Server-side balance aggregates, fetched fresh on every sync.
///
/// Never merged with local state; the server is authoritative for
/// aggregates and this snapshot is not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub overall: f64,
    pub accounts: Vec<AccountBalance>,
}

/// Current balance of one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub name: String,
    pub balance: f64,
}

/// A transfer between two accounts, executed server-side.
///
/// The server materializes the paired entries; a sync afterwards pulls
/// them into the local store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransfer {
    pub occurred_on: NaiveDate,
    pub description: String,
    /// Positive amount moved from `from_account` to `to_account`.
    pub amount: f64,
    pub from_account: String,
    pub to_account: String,
}
