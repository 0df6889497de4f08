//! Mock gateway for testing
//!
//! An in-memory stand-in for the sync server: assigns ids on create,
//! applies updates and deletes to a keyed map, serves pulls from it, and
//! derives balances from its contents. Each operation can be told to
//! fail so recovery paths are exercisable, and every call is counted so
//! tests can assert that an operation happened (or, for pure local
//! cleanups, that it did not).

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{AccountBalance, BalanceSnapshot, Entry, EntryFilter, NewTransfer, RemoteEntry};

use super::RemoteGateway;

/// How many times each gateway operation was invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub login: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub list: usize,
    pub balances: usize,
    pub transfer: usize,
}

impl CallCounts {
    /// Total network round trips.
    pub fn total(&self) -> usize {
        self.login
            + self.create
            + self.update
            + self.delete
            + self.list
            + self.balances
            + self.transfer
    }
}

#[derive(Default)]
struct Failures {
    login: bool,
    create: bool,
    update: bool,
    delete: bool,
    list: bool,
    balances: bool,
    transfer: bool,
}

#[derive(Default)]
struct ServerState {
    next_id: i64,
    entries: BTreeMap<i64, RemoteEntry>,
}

/// Mock sync server for tests.
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<ServerState>,
    failures: Mutex<Failures>,
    calls: Mutex<CallCounts>,
    latency: Mutex<Option<Duration>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load the server with entries (ids must be unique).
    pub fn seed(&self, entries: Vec<RemoteEntry>) {
        let mut state = lock(&self.state);
        for entry in entries {
            state.next_id = state.next_id.max(entry.remote_id);
            state.entries.insert(entry.remote_id, entry);
        }
    }

    /// Current server copy of one entry.
    pub fn remote_entry(&self, remote_id: i64) -> Option<RemoteEntry> {
        lock(&self.state).entries.get(&remote_id).cloned()
    }

    /// Current server collection, ordered by id.
    pub fn remote_entries(&self) -> Vec<RemoteEntry> {
        lock(&self.state).entries.values().cloned().collect()
    }

    /// Snapshot of the per-operation call counters.
    pub fn calls(&self) -> CallCounts {
        *lock(&self.calls)
    }

    pub fn fail_login(&self, fail: bool) {
        lock(&self.failures).login = fail;
    }

    pub fn fail_create(&self, fail: bool) {
        lock(&self.failures).create = fail;
    }

    pub fn fail_update(&self, fail: bool) {
        lock(&self.failures).update = fail;
    }

    pub fn fail_delete(&self, fail: bool) {
        lock(&self.failures).delete = fail;
    }

    pub fn fail_list(&self, fail: bool) {
        lock(&self.failures).list = fail;
    }

    pub fn fail_balances(&self, fail: bool) {
        lock(&self.failures).balances = fail;
    }

    pub fn fail_transfer(&self, fail: bool) {
        lock(&self.failures).transfer = fail;
    }

    /// Simulate a slow network: every operation sleeps this long first.
    ///
    /// Gives concurrent callers a real suspension point to interleave at,
    /// which plain in-memory operations never yield.
    pub fn set_latency(&self, latency: Duration) {
        *lock(&self.latency) = Some(latency);
    }

    async fn round_trip(&self) {
        let latency = *lock(&self.latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn payload(entry: &Entry, remote_id: i64) -> RemoteEntry {
        RemoteEntry {
            remote_id,
            occurred_on: entry.occurred_on,
            description: entry.description.clone(),
            amount: entry.amount,
            category: entry.category.clone(),
            account: entry.account.clone(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn rejected() -> Error {
    Error::Rejected(503)
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn login(&self, _email: &str, _password: &str) -> Result<()> {
        self.round_trip().await;
        lock(&self.calls).login += 1;
        if lock(&self.failures).login {
            return Err(Error::Rejected(401));
        }
        Ok(())
    }

    async fn create_entry(&self, entry: &Entry) -> Result<i64> {
        self.round_trip().await;
        lock(&self.calls).create += 1;
        if lock(&self.failures).create {
            return Err(rejected());
        }

        let mut state = lock(&self.state);
        state.next_id += 1;
        let remote_id = state.next_id;
        state.entries.insert(remote_id, Self::payload(entry, remote_id));
        Ok(remote_id)
    }

    async fn update_entry(&self, remote_id: i64, entry: &Entry) -> Result<()> {
        self.round_trip().await;
        lock(&self.calls).update += 1;
        if lock(&self.failures).update {
            return Err(rejected());
        }

        let mut state = lock(&self.state);
        if !state.entries.contains_key(&remote_id) {
            return Err(Error::Rejected(404));
        }
        state.entries.insert(remote_id, Self::payload(entry, remote_id));
        Ok(())
    }

    async fn delete_entry(&self, remote_id: i64) -> Result<()> {
        self.round_trip().await;
        lock(&self.calls).delete += 1;
        if lock(&self.failures).delete {
            return Err(rejected());
        }

        let mut state = lock(&self.state);
        if state.entries.remove(&remote_id).is_none() {
            return Err(Error::Rejected(404));
        }
        Ok(())
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<RemoteEntry>> {
        self.round_trip().await;
        lock(&self.calls).list += 1;
        if lock(&self.failures).list {
            return Err(rejected());
        }

        let state = lock(&self.state);
        let entries = state
            .entries
            .values()
            .filter(|e| {
                filter
                    .search
                    .as_ref()
                    .map(|q| e.description.to_lowercase().contains(&q.to_lowercase()))
                    .unwrap_or(true)
                    && filter.from.map(|d| e.occurred_on >= d).unwrap_or(true)
                    && filter.to.map(|d| e.occurred_on <= d).unwrap_or(true)
                    && filter
                        .category
                        .as_ref()
                        .map(|c| &e.category == c)
                        .unwrap_or(true)
                    && filter
                        .account
                        .as_ref()
                        .map(|a| &e.account == a)
                        .unwrap_or(true)
            })
            .cloned()
            .collect();
        Ok(entries)
    }

    async fn fetch_balances(&self) -> Result<BalanceSnapshot> {
        self.round_trip().await;
        lock(&self.calls).balances += 1;
        if lock(&self.failures).balances {
            return Err(rejected());
        }

        let state = lock(&self.state);
        let mut per_account: BTreeMap<String, f64> = BTreeMap::new();
        for entry in state.entries.values() {
            *per_account.entry(entry.account.clone()).or_default() += entry.amount;
        }

        Ok(BalanceSnapshot {
            overall: per_account.values().sum(),
            accounts: per_account
                .into_iter()
                .map(|(name, balance)| AccountBalance { name, balance })
                .collect(),
        })
    }

    async fn create_transfer(&self, transfer: &NewTransfer) -> Result<()> {
        self.round_trip().await;
        lock(&self.calls).transfer += 1;
        if lock(&self.failures).transfer {
            return Err(rejected());
        }

        // The real server materializes a paired outflow and inflow.
        let mut state = lock(&self.state);
        for (account, amount) in [
            (&transfer.from_account, -transfer.amount),
            (&transfer.to_account, transfer.amount),
        ] {
            state.next_id += 1;
            let remote_id = state.next_id;
            state.entries.insert(
                remote_id,
                RemoteEntry {
                    remote_id,
                    occurred_on: transfer.occurred_on,
                    description: transfer.description.clone(),
                    amount,
                    category: String::new(),
                    account: account.clone(),
                },
            );
        }
        Ok(())
    }
}
