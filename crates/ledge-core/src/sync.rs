//! Reconciliation between the local store and the sync server
//!
//! One [`Reconciler::sync`] call runs four sequential phases:
//!
//! 1. **Push** - send every unsynced local payload (create or update)
//! 2. **Delete** - confirm tombstones remotely, then drop them locally
//! 3. **Pull** - fetch the full authoritative collection
//! 4. **Merge** - install the pulled set, except where a still-pending
//!    local change shadows it
//!
//! Per-record push/delete failures are logged and retried on the next
//! run; a pull failure aborts the run before anything destructive
//! happens. Local edits may land in the store at any point during a run:
//! the merge phase re-reads the pending set, so an edit that raced the
//! network keeps its local payload instead of being clobbered by a pull
//! of the pre-edit server state. Push always runs before pull so the
//! just-pushed payload, not the pre-push one, is the baseline the server
//! echoes back.

use std::collections::{BTreeSet, HashSet};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::gateway::RemoteGateway;
use crate::models::{BalanceSnapshot, EntryFilter, RemoteEntry};

/// Outcome of one reconciliation run.
///
/// The run as a whole succeeds iff the pull phase succeeded; individual
/// push/delete failures only show up in the counters and self-heal on a
/// later run (no backoff, no retry cap).
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Entries whose create/update reached the server.
    pub pushed: usize,
    /// Entries whose create/update failed and stayed unsynced.
    pub push_failures: usize,
    /// Tombstones confirmed remotely and dropped locally.
    pub deleted: usize,
    /// Tombstones whose remote deletion failed and which stay queued.
    pub delete_failures: usize,
    /// Tombstones that never reached the server, removed without a call.
    pub purged: usize,
    /// Size of the pulled authoritative collection.
    pub pulled: usize,
    /// Balance aggregates, if the trailing fetch succeeded.
    pub balances: Option<BalanceSnapshot>,
}

/// Orchestrates push, delete, pull and merge against one store and one
/// gateway.
///
/// At most one sync per reconciler is in flight at a time; a second
/// concurrent call is rejected with [`Error::SyncInFlight`] rather than
/// queued, so overlapping runs can never interleave their merge phases.
pub struct Reconciler<G> {
    db: Database,
    gateway: G,
    in_flight: Mutex<()>,
}

impl<G: RemoteGateway> Reconciler<G> {
    pub fn new(db: Database, gateway: G) -> Self {
        Self {
            db,
            gateway,
            in_flight: Mutex::new(()),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run one full reconciliation pass.
    pub async fn sync(&self) -> Result<SyncReport> {
        let _guard = self.in_flight.try_lock().map_err(|_| Error::SyncInFlight)?;

        let mut report = SyncReport::default();

        self.push_phase(&mut report).await?;
        self.delete_phase(&mut report).await?;
        let pulled = self.pull_phase().await?;
        report.pulled = pulled.len();
        self.merge_phase(pulled)?;

        // Aggregates ride along; their failure never fails the run.
        report.balances = match self.gateway.fetch_balances().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("failed to fetch balances: {}", e);
                None
            }
        };

        info!(
            "sync complete: pushed {} ({} failed), deleted {} ({} failed), pulled {}",
            report.pushed,
            report.push_failures,
            report.deleted,
            report.delete_failures,
            report.pulled
        );
        Ok(report)
    }

    /// Phase 1: send unsynced payloads, creates for entries the server
    /// has never accepted, updates for the rest. No cross-entry ordering
    /// guarantee; each push stands alone.
    async fn push_phase(&self, report: &mut SyncReport) -> Result<()> {
        let pending = self.db.unsynced_entries()?;
        if pending.is_empty() {
            return Ok(());
        }

        debug!("pushing {} unsynced entries", pending.len());
        for entry in pending {
            let outcome = match entry.remote_id {
                Some(remote_id) => self
                    .gateway
                    .update_entry(remote_id, &entry)
                    .await
                    .map(|()| remote_id),
                None => self.gateway.create_entry(&entry).await,
            };

            match outcome {
                Ok(remote_id) => {
                    self.db.confirm_pushed(entry.local_id, remote_id)?;
                    report.pushed += 1;
                }
                Err(e) => {
                    // stays unsynced; the next run retries it
                    warn!("failed to push entry {}: {}", entry.local_id, e);
                    report.push_failures += 1;
                }
            }
        }
        Ok(())
    }

    /// Phase 2: drop tombstones the server never heard of, then confirm
    /// the rest remotely.
    async fn delete_phase(&self, report: &mut SyncReport) -> Result<()> {
        report.purged = self.db.purge_local_tombstones()?;

        for entry in self.db.pending_deletions()? {
            let Some(remote_id) = entry.remote_id else {
                continue;
            };
            match self.gateway.delete_entry(remote_id).await {
                Ok(()) => {
                    self.db.delete_local(entry.local_id)?;
                    report.deleted += 1;
                }
                Err(e) => {
                    // tombstone stays queued for the next run
                    warn!("failed to delete entry {} remotely: {}", remote_id, e);
                    report.delete_failures += 1;
                }
            }
        }
        Ok(())
    }

    /// Phase 3: fetch the full collection. Failure here aborts the run;
    /// the store keeps whatever phases 1-2 already applied.
    async fn pull_phase(&self) -> Result<Vec<RemoteEntry>> {
        self.gateway.list_entries(&EntryFilter::default()).await
    }

    /// Phase 4: install the pulled set, shadowed by anything still
    /// pending locally.
    ///
    /// The pending set is re-read here, not reused from phase 1: an entry
    /// edited while the pull was in flight is dirty again and must win
    /// over the server copy. Remote keys awaiting deletion are shadowed
    /// too, so the pull cannot resurrect an entry whose remote delete
    /// failed moments ago.
    fn merge_phase(&self, pulled: Vec<RemoteEntry>) -> Result<()> {
        let still_pending = self.db.unsynced_entries()?;
        let pending_deletions = self.db.pending_deletions()?;

        let shadow: HashSet<i64> = still_pending
            .iter()
            .chain(pending_deletions.iter())
            .filter_map(|e| e.remote_id)
            .collect();

        let categories: BTreeSet<String> = pulled.iter().map(|e| e.category.clone()).collect();
        let accounts: BTreeSet<String> = pulled.iter().map(|e| e.account.clone()).collect();

        let mut merged: Vec<_> = pulled
            .into_iter()
            .filter(|e| !shadow.contains(&e.remote_id))
            .map(|e| e.into_entry())
            .collect();
        merged.extend(still_pending);

        debug!(
            "installing merged set: {} entries, {} shadowed by pending work",
            merged.len(),
            shadow.len()
        );
        self.db.replace_active(&merged)?;

        self.db.add_suggestions(
            &categories.into_iter().collect::<Vec<_>>(),
            &accounts.into_iter().collect::<Vec<_>>(),
        )?;
        Ok(())
    }
}
