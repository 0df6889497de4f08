//! Remote gateway abstraction
//!
//! Stateless request/response wrapper around the sync server's API. Each
//! operation is one network round trip; the trait seam keeps the
//! reconciler testable against an in-memory double.
//!
//! # Architecture
//!
//! - `RemoteGateway` trait: the interface the reconciler consumes
//! - `HttpGateway`: reqwest-backed implementation of the legacy wire
//!   contract (form-encoded mutations, JSON reads, session cookie, 302
//!   counted as success)
//! - `MockGateway`: configurable in-memory server double for tests

mod http;
mod mock;
mod types;

pub use http::HttpGateway;
pub use mock::{CallCounts, MockGateway};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BalanceSnapshot, Entry, EntryFilter, NewTransfer, RemoteEntry};

/// Interface to the remote ledger service.
///
/// Implementations must be Send + Sync so a reconciler can be shared
/// across async tasks. All failures are reported through the crate error
/// type: transport trouble as `Error::Http`, server refusals as
/// `Error::Rejected`. Both are recoverable from the caller's point of
/// view.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Authenticate and establish the session used by every later call.
    async fn login(&self, email: &str, password: &str) -> Result<()>;

    /// Create an entry the server has never seen; returns the assigned
    /// server key.
    async fn create_entry(&self, entry: &Entry) -> Result<i64>;

    /// Overwrite the server copy of an accepted entry.
    async fn update_entry(&self, remote_id: i64, entry: &Entry) -> Result<()>;

    /// Remove an accepted entry from the server.
    async fn delete_entry(&self, remote_id: i64) -> Result<()>;

    /// Fetch the server's collection, optionally filtered.
    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<RemoteEntry>>;

    /// Fetch the server-side balance aggregates.
    async fn fetch_balances(&self) -> Result<BalanceSnapshot>;

    /// Execute a transfer between two accounts server-side.
    async fn create_transfer(&self, transfer: &NewTransfer) -> Result<()>;
}
