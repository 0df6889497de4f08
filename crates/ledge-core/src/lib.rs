//! Ledge Core Library
//!
//! Shared functionality for Ledge, an offline-first personal finance
//! ledger:
//! - Local entry store (SQLite) with per-entry sync flags
//! - Remote gateway over the sync server's HTTP API
//! - The reconciler: push, delete, pull and shadow-set merge
//! - Category/account suggestions harvested from pulls

pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod sync;

pub use db::Database;
pub use error::{Error, Result};
pub use gateway::{CallCounts, HttpGateway, MockGateway, RemoteGateway};
pub use models::{
    AccountBalance, BalanceSnapshot, Entry, EntryFilter, NewTransfer, RemoteEntry,
};
pub use sync::{Reconciler, SyncReport};
