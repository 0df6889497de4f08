//! Local ledger storage with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `entries` - Ledger entry operations and sync-state bookkeeping
//! - `entry_filter` - Dynamic WHERE-clause builder for entry queries
//! - `suggestions` - Category/account name suggestions harvested from pulls

use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tokio::sync::watch;

use crate::error::Result;

mod entries;
mod entry_filter;
mod suggestions;

#[cfg(test)]
mod tests;

pub(crate) use entry_filter::FilterSql;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling
///
/// Holds the local mutable copy of the ledger plus per-entry sync flags.
/// Every mutating operation bumps a generation counter observable through
/// [`Database::changes`], so a UI layer can re-render after local edits or
/// a merge without polling.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
    generation: Arc<watch::Sender<u64>>,
}

impl Database {
    /// Open (or create) the database at `path` and run migrations.
    pub fn open(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
            generation: Arc::new(watch::channel(0).0),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because every
    /// pooled connection would otherwise see its own private in-memory
    /// database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/ledge_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::open(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Subscribe to store changes.
    ///
    /// The receiver yields a new generation number after every mutating
    /// store call (insert, update, delete, merge replacement).
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    pub(crate) fn notify_changed(&self) {
        self.generation.send_modify(|n| *n += 1);
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: better concurrency, readers don't block writers
            -- Note: creates -wal and -shm sidecar files alongside the database
            PRAGMA journal_mode = WAL;

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Ledger entries. AUTOINCREMENT keeps local keys monotonic:
            -- a key is never reused, even after its row is deleted.
            CREATE TABLE IF NOT EXISTS entries (
                local_id INTEGER PRIMARY KEY AUTOINCREMENT,
                remote_id INTEGER,
                occurred_on DATE NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                account TEXT NOT NULL,
                is_synced BOOLEAN NOT NULL DEFAULT 0,
                is_deleted BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_entries_occurred_on ON entries(occurred_on);
            CREATE INDEX IF NOT EXISTS idx_entries_remote_id ON entries(remote_id);

            -- Autocomplete suggestions harvested from server pulls
            CREATE TABLE IF NOT EXISTS suggested_categories (
                name TEXT PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS suggested_accounts (
                name TEXT PRIMARY KEY
            );
            "#,
        )?;

        Ok(())
    }
}
