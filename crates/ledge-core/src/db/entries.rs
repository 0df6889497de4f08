//! Ledger entry operations
//!
//! The sync flags follow the reconciliation contract: `is_synced = 0`
//! marks a payload the server has not confirmed yet, `is_deleted = 1`
//! marks a tombstone awaiting remote deletion. Rows that are synced and
//! not tombstoned are exactly the ones the merge step may overwrite with
//! the server copy.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, FilterSql};
use crate::error::{Error, Result};
use crate::models::{Entry, EntryFilter};

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let occurred_on_str: String = row.get(2)?;
    Ok(Entry {
        local_id: row.get(0)?,
        remote_id: row.get(1)?,
        occurred_on: chrono::NaiveDate::parse_from_str(&occurred_on_str, "%Y-%m-%d")
            .unwrap_or_default(),
        description: row.get(3)?,
        amount: row.get(4)?,
        category: row.get(5)?,
        account: row.get(6)?,
        synced: row.get(7)?,
        deleted: row.get(8)?,
    })
}

const ENTRY_COLUMNS: &str =
    "local_id, remote_id, occurred_on, description, amount, category, account, is_synced, is_deleted";

impl Database {
    /// List non-tombstoned entries matching `filter`.
    ///
    /// Ordered by occurrence date descending, then local key descending,
    /// so same-day entries show newest insert first.
    pub fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let sql = FilterSql::build(filter);

        let query = format!(
            "SELECT {} FROM entries {} ORDER BY occurred_on DESC, local_id DESC",
            ENTRY_COLUMNS, sql.where_clause
        );

        let mut stmt = conn.prepare(&query)?;
        let entries = stmt
            .query_map(sql.params_refs().as_slice(), row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    /// Get one entry by local key.
    pub fn get_entry(&self, local_id: i64) -> Result<Option<Entry>> {
        let conn = self.conn()?;
        let entry = conn
            .query_row(
                &format!("SELECT {} FROM entries WHERE local_id = ?", ENTRY_COLUMNS),
                params![local_id],
                row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    /// Entries whose local payload the server has not confirmed yet.
    ///
    /// Tombstoned rows are excluded; those belong to the delete phase.
    pub fn unsynced_entries(&self) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM entries WHERE is_synced = 0 AND is_deleted = 0",
            ENTRY_COLUMNS
        ))?;
        let entries = stmt
            .query_map([], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Tombstoned entries whose removal still needs server confirmation.
    pub fn pending_deletions(&self) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM entries WHERE is_deleted = 1 AND remote_id IS NOT NULL",
            ENTRY_COLUMNS
        ))?;
        let entries = stmt
            .query_map([], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Insert a new entry, returning its local key.
    ///
    /// `entry.local_id` is ignored; the store assigns the key.
    pub fn insert_entry(&self, entry: &Entry) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO entries (remote_id, occurred_on, description, amount, category, account, is_synced, is_deleted)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                entry.remote_id,
                entry.occurred_on.to_string(),
                entry.description,
                entry.amount,
                entry.category,
                entry.account,
                entry.synced,
                entry.deleted,
            ],
        )?;
        let local_id = conn.last_insert_rowid();
        self.notify_changed();
        Ok(local_id)
    }

    /// Update an existing entry in place by local key.
    pub fn update_entry(&self, entry: &Entry) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE entries
            SET remote_id = ?, occurred_on = ?, description = ?, amount = ?,
                category = ?, account = ?, is_synced = ?, is_deleted = ?
            WHERE local_id = ?
            "#,
            params![
                entry.remote_id,
                entry.occurred_on.to_string(),
                entry.description,
                entry.amount,
                entry.category,
                entry.account,
                entry.synced,
                entry.deleted,
                entry.local_id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("entry {}", entry.local_id)));
        }
        self.notify_changed();
        Ok(())
    }

    /// Insert-or-replace by local key.
    ///
    /// A `local_id` of 0 inserts a fresh row; otherwise the given key is
    /// kept, replacing any existing row under it.
    pub fn upsert_entry(&self, entry: &Entry) -> Result<i64> {
        let conn = self.conn()?;
        let local_id = Self::upsert_on(&conn, entry)?;
        self.notify_changed();
        Ok(local_id)
    }

    fn upsert_on(conn: &rusqlite::Connection, entry: &Entry) -> Result<i64> {
        let explicit_id = if entry.local_id == 0 {
            None
        } else {
            Some(entry.local_id)
        };
        conn.execute(
            r#"
            INSERT OR REPLACE INTO entries
                (local_id, remote_id, occurred_on, description, amount, category, account, is_synced, is_deleted)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                explicit_id,
                entry.remote_id,
                entry.occurred_on.to_string(),
                entry.description,
                entry.amount,
                entry.category,
                entry.account,
                entry.synced,
                entry.deleted,
            ],
        )?;
        Ok(explicit_id.unwrap_or_else(|| conn.last_insert_rowid()))
    }

    /// Record a successful push: the current local payload is now the
    /// server-confirmed truth under `remote_id`.
    pub fn confirm_pushed(&self, local_id: i64, remote_id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE entries SET remote_id = ?, is_synced = 1 WHERE local_id = ?",
            params![remote_id, local_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("entry {}", local_id)));
        }
        self.notify_changed();
        Ok(())
    }

    /// Delete an entry the way the UI layer does.
    ///
    /// An entry the server never accepted is removed outright; an accepted
    /// one is tombstoned so the next sync confirms the removal remotely.
    pub fn delete_entry(&self, local_id: i64) -> Result<()> {
        let entry = self
            .get_entry(local_id)?
            .ok_or_else(|| Error::NotFound(format!("entry {}", local_id)))?;

        if entry.remote_id.is_none() {
            self.delete_local(local_id)
        } else {
            let conn = self.conn()?;
            conn.execute(
                "UPDATE entries SET is_deleted = 1, is_synced = 0 WHERE local_id = ?",
                params![local_id],
            )?;
            self.notify_changed();
            Ok(())
        }
    }

    /// Unconditional hard delete by local key.
    pub fn delete_local(&self, local_id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM entries WHERE local_id = ?", params![local_id])?;
        self.notify_changed();
        Ok(())
    }

    /// Remove tombstones the server never heard of.
    ///
    /// These are pure local artifacts; no network call is needed.
    pub fn purge_local_tombstones(&self) -> Result<usize> {
        let conn = self.conn()?;
        let purged = conn.execute(
            "DELETE FROM entries WHERE is_deleted = 1 AND remote_id IS NULL",
            [],
        )?;
        if purged > 0 {
            self.notify_changed();
        }
        Ok(purged)
    }

    /// Atomically replace the whole active (non-tombstoned) set.
    ///
    /// Only the reconciler's merge step calls this. Tombstoned rows
    /// survive, so a deletion that failed to reach the server is retried
    /// on the next run. Rows with `local_id = 0` get fresh keys; rows
    /// carrying a key keep it.
    pub fn replace_active(&self, entries: &[Entry]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM entries WHERE is_deleted = 0", [])?;
        for entry in entries {
            Self::upsert_on(&tx, entry)?;
        }

        tx.commit()?;
        self.notify_changed();
        Ok(())
    }

    /// Count of non-tombstoned entries.
    pub fn count_active(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE is_deleted = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
