//! Category and account name suggestions
//!
//! Harvested from each successful pull so autocomplete keeps working
//! offline. Insert-if-absent: a name seen once stays suggested.

use rusqlite::params;

use super::Database;
use crate::error::Result;

impl Database {
    /// Remember category and account names, skipping blanks and duplicates.
    pub fn add_suggestions(&self, categories: &[String], accounts: &[String]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for name in categories.iter().filter(|n| !n.trim().is_empty()) {
            tx.execute(
                "INSERT OR IGNORE INTO suggested_categories (name) VALUES (?)",
                params![name],
            )?;
        }
        for name in accounts.iter().filter(|n| !n.trim().is_empty()) {
            tx.execute(
                "INSERT OR IGNORE INTO suggested_accounts (name) VALUES (?)",
                params![name],
            )?;
        }

        tx.commit()?;
        self.notify_changed();
        Ok(())
    }

    /// Known category names, alphabetical.
    pub fn suggested_categories(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM suggested_categories ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Known account names, alphabetical.
    pub fn suggested_accounts(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM suggested_accounts ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }
}
