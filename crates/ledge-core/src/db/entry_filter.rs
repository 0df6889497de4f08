//! Dynamic WHERE-clause builder for entry queries
//!
//! Turns an [`EntryFilter`] into SQL components so the listing query and
//! the count query share one construction path.

use crate::models::EntryFilter;

/// Result of building a filter - contains SQL components and parameters
pub(crate) struct FilterSql {
    /// WHERE clause including the "WHERE" keyword; always present because
    /// listing always excludes tombstoned rows.
    pub where_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl FilterSql {
    /// Build the SQL components for `filter`.
    pub fn build(filter: &EntryFilter) -> Self {
        let mut conditions = vec!["is_deleted = 0".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref q) = filter.search {
            if !q.trim().is_empty() {
                conditions.push("description LIKE ? COLLATE NOCASE".to_string());
                params.push(Box::new(format!("%{}%", q.trim())));
            }
        }

        if let Some(from) = filter.from {
            conditions.push("occurred_on >= ?".to_string());
            params.push(Box::new(from.to_string()));
        }

        if let Some(to) = filter.to {
            conditions.push("occurred_on <= ?".to_string());
            params.push(Box::new(to.to_string()));
        }

        if let Some(ref category) = filter.category {
            if !category.is_empty() {
                conditions.push("category = ?".to_string());
                params.push(Box::new(category.clone()));
            }
        }

        if let Some(ref account) = filter.account {
            if !account.is_empty() {
                conditions.push("account = ?".to_string());
                params.push(Box::new(account.clone()));
            }
        }

        FilterSql {
            where_clause: format!("WHERE {}", conditions.join(" AND ")),
            params,
        }
    }

    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
