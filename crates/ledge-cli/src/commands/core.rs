//! Core command utilities shared across the CLI
//!
//! This module contains:
//! - `open_db` - Shared utility to open the local database
//! - `connect` - Build an authenticated gateway from the saved config
//! - Date argument parsing helpers

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ledge_core::{Database, HttpGateway, RemoteGateway};

use crate::config::Config;

/// Open (or create) the local ledger database.
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::open(path_str).context("Failed to open database")
}

/// Build a gateway from the saved config and log in.
///
/// The core only assumes an authenticated gateway, so every networked
/// command starts here.
pub async fn connect() -> Result<(Config, HttpGateway)> {
    let config = Config::load()?;
    let password = Config::password()?;

    let gateway = HttpGateway::new(&config.server_url)?;
    gateway
        .login(&config.email, &password)
        .await
        .with_context(|| format!("Login to {} failed", config.server_url))?;

    Ok((config, gateway))
}

/// Parse a YYYY-MM-DD date argument.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s))
}

/// Parse an optional date argument, defaulting to today.
pub fn parse_date_or_today(s: Option<&str>) -> Result<NaiveDate> {
    match s {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
