//! Status command implementation

use std::path::Path;

use anyhow::Result;

use crate::config::Config;

use super::open_db;

pub fn cmd_status(db_path: &Path) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Ledge Status");
    println!("   ─────────────────────────────────────────────────────────────");

    match Config::load() {
        Ok(config) => {
            println!("   Server: {}", config.server_url);
            println!("   Account: {}", config.email);
        }
        Err(_) => {
            println!("   Server: (not logged in; run 'ledge login')");
        }
    }

    println!("   Database: {}", db_path.display());
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
        println!();
        return Ok(());
    }

    let db = open_db(db_path)?;
    let active = db.count_active()?;
    let unsynced = db.unsynced_entries()?.len();
    let deletions = db.pending_deletions()?.len();

    println!();
    println!("   Entries: {}", active);
    if unsynced > 0 {
        println!("   ☁ Awaiting push: {}", unsynced);
    }
    if deletions > 0 {
        println!("   🗑  Awaiting remote deletion: {}", deletions);
    }
    if unsynced + deletions > 0 {
        println!();
        println!("   Run 'ledge sync' to reconcile with the server.");
    } else {
        println!("   ✅ Everything confirmed by the server.");
    }

    println!();
    Ok(())
}
