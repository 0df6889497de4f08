//! Sync command implementation

use std::path::Path;

use anyhow::Result;
use ledge_core::Reconciler;

use super::{connect, open_db};

pub async fn cmd_sync(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    let (config, gateway) = connect().await?;

    println!("🔄 Syncing with {}...", config.server_url);

    let reconciler = Reconciler::new(db, gateway);
    let report = reconciler.sync().await?;

    println!();
    println!("📊 Sync Results");
    println!("   ─────────────────────────────");
    println!("   Pushed: {}", report.pushed);
    println!("   Deleted remotely: {}", report.deleted);
    if report.purged > 0 {
        println!("   Cleaned up locally: {}", report.purged);
    }
    println!("   Pulled: {}", report.pulled);

    let failures = report.push_failures + report.delete_failures;
    if failures > 0 {
        println!();
        println!(
            "⚠️  {} change(s) did not reach the server and will be retried on the next sync.",
            failures
        );
    }

    if let Some(balances) = report.balances {
        println!();
        println!("💰 Overall balance: {:.2}", balances.overall);
    }

    Ok(())
}
