//! Transfer command implementation
//!
//! Transfers run server-side (the server materializes both legs), so
//! this command needs the network, and finishes with a sync to pull the
//! new entries into the local ledger.

use std::path::Path;

use anyhow::Result;
use ledge_core::{NewTransfer, Reconciler, RemoteGateway};

use super::{connect, open_db, parse_date_or_today};

pub async fn cmd_transfer(
    db_path: &Path,
    date: Option<&str>,
    description: &str,
    amount: f64,
    from_account: &str,
    to_account: &str,
) -> Result<()> {
    if amount <= 0.0 {
        anyhow::bail!("Transfer amount must be positive");
    }
    if from_account == to_account {
        anyhow::bail!("Source and destination accounts must differ");
    }

    let db = open_db(db_path)?;
    let (_config, gateway) = connect().await?;

    let transfer = NewTransfer {
        occurred_on: parse_date_or_today(date)?,
        description: description.to_string(),
        amount,
        from_account: from_account.to_string(),
        to_account: to_account.to_string(),
    };
    gateway.create_transfer(&transfer).await?;

    println!(
        "✅ Transferred {:.2} from {} to {}.",
        amount, from_account, to_account
    );

    // pull both legs down right away
    let reconciler = Reconciler::new(db, gateway);
    reconciler.sync().await?;
    println!("   Ledger synced.");

    Ok(())
}
