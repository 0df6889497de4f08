//! Balances command implementation

use anyhow::Result;
use ledge_core::RemoteGateway;

use super::connect;

pub async fn cmd_balances() -> Result<()> {
    let (_config, gateway) = connect().await?;
    let snapshot = gateway.fetch_balances().await?;

    println!();
    println!("💰 Balances");
    println!("   ─────────────────────────────");
    println!("   Overall: {:>12.2}", snapshot.overall);
    println!();

    for account in &snapshot.accounts {
        let balance_str = if account.balance < 0.0 {
            format!("\x1b[31m{:.2}\x1b[0m", account.balance)
        } else {
            format!("{:.2}", account.balance)
        };
        println!("   {:<20} {:>12}", account.name, balance_str);
    }

    Ok(())
}
