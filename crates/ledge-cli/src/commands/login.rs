//! Login command implementation

use anyhow::{Context, Result};
use ledge_core::{HttpGateway, RemoteGateway};

use crate::config::Config;

pub async fn cmd_login(server: &str, email: &str) -> Result<()> {
    let config = Config::new(server, email);
    let password = Config::password()?;

    println!("🔑 Logging in to {}...", config.server_url);

    let gateway = HttpGateway::new(&config.server_url)?;
    gateway
        .login(&config.email, &password)
        .await
        .context("Login failed. Check the server address and credentials.")?;

    config.save()?;

    println!("✅ Logged in as {}", config.email);
    println!("   Settings saved to {}", Config::path()?.display());
    println!();
    println!("Next steps:");
    println!("  1. Pull your ledger: ledge sync");
    println!("  2. Browse it: ledge list");

    Ok(())
}
