//! Ledge CLI - Offline-first personal finance ledger
//!
//! Usage:
//!   ledge login --server URL --email EMAIL   Log in and save settings
//!   ledge sync                               Reconcile with the server
//!   ledge list                               Browse the local ledger
//!   ledge add --description ... --amount ... Record an entry offline

mod cli;
mod commands;
mod config;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Login { server, email } => commands::cmd_login(&server, &email).await,
        Commands::Sync => commands::cmd_sync(&cli.db).await,
        Commands::List {
            search,
            from,
            to,
            category,
            account,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_list(
                &db,
                search.as_deref(),
                from.as_deref(),
                to.as_deref(),
                category.as_deref(),
                account.as_deref(),
            )
        }
        Commands::Add {
            date,
            description,
            amount,
            category,
            account,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_add(
                &db,
                date.as_deref(),
                &description,
                amount,
                &category,
                &account,
            )
        }
        Commands::Edit {
            id,
            date,
            description,
            amount,
            category,
            account,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_edit(
                &db,
                id,
                date.as_deref(),
                description.as_deref(),
                amount,
                category.as_deref(),
                account.as_deref(),
            )
        }
        Commands::Rm { id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_rm(&db, id)
        }
        Commands::Transfer {
            date,
            description,
            amount,
            from_account,
            to_account,
        } => {
            commands::cmd_transfer(
                &cli.db,
                date.as_deref(),
                &description,
                amount,
                &from_account,
                &to_account,
            )
            .await
        }
        Commands::Balances => commands::cmd_balances().await,
        Commands::Status => commands::cmd_status(&cli.db),
    }
}
