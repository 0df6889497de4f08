//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ledge - your ledger, synced on your terms
#[derive(Parser)]
#[command(name = "ledge")]
#[command(about = "Offline-first personal finance ledger with server sync", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "ledge.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in to the sync server and save the connection settings
    ///
    /// The password is read from the LEDGE_PASSWORD environment variable.
    Login {
        /// Server address, e.g. http://192.168.0.221:8080
        #[arg(long)]
        server: String,

        /// Account e-mail
        #[arg(long)]
        email: String,
    },

    /// Reconcile the local ledger with the server (push, then pull)
    Sync,

    /// List local entries
    List {
        /// Substring to look for in descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Earliest occurrence date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Latest occurrence date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Exact category name
        #[arg(long)]
        category: Option<String>,

        /// Exact account name
        #[arg(long)]
        account: Option<String>,
    },

    /// Add an entry to the local ledger (pushed on the next sync)
    Add {
        /// Occurrence date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        #[arg(short, long)]
        description: String,

        /// Signed amount; negative is an outflow, e.g. --amount=-52.40
        #[arg(short, long, allow_hyphen_values = true)]
        amount: f64,

        #[arg(short, long)]
        category: String,

        #[arg(long)]
        account: String,
    },

    /// Edit a local entry by id (re-pushed on the next sync)
    Edit {
        /// Local entry id (first column of `ledge list`)
        id: i64,

        /// New occurrence date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// New signed amount
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<f64>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        account: Option<String>,
    },

    /// Delete an entry
    ///
    /// Entries the server never saw disappear immediately; accepted ones
    /// are marked and removed from the server on the next sync.
    Rm {
        /// Local entry id
        id: i64,
    },

    /// Move money between two accounts (executed server-side, then synced)
    Transfer {
        /// Occurrence date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value = "Transfer")]
        description: String,

        /// Positive amount to move
        #[arg(long)]
        amount: f64,

        /// Source account
        #[arg(long = "from")]
        from_account: String,

        /// Destination account
        #[arg(long = "to")]
        to_account: String,
    },

    /// Show server-side balances (overall and per account)
    Balances,

    /// Show connection settings and pending sync work
    Status,
}
