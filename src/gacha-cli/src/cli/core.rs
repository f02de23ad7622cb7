//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::account::AccountCommand;
use super::admin::AdminCommand;

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "gacha")]
#[command(about = "Mini gacha: pull characters, track pity, manage accounts", long_about = None)]
pub struct Cli {
    /// Path to database file (falls back to the configured path)
    #[arg(long, global = true, env = "GACHA_DB")]
    pub db: Option<PathBuf>,

    /// Game configuration file (catalog, rates, prices) in JSON
    #[arg(long, global = true, env = "GACHA_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage player accounts
    #[command(visible_alias = "a")]
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },

    /// Pull on your own account
    #[command(visible_alias = "p")]
    Pull {
        /// Account username
        username: String,

        /// Account password
        #[arg(long, env = "GACHA_PASSWORD", hide_env_values = true)]
        password: String,

        /// Buy the ten-pull bundle instead of a single pull
        #[arg(long)]
        ten: bool,
    },

    /// Administrative operations (require the admin password)
    Admin {
        /// Admin password
        #[arg(long, env = "GACHA_ADMIN_PASSWORD", hide_env_values = true)]
        admin_password: String,

        #[command(subcommand)]
        command: AdminCommand,
    },

    /// Show drop rates and the item pool
    Catalog {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show every catalog item with the number owned
    #[command(visible_alias = "col")]
    Collection {
        /// Account username
        username: String,
    },

    /// Show recent pulls, newest first
    #[command(visible_alias = "h")]
    History {
        /// Account username
        username: String,

        /// Maximum number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Run pulls without an account and report observed rates
    Simulate {
        /// Number of single pulls to run
        #[arg(short = 'n', long, default_value = "10000")]
        pulls: u64,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Apply the pity counter as real pulls do
        #[arg(long)]
        pity: bool,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default database path
        #[arg(long = "set-db")]
        set_db: Option<PathBuf>,

        /// Set default game configuration file
        #[arg(long = "set-catalog")]
        set_catalog: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
