//! Command dispatch functions
//!
//! Breaks up the main match statement into focused dispatch functions and
//! carries the per-invocation context they share.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use gacha::GachaConfig;
use gacha_store::{AccountsRepository, SqliteDb};

use crate::cli::*;
use crate::commands;
use crate::config::Config;

/// Settings resolved for one invocation
pub struct Context {
    config: Config,
    db: Option<PathBuf>,
    catalog: Option<PathBuf>,
}

impl Context {
    /// Load the config file and remember command-line overrides
    pub fn new(db: Option<PathBuf>, catalog: Option<PathBuf>) -> Result<Self> {
        Ok(Self::with_config(Config::load()?, db, catalog))
    }

    pub fn with_config(config: Config, db: Option<PathBuf>, catalog: Option<PathBuf>) -> Self {
        Self {
            config,
            db,
            catalog,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.config.resolve_db(self.db.clone())
    }

    /// Open the database, creating it and its schema if needed
    pub fn open_db(&self) -> Result<SqliteDb> {
        let path = self.db_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let db = SqliteDb::open(&path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        db.init().context("Failed to initialize database")?;
        tracing::debug!(path = %path.display(), "database ready");
        Ok(db)
    }

    pub fn game_config(&self) -> Result<GachaConfig> {
        self.config.game_config(self.catalog.as_deref())
    }
}

/// Dispatch account subcommands
pub fn dispatch_account(ctx: &Context, command: AccountCommand) -> Result<()> {
    match command {
        AccountCommand::Create { username, password } => {
            commands::account::create(ctx, &username, &password)
        }

        AccountCommand::List { format } => commands::account::list(ctx, format),

        AccountCommand::Show { username } => commands::account::show(ctx, &username),

        AccountCommand::Delete {
            username,
            admin_password,
        } => commands::account::delete(ctx, &username, &admin_password),

        AccountCommand::Stats => commands::account::stats(ctx),
    }
}

/// Dispatch admin subcommands
pub fn dispatch_admin(ctx: &Context, admin_password: &str, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Credit { username, amount } => {
            commands::admin::credit(ctx, admin_password, &username, amount)
        }

        AdminCommand::SetPassword { new_password } => {
            commands::admin::set_password(ctx, admin_password, &new_password)
        }
    }
}
