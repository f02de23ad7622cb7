//! Account command handlers

use anyhow::{bail, Result};
use gacha_store::{session, AccountsRepository};

use crate::cli::OutputFormat;
use crate::dispatch::Context;

pub fn create(ctx: &Context, username: &str, password: &str) -> Result<()> {
    let game = ctx.game_config()?;
    let db = ctx.open_db()?;
    let record = db.create_account(username, password, game.starting_currency())?;

    println!(
        "Created account '{}' with {} currency",
        record.username, record.account.currency
    );
    Ok(())
}

pub fn list(ctx: &Context, format: OutputFormat) -> Result<()> {
    let db = ctx.open_db()?;
    let accounts = db.list_accounts()?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No accounts");
        return Ok(());
    }

    println!(
        "{:<20} {:>10} {:>6} {:>10}  Created",
        "Username", "Currency", "Pity", "Collected"
    );
    println!("{}", "-".repeat(70));
    for account in &accounts {
        println!(
            "{:<20} {:>10} {:>6} {:>10}  {}",
            account.username,
            account.currency,
            account.pity,
            account.collection_size,
            account.created_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

pub fn show(ctx: &Context, username: &str) -> Result<()> {
    let game = ctx.game_config()?;
    let db = ctx.open_db()?;
    let username = username.trim();
    let Some(record) = db.get_record(username)? else {
        bail!("No such user: {}", username);
    };
    let account = &record.account;

    println!("Account:    {}", record.username);
    println!("Currency:   {}", account.currency);
    println!("Pity:       {}/{}", account.pity, game.pity_threshold());
    println!("Collection: {}", account.collection_size());
    println!("History:    {} pulls", account.history.len());
    println!(
        "Created:    {}",
        account
            .created_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

pub fn delete(ctx: &Context, username: &str, admin_password: &str) -> Result<()> {
    let db = ctx.open_db()?;
    let admin = session::admin_login(&db, admin_password)?;
    session::admin_delete(&db, &admin, username)?;

    println!("Deleted account '{}'", username.trim());
    Ok(())
}

pub fn stats(ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let stats = db.stats()?;

    println!("Database: {}", ctx.db_path().display());
    println!("Accounts: {}", stats.account_count);
    println!("Pulls:    {}", stats.history_count);
    println!("Currency: {}", stats.total_currency);
    Ok(())
}
