//! Collection command handler

use anyhow::{bail, Result};
use gacha::{Account, GachaConfig, Item};
use gacha_store::AccountsRepository;

use crate::dispatch::Context;

/// Every catalog item in catalog order, paired with the owned count
pub fn collection_rows<'c>(game: &'c GachaConfig, account: &Account) -> Vec<(&'c Item, u32)> {
    game.catalog()
        .items()
        .iter()
        .map(|item| (item, account.owned(&item.id)))
        .collect()
}

pub fn handle(ctx: &Context, username: &str) -> Result<()> {
    let game = ctx.game_config()?;
    let db = ctx.open_db()?;
    let username = username.trim();
    let Some(record) = db.get_record(username)? else {
        bail!("No such user: {}", username);
    };

    let rows = collection_rows(&game, &record.account);
    let owned = rows.iter().filter(|(_, count)| *count > 0).count();

    println!("Collection for {} ({}/{} characters):", username, owned, rows.len());
    for (item, count) in rows {
        if count > 0 {
            println!("  {:<5} {:<12} x{}", item.stars(), item.name, count);
        } else {
            println!("  {:<5} {:<12} -", item.stars(), item.name);
        }
    }
    Ok(())
}
