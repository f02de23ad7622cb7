//! Admin command handlers

use anyhow::Result;
use gacha::Gacha;
use gacha_store::session;

use crate::dispatch::Context;

pub fn credit(ctx: &Context, admin_password: &str, username: &str, amount: u64) -> Result<()> {
    let db = ctx.open_db()?;
    let admin = session::admin_login(&db, admin_password)?;
    let gacha = Gacha::new(ctx.game_config()?, &db)?;
    let balance = session::admin_credit(&gacha, &admin, username, amount)?;

    println!(
        "Credited {} to '{}'; balance is now {}",
        amount,
        username.trim(),
        balance
    );
    Ok(())
}

pub fn set_password(ctx: &Context, admin_password: &str, new_password: &str) -> Result<()> {
    let db = ctx.open_db()?;
    let admin = session::admin_login(&db, admin_password)?;
    session::change_admin_password(&db, &admin, new_password)?;

    println!("Admin password changed");
    Ok(())
}
