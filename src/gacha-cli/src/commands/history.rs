//! History command handler

use anyhow::{bail, Result};
use gacha_store::AccountsRepository;

use super::format_pull;
use crate::dispatch::Context;

pub fn handle(ctx: &Context, username: &str, limit: usize) -> Result<()> {
    let db = ctx.open_db()?;
    let username = username.trim();
    let Some(record) = db.get_record(username)? else {
        bail!("No such user: {}", username);
    };
    let history = &record.account.history;

    if history.is_empty() {
        println!("{} has not pulled yet", username);
        return Ok(());
    }

    println!(
        "Last {} of {} pulls for {} (newest first):",
        limit.min(history.len()),
        history.len(),
        username
    );
    for result in history.iter().take(limit) {
        println!(
            "  {}  {}",
            result
                .pulled_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S"),
            format_pull(result)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{account, admin, pull, test_context};
    use gacha::{PullCount, RngSource};

    #[test]
    fn test_history_after_pulls() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        account::create(&ctx, "alice", "pw").unwrap();
        handle(&ctx, "alice", 20).unwrap();

        admin::credit(&ctx, gacha_store::auth::DEFAULT_ADMIN_PASSWORD, "alice", 400).unwrap();
        pull::run(&ctx, "alice", "pw", PullCount::Ten, &mut RngSource::seeded(3)).unwrap();
        handle(&ctx, "alice", 5).unwrap();
        handle(&ctx, "alice", 50).unwrap();

        let stored = ctx.open_db().unwrap().get_record("alice").unwrap().unwrap();
        assert_eq!(stored.account.history.len(), 10);
    }

    #[test]
    fn test_unknown_user() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        assert!(handle(&ctx, "ghost", 10).is_err());
    }
}
