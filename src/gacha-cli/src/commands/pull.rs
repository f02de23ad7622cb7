//! Pull command handler

use anyhow::Result;
use gacha::{Account, Gacha, PullCount, PullResult, RandomSource, RngSource};
use gacha_store::session;

use super::format_pull;
use crate::dispatch::Context;

/// Log in, run the batch, and print what came out
pub fn handle(ctx: &Context, username: &str, password: &str, ten: bool) -> Result<()> {
    let count = if ten { PullCount::Ten } else { PullCount::Single };
    let outcome = run(ctx, username, password, count, &mut RngSource::from_entropy())?;
    let account = &outcome.account;

    println!("{} pull for {}:", count, username.trim());
    for result in &outcome.results {
        println!("  {}", format_pull(result));
    }
    println!();
    println!(
        "Balance: {}  Pity: {}/{}",
        account.currency,
        account.pity,
        outcome.pity_threshold
    );
    Ok(())
}

/// Results of one batch plus the account state it left behind
#[derive(Debug)]
pub struct PullOutcome {
    pub results: Vec<PullResult>,
    pub account: Account,
    pub pity_threshold: u32,
}

/// Authenticate and pull against the configured database
pub fn run<R: RandomSource + ?Sized>(
    ctx: &Context,
    username: &str,
    password: &str,
    count: PullCount,
    rng: &mut R,
) -> Result<PullOutcome> {
    let db = ctx.open_db()?;
    let player = session::login(&db, username, password)?;
    let gacha = Gacha::new(ctx.game_config()?, &db)?;
    let results = session::pull(&gacha, &player, count, rng)?;
    let account = gacha.account(player.username())?;

    Ok(PullOutcome {
        results,
        account,
        pity_threshold: gacha.config().pity_threshold(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{account, test_context};
    use gacha::ScriptedSource;
    use gacha_store::AccountsRepository;

    #[test]
    fn test_single_pull_spends_currency() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        account::create(&ctx, "alice", "pw").unwrap();

        let mut rng = ScriptedSource::constant(0.01);
        let outcome = run(&ctx, "alice", "pw", PullCount::Single, &mut rng).unwrap();
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].item.id, "aiko");
        assert_eq!(outcome.account.currency, 400);
        assert_eq!(outcome.pity_threshold, gacha::PITY_THRESHOLD);

        let stored = ctx.open_db().unwrap().get_record("alice").unwrap().unwrap();
        assert_eq!(stored.account.currency, 400);
        assert_eq!(stored.account.pity, 0);
    }

    #[test]
    fn test_wrong_password_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        account::create(&ctx, "alice", "pw").unwrap();

        let err = run(
            &ctx,
            "alice",
            "nope",
            PullCount::Single,
            &mut RngSource::seeded(1),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Wrong password"));
    }

    #[test]
    fn test_ten_pull_without_funds() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        account::create(&ctx, "alice", "pw").unwrap();

        let err = run(&ctx, "alice", "pw", PullCount::Ten, &mut RngSource::seeded(1)).unwrap_err();
        assert!(err.to_string().contains("insufficient"));
        assert!(handle(&ctx, "alice", "pw", true).is_err());
    }

    #[test]
    fn test_handle_prints_results() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        account::create(&ctx, "alice", "pw").unwrap();
        handle(&ctx, "alice", "pw", false).unwrap();

        let stored = ctx.open_db().unwrap().get_record("alice").unwrap().unwrap();
        assert_eq!(stored.account.history.len(), 1);
    }
}
