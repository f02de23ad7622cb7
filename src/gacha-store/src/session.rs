//! Player and admin sessions.
//!
//! A session value is only handed out after a successful password check, so
//! holding a [`PlayerSession`] or [`AdminSession`] is the proof of login the
//! operations below require.

use crate::auth;
use crate::repository::{AccountsRepository, AdminRepository, RepoError, RepoResult};
use gacha::{AccountStore, Gacha, GachaResult, PullCount, PullResult, RandomSource};

/// A logged-in player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSession {
    username: String,
}

impl PlayerSession {
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Proof that the admin password was supplied
#[derive(Debug, Clone)]
pub struct AdminSession {
    _private: (),
}

/// Check a player's credentials
pub fn login<R: AccountsRepository + ?Sized>(
    repo: &R,
    username: &str,
    password: &str,
) -> RepoResult<PlayerSession> {
    let username = auth::normalize_username(username)?;
    let record = repo
        .get_record(username)?
        .ok_or_else(|| RepoError::NotFound(username.to_string()))?;

    if !auth::verify_password(password, &record.password_hash) {
        tracing::debug!(username, "player login rejected");
        return Err(RepoError::WrongPassword);
    }
    tracing::debug!(username, "player logged in");
    Ok(PlayerSession {
        username: record.username,
    })
}

/// Check the shared admin password
pub fn admin_login<R: AdminRepository + ?Sized>(repo: &R, password: &str) -> RepoResult<AdminSession> {
    if !auth::verify_admin_password(repo, password)? {
        tracing::debug!("admin login rejected");
        return Err(RepoError::WrongPassword);
    }
    Ok(AdminSession { _private: () })
}

/// Replace the admin password
pub fn change_admin_password<R: AdminRepository + ?Sized>(
    repo: &R,
    _admin: &AdminSession,
    new_password: &str,
) -> RepoResult<()> {
    auth::set_admin_password(repo, new_password)?;
    tracing::info!("admin password changed");
    Ok(())
}

/// Run a batch of pulls on the logged-in player's own account
pub fn pull<S, R>(
    gacha: &Gacha<S>,
    player: &PlayerSession,
    count: PullCount,
    rng: &mut R,
) -> GachaResult<Vec<PullResult>>
where
    S: AccountStore,
    R: RandomSource + ?Sized,
{
    gacha.pull(player.username(), count, rng)
}

/// Credit any account; returns the new balance
pub fn admin_credit<S: AccountStore>(
    gacha: &Gacha<S>,
    _admin: &AdminSession,
    username: &str,
    amount: u64,
) -> GachaResult<u64> {
    gacha.credit(username.trim(), amount)
}

/// Delete any account
pub fn admin_delete<R: AccountsRepository + ?Sized>(
    repo: &R,
    _admin: &AdminSession,
    username: &str,
) -> RepoResult<()> {
    let username = auth::normalize_username(username)?;
    if !repo.delete_account(username)? {
        return Err(RepoError::NotFound(username.to_string()));
    }
    tracing::info!(username, "account deleted by admin");
    Ok(())
}
