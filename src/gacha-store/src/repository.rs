//! Repository traits for account storage.
//!
//! These traits define the interface for all storage backends.

use crate::types::*;
use gacha::Account;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("No such user: {0}")]
    NotFound(String),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Username required")]
    InvalidUsername,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Password too short (min {0} chars)")]
    PasswordTooShort(usize),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(err: rusqlite::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for gacha::StoreError {
    fn from(err: RepoError) -> Self {
        gacha::StoreError::with_source("account repository failure", err)
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Trait for account storage operations
pub trait AccountsRepository {
    /// Initialize the database schema
    fn init(&self) -> RepoResult<()>;

    // === Accounts CRUD ===

    /// Create an account with a fresh game state.
    ///
    /// The username is trimmed and must be non-empty and unused.
    fn create_account(
        &self,
        username: &str,
        password: &str,
        starting_currency: u64,
    ) -> RepoResult<AccountRecord>;

    /// Get an account with its credentials
    fn get_record(&self, username: &str) -> RepoResult<Option<AccountRecord>>;

    /// Replace the stored game state of an existing account in one transaction
    fn save_account(&self, username: &str, account: &Account) -> RepoResult<()>;

    /// Delete an account and everything it owns
    fn delete_account(&self, username: &str) -> RepoResult<bool>;

    /// List accounts, ordered by username
    fn list_accounts(&self) -> RepoResult<Vec<AccountSummary>>;

    // === Statistics ===

    /// Get database statistics
    fn stats(&self) -> RepoResult<DbStats>;
}

/// Shared admin credential
pub trait AdminRepository {
    /// Stored admin password digest, if one has been set
    fn admin_password_hash(&self) -> RepoResult<Option<String>>;

    /// Replace the admin password digest
    fn set_admin_password_hash(&self, hash: &str) -> RepoResult<()>;
}
