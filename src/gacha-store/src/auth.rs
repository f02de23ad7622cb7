//! Password digests and username rules.
//!
//! Credentials are checked locally against unsalted SHA-256 digests. This
//! keeps friends from pulling on each other's accounts; it is not a
//! security boundary.

use crate::repository::{AdminRepository, RepoError, RepoResult};
use sha2::{Digest, Sha256};

/// Admin password seeded into a fresh database
pub const DEFAULT_ADMIN_PASSWORD: &str = "yuki";

/// Minimum admin password length
pub const MIN_ADMIN_PASSWORD_LEN: usize = 4;

/// Lowercase hex SHA-256 of a password
pub fn hash_password(plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a password against a stored digest
pub fn verify_password(plain: &str, hash: &str) -> bool {
    hash_password(plain) == hash
}

/// Trim a username and reject empty ones
pub fn normalize_username(raw: &str) -> RepoResult<&str> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(RepoError::InvalidUsername);
    }
    Ok(username)
}

/// Seed the default admin password if none is stored.
///
/// Returns true when the default was written.
pub fn ensure_admin_password<R: AdminRepository + ?Sized>(repo: &R) -> RepoResult<bool> {
    if repo.admin_password_hash()?.is_some() {
        return Ok(false);
    }
    repo.set_admin_password_hash(&hash_password(DEFAULT_ADMIN_PASSWORD))?;
    tracing::warn!(
        "No admin password found; default '{}' has been created. Change it ASAP.",
        DEFAULT_ADMIN_PASSWORD
    );
    Ok(true)
}

/// Check the shared admin password, seeding the default first if needed
pub fn verify_admin_password<R: AdminRepository + ?Sized>(
    repo: &R,
    plain: &str,
) -> RepoResult<bool> {
    ensure_admin_password(repo)?;
    let stored = repo.admin_password_hash()?;
    Ok(stored.is_some_and(|hash| verify_password(plain, &hash)))
}

/// Validate and store a new admin password
pub fn set_admin_password<R: AdminRepository + ?Sized>(repo: &R, plain: &str) -> RepoResult<()> {
    if plain.chars().count() < MIN_ADMIN_PASSWORD_LEN {
        return Err(RepoError::PasswordTooShort(MIN_ADMIN_PASSWORD_LEN));
    }
    repo.set_admin_password_hash(&hash_password(plain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryAdmin(RefCell<Option<String>>);

    impl AdminRepository for MemoryAdmin {
        fn admin_password_hash(&self) -> RepoResult<Option<String>> {
            Ok(self.0.borrow().clone())
        }

        fn set_admin_password_hash(&self, hash: &str) -> RepoResult<()> {
            *self.0.borrow_mut() = Some(hash.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_hash_password_known_digest() {
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("secret");
        assert!(verify_password("secret", &hash));
        assert!(!verify_password("Secret", &hash));
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  alice ").unwrap(), "alice");
        assert!(matches!(
            normalize_username("   "),
            Err(RepoError::InvalidUsername)
        ));
    }

    #[test]
    fn test_default_admin_seeded_once() {
        let repo = MemoryAdmin::default();
        assert!(ensure_admin_password(&repo).unwrap());
        assert!(!ensure_admin_password(&repo).unwrap());
        assert!(verify_admin_password(&repo, "yuki").unwrap());
        assert!(!verify_admin_password(&repo, "nope").unwrap());
    }

    #[test]
    fn test_verify_seeds_default_when_missing() {
        let repo = MemoryAdmin::default();
        assert!(verify_admin_password(&repo, DEFAULT_ADMIN_PASSWORD).unwrap());
    }

    #[test]
    fn test_change_admin_password() {
        let repo = MemoryAdmin::default();
        set_admin_password(&repo, "tanuki").unwrap();
        assert!(verify_admin_password(&repo, "tanuki").unwrap());
        assert!(!verify_admin_password(&repo, "yuki").unwrap());
    }

    #[test]
    fn test_short_admin_password_rejected() {
        let repo = MemoryAdmin::default();
        let err = set_admin_password(&repo, "abc").unwrap_err();
        assert!(matches!(err, RepoError::PasswordTooShort(4)));
        assert!(repo.admin_password_hash().unwrap().is_none());
    }
}
