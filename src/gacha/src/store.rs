//! Account store seam.
//!
//! The engine reads an account before a batch and writes it back once after
//! the batch. Backends live outside this crate; [`MemoryStore`] is the
//! in-process implementation used by tests and simulations.

use crate::account::Account;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Failure reported by a store backend
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Persistence contract the engine needs
pub trait AccountStore {
    /// Fetch an account, `None` if it does not exist
    fn get(&self, account_id: &str) -> Result<Option<Account>, StoreError>;

    /// Persist the whole account
    fn put(&self, account_id: &str, account: &Account) -> Result<(), StoreError>;
}

impl<S: AccountStore + ?Sized> AccountStore for &S {
    fn get(&self, account_id: &str) -> Result<Option<Account>, StoreError> {
        (**self).get(account_id)
    }

    fn put(&self, account_id: &str, account: &Account) -> Result<(), StoreError> {
        (**self).put(account_id, account)
    }
}

impl<S: AccountStore + ?Sized> AccountStore for Arc<S> {
    fn get(&self, account_id: &str) -> Result<Option<Account>, StoreError> {
        (**self).get(account_id)
    }

    fn put(&self, account_id: &str, account: &Account) -> Result<(), StoreError> {
        (**self).put(account_id, account)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<String, Account>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account
    pub fn insert(&self, account_id: &str, account: Account) {
        self.accounts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(account_id.to_string(), account);
    }

    pub fn len(&self) -> usize {
        self.accounts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AccountStore for MemoryStore {
    fn get(&self, account_id: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| StoreError::new("account map lock poisoned"))?;
        Ok(accounts.get(account_id).cloned())
    }

    fn put(&self, account_id: &str, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| StoreError::new("account map lock poisoned"))?;
        accounts.insert(account_id.to_string(), account.clone());
        Ok(())
    }
}
