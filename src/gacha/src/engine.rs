//! Engine façade over an account store.
//!
//! [`Gacha`] pairs a validated configuration with a store and runs each
//! operation as get → mutate → put while holding a lock for that account,
//! so two batches for the same account never interleave. Operations on
//! different accounts do not contend.

use crate::account::{Account, PullResult};
use crate::config::GachaConfig;
use crate::error::{GachaError, GachaResult};
use crate::pull::{perform_batch, PullCount};
use crate::rng::RandomSource;
use crate::store::AccountStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Reward engine bound to one configuration and one store
pub struct Gacha<S> {
    config: GachaConfig,
    store: S,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: AccountStore> Gacha<S> {
    /// Validate the configuration and build the engine.
    ///
    /// A bad configuration fails here, before any pull can be served.
    pub fn new(config: GachaConfig, store: S) -> GachaResult<Self> {
        config.validate()?;
        tracing::debug!(
            items = config.catalog().items().len(),
            pity_threshold = config.pity_threshold(),
            "gacha engine ready"
        );
        Ok(Self {
            config,
            store,
            locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &GachaConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current state of an account
    pub fn account(&self, account_id: &str) -> GachaResult<Account> {
        self.load(account_id)
    }

    /// Run a batch of pulls for one account and persist it once.
    ///
    /// If the store fails to persist, the error is [`GachaError::Persistence`]
    /// and the batch must be treated as not committed.
    pub fn pull<R: RandomSource + ?Sized>(
        &self,
        account_id: &str,
        count: PullCount,
        rng: &mut R,
    ) -> GachaResult<Vec<PullResult>> {
        let (results, account) = self.with_account_lock(account_id, || {
            let mut account = self.load(account_id)?;
            let results = perform_batch(&mut account, count, &self.config, rng)?;
            self.store.put(account_id, &account)?;
            Ok((results, account))
        })?;

        tracing::info!(
            account = account_id,
            batch = %count,
            top_hits = results
                .iter()
                .filter(|r| r.item.rarity == self.config.catalog().top_rarity())
                .count(),
            pity = account.pity,
            currency = account.currency,
            "batch committed"
        );
        Ok(results)
    }

    /// Add currency to an account; returns the new balance.
    pub fn credit(&self, account_id: &str, amount: u64) -> GachaResult<u64> {
        let balance = self.with_account_lock(account_id, || {
            let mut account = self.load(account_id)?;
            let balance = account.credit(amount)?;
            self.store.put(account_id, &account)?;
            Ok(balance)
        })?;

        tracing::info!(account = account_id, amount, balance, "account credited");
        Ok(balance)
    }

    fn load(&self, account_id: &str) -> GachaResult<Account> {
        self.store
            .get(account_id)?
            .ok_or_else(|| GachaError::AccountNotFound(account_id.to_string()))
    }

    /// Run `op` while holding the lock for one account.
    ///
    /// The lock entry is dropped from the table once no other caller holds
    /// or waits on it, so the table only tracks accounts in use.
    fn with_account_lock<T>(
        &self,
        account_id: &str,
        op: impl FnOnce() -> GachaResult<T>,
    ) -> GachaResult<T> {
        let lock = self.lock_for(account_id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            op()
        };
        self.release(account_id, lock);
        result
    }

    fn lock_for(&self, account_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(account_id.to_string()).or_default())
    }

    fn release(&self, account_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        // Clones are only handed out under the table lock, so the count is stable here
        if locks
            .get(account_id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(account_id);
        }
    }

    #[cfg(test)]
    fn lock_table_len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
