//! Per-account state mutated by pulls and credits.

use crate::catalog::Item;
use crate::error::{GachaError, GachaResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// One drawn item with the time of the draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullResult {
    pub item: Item,
    pub pulled_at: DateTime<Utc>,
    /// Forced by the pity counter rather than drawn from the rates
    #[serde(default)]
    pub guaranteed: bool,
}

/// Player account
///
/// `currency` never goes negative, `pity` stays below the configured
/// threshold, and `history` is most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub currency: u64,
    pub pity: u32,
    /// Item id → owned count; a missing key means zero
    pub inventory: BTreeMap<String, u32>,
    pub history: VecDeque<PullResult>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Fresh account with an empty collection
    pub fn new(currency: u64) -> Self {
        Self {
            currency,
            pity: 0,
            inventory: BTreeMap::new(),
            history: VecDeque::new(),
            created_at: Utc::now(),
        }
    }

    /// Number of copies of an item owned
    pub fn owned(&self, item_id: &str) -> u32 {
        self.inventory.get(item_id).copied().unwrap_or(0)
    }

    /// Total number of items owned across the collection
    pub fn collection_size(&self) -> u64 {
        self.inventory.values().map(|&count| u64::from(count)).sum()
    }

    /// Add currency; returns the new balance.
    ///
    /// Pity, inventory and history are untouched.
    pub fn credit(&mut self, amount: u64) -> GachaResult<u64> {
        if amount == 0 {
            return Err(GachaError::InvalidAmount);
        }
        self.currency = self
            .currency
            .checked_add(amount)
            .ok_or(GachaError::InvalidAmount)?;
        Ok(self.currency)
    }

    /// Prepend a result, drop the oldest entries past `limit`, bump inventory.
    pub(crate) fn record(&mut self, result: PullResult, limit: usize) {
        let count = self.inventory.entry(result.item.id.clone()).or_insert(0);
        *count = count.saturating_add(1);
        self.history.push_front(result);
        self.history.truncate(limit);
    }
}
