//! Shared types for account storage.

use chrono::{DateTime, Utc};
use gacha::Account;
use serde::{Deserialize, Serialize};

/// Stored account: credentials plus game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub username: String,
    /// Lowercase hex SHA-256 digest
    pub password_hash: String,
    pub account: Account,
}

/// Listing row for an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub username: String,
    pub currency: u64,
    pub pity: u32,
    pub collection_size: u64,
    pub created_at: DateTime<Utc>,
}

/// Database statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbStats {
    pub account_count: i64,
    pub history_count: i64,
    pub total_currency: i64,
}
