//! Error types for the reward engine.

use crate::catalog::Rarity;
use crate::store::StoreError;

/// Malformed catalog or tuning.
///
/// Detected when a [`Catalog`](crate::Catalog) or [`GachaConfig`](crate::GachaConfig)
/// is built, so a bad configuration never serves a pull.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("catalog has no items")]
    EmptyCatalog,

    #[error("rarity table is empty")]
    NoRarities,

    #[error("duplicate item id: {0}")]
    DuplicateId(String),

    #[error("item {id} has invalid weight {weight}")]
    InvalidWeight { id: String, weight: f64 },

    #[error("rarity {rarity} has invalid probability {probability}")]
    InvalidProbability { rarity: Rarity, probability: f64 },

    #[error("rarity probabilities sum to {0}, expected 1")]
    ProbabilitySum(f64),

    #[error("rarity {0} has a nonzero probability but no items")]
    EmptyTier(Rarity),

    #[error("item {id} has rarity {rarity}, which has no probability entry")]
    UnratedTier { id: String, rarity: Rarity },

    #[error("top rarity {0} has no positive probability")]
    UnreachableTopTier(Rarity),

    #[error("cannot sample from an empty item pool")]
    EmptyPool,

    #[error("pity threshold must be at least 1")]
    InvalidPityThreshold,

    #[error("history limit must be at least 1")]
    InvalidHistoryLimit,

    #[error("invalid costs: single {single}, ten {ten}; both must be positive and ten must undercut ten singles")]
    InvalidCostTable { single: u64, ten: u64 },
}

/// Error type for pulls and account operations
#[derive(Debug, thiserror::Error)]
pub enum GachaError {
    #[error("insufficient funds: batch costs {required}, balance is {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("unsupported pull count {0}, expected 1 or 10")]
    InvalidPullCount(u32),

    #[error("credit amount must be positive and keep the balance in range")]
    InvalidAmount,
}

/// Result type for engine operations
pub type GachaResult<T> = Result<T, GachaError>;
