//! Immutable engine configuration.
//!
//! Everything that tunes the engine (catalog, pity threshold, prices,
//! history bound, starting balance) is carried by one [`GachaConfig`] value
//! that is passed explicitly, so several tunings can coexist in one process.

use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::pull::PullCount;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Consecutive-miss threshold for the top-rarity guarantee
pub const PITY_THRESHOLD: u32 = 90;

/// Price of a single pull
pub const COST_SINGLE: u64 = 100;

/// Price of a ten-pull bundle
pub const COST_TEN: u64 = 900;

/// Maximum number of history entries kept per account
pub const HISTORY_LIMIT: usize = 200;

/// Balance of a freshly created account
pub const STARTING_CURRENCY: u64 = 500;

/// Price per batch size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTable {
    pub single: u64,
    pub ten: u64,
}

impl CostTable {
    pub fn cost_of(&self, count: PullCount) -> u64 {
        match count {
            PullCount::Single => self.single,
            PullCount::Ten => self.ten,
        }
    }

    /// Both prices positive, and the bundle cheaper than ten singles
    pub fn validate(&self) -> Result<(), ConfigError> {
        let undercuts = self
            .single
            .checked_mul(10)
            .map_or(true, |ten_singles| self.ten < ten_singles);
        if self.single == 0 || self.ten == 0 || !undercuts {
            return Err(ConfigError::InvalidCostTable {
                single: self.single,
                ten: self.ten,
            });
        }
        Ok(())
    }
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            single: COST_SINGLE,
            ten: COST_TEN,
        }
    }
}

fn default_pity_threshold() -> u32 {
    PITY_THRESHOLD
}

fn default_history_limit() -> usize {
    HISTORY_LIMIT
}

fn default_starting_currency() -> u64 {
    STARTING_CURRENCY
}

/// On-disk shape of a configuration file; tuning fields are optional
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    catalog: Catalog,
    #[serde(default = "default_pity_threshold")]
    pity_threshold: u32,
    #[serde(default)]
    costs: CostTable,
    #[serde(default = "default_history_limit")]
    history_limit: usize,
    #[serde(default = "default_starting_currency")]
    starting_currency: u64,
}

/// Validated engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFile", into = "ConfigFile")]
pub struct GachaConfig {
    catalog: Catalog,
    pity_threshold: u32,
    costs: CostTable,
    history_limit: usize,
    starting_currency: u64,
}

impl TryFrom<ConfigFile> for GachaConfig {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let config = GachaConfig {
            catalog: file.catalog,
            pity_threshold: file.pity_threshold,
            costs: file.costs,
            history_limit: file.history_limit,
            starting_currency: file.starting_currency,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<GachaConfig> for ConfigFile {
    fn from(config: GachaConfig) -> Self {
        ConfigFile {
            catalog: config.catalog,
            pity_threshold: config.pity_threshold,
            costs: config.costs,
            history_limit: config.history_limit,
            starting_currency: config.starting_currency,
        }
    }
}

/// Failure loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl GachaConfig {
    /// Configuration with default tuning around the given catalog
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            pity_threshold: PITY_THRESHOLD,
            costs: CostTable::default(),
            history_limit: HISTORY_LIMIT,
            starting_currency: STARTING_CURRENCY,
        }
    }

    pub fn with_pity_threshold(mut self, threshold: u32) -> Self {
        self.pity_threshold = threshold;
        self
    }

    pub fn with_costs(mut self, costs: CostTable) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_starting_currency(mut self, amount: u64) -> Self {
        self.starting_currency = amount;
        self
    }

    /// Check the tuning values. The catalog validates itself on construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pity_threshold == 0 {
            return Err(ConfigError::InvalidPityThreshold);
        }
        if self.history_limit == 0 {
            return Err(ConfigError::InvalidHistoryLimit);
        }
        self.costs.validate()
    }

    /// Load a JSON configuration file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pity_threshold(&self) -> u32 {
        self.pity_threshold
    }

    pub fn costs(&self) -> CostTable {
        self.costs
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn starting_currency(&self) -> u64 {
        self.starting_currency
    }
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}
