//! # gacha
//!
//! Reward engine for a small collection game.
//!
//! This library provides:
//! - A validated, immutable catalog of weighted items grouped into rarity tiers
//! - Rarity and weighted item samplers driven by an injectable random source
//! - The pity counter that guarantees a top-rarity reward after a run of misses
//! - Batch pull orchestration (cost check, history, inventory) over an account store
//!
//! ## Example
//!
//! ```
//! use gacha::{Account, Gacha, GachaConfig, MemoryStore, PullCount, RngSource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! store.insert("alice", Account::new(1_000));
//!
//! let gacha = Gacha::new(GachaConfig::default(), store)?;
//! let mut rng = RngSource::seeded(7);
//!
//! let results = gacha.pull("alice", PullCount::Ten, &mut rng)?;
//! assert_eq!(results.len(), 10);
//! assert_eq!(gacha.account("alice")?.currency, 100);
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod pity;
pub mod pull;
pub mod rng;
pub mod sampler;
pub mod store;

#[doc(inline)]
pub use account::{Account, PullResult};
#[doc(inline)]
pub use catalog::{Catalog, Item, Rarity};
#[doc(inline)]
pub use config::{
    CostTable, GachaConfig, LoadError, COST_SINGLE, COST_TEN, HISTORY_LIMIT, PITY_THRESHOLD,
    STARTING_CURRENCY,
};
#[doc(inline)]
pub use engine::Gacha;
#[doc(inline)]
pub use error::{ConfigError, GachaError, GachaResult};
#[doc(inline)]
pub use pity::{pull_one, Draw, PityState};
#[doc(inline)]
pub use pull::{perform_batch, PullCount};
#[doc(inline)]
pub use rng::{RandomSource, RngSource, ScriptedSource};
#[doc(inline)]
pub use sampler::{sample_rarity, sample_uniform, sample_weighted};
#[doc(inline)]
pub use store::{AccountStore, MemoryStore, StoreError};
