//! Pity counter state machine.
//!
//! The counter lives on the account. Before every pull it is compared with
//! `threshold - 1`: at or above that value the pull is forced to the top
//! rarity, otherwise the regular samplers run. Any top-rarity result resets
//! the counter, any other result increments it by one.

use crate::catalog::Item;
use crate::config::GachaConfig;
use crate::error::ConfigError;
use crate::rng::RandomSource;
use crate::sampler::{sample_rarity, sample_uniform, sample_weighted};

/// Conceptual state derived from the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PityState {
    /// Regular weighted draw
    Normal,
    /// Next pull is forced to the top rarity
    Guaranteed,
}

impl PityState {
    pub fn of(pity: u32, threshold: u32) -> Self {
        if pity >= threshold.saturating_sub(1) {
            Self::Guaranteed
        } else {
            Self::Normal
        }
    }
}

/// One resolved pull
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draw<'c> {
    pub item: &'c Item,
    /// State the counter was in when the pull was decided
    pub state: PityState,
}

/// Resolve a single pull and advance the counter.
pub fn pull_one<'c, R: RandomSource + ?Sized>(
    pity: &mut u32,
    config: &'c GachaConfig,
    rng: &mut R,
) -> Result<Draw<'c>, ConfigError> {
    let catalog = config.catalog();
    let top = catalog.top_rarity();
    let state = PityState::of(*pity, config.pity_threshold());

    let item = match state {
        PityState::Guaranteed => {
            let item = sample_uniform(&catalog.items_of(top), rng)?;
            *pity = 0;
            item
        }
        PityState::Normal => {
            let rarity = sample_rarity(catalog.rates(), rng)?;
            let item = sample_weighted(&catalog.items_of(rarity), rng)?;
            if item.rarity == top {
                *pity = 0;
            } else {
                *pity += 1;
            }
            item
        }
    };

    Ok(Draw { item, state })
}
