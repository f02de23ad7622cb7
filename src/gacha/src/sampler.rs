//! Rarity and item samplers.
//!
//! Both samplers consume exactly one draw and fall back to the last
//! candidate in iteration order when floating-point rounding leaves the
//! draw unmatched. Tests rely on that fallback, keep it stable.

use crate::catalog::{Item, Rarity};
use crate::error::ConfigError;
use crate::rng::RandomSource;
use std::collections::BTreeMap;

/// Pick a rarity tier from the probability table.
///
/// Tiers are walked from the highest rarity down, accumulating probability;
/// the first tier whose cumulative bound exceeds the draw wins. Zero
/// probability tiers never win and are not eligible for the fallback.
pub fn sample_rarity<R: RandomSource + ?Sized>(
    rates: &BTreeMap<Rarity, f64>,
    rng: &mut R,
) -> Result<Rarity, ConfigError> {
    let u = rng.next_unit();
    let mut cumulative = 0.0;
    let mut last = None;

    for (&rarity, &probability) in rates.iter().rev() {
        if probability <= 0.0 {
            continue;
        }
        cumulative += probability;
        if u < cumulative {
            return Ok(rarity);
        }
        last = Some(rarity);
    }

    last.ok_or(ConfigError::NoRarities)
}

/// Pick one item proportionally to its weight.
pub fn sample_weighted<'a, R: RandomSource + ?Sized>(
    items: &[&'a Item],
    rng: &mut R,
) -> Result<&'a Item, ConfigError> {
    let Some(&fallback) = items.last() else {
        return Err(ConfigError::EmptyPool);
    };

    let total: f64 = items.iter().map(|item| item.weight).sum();
    let mut remaining = rng.next_unit() * total;
    for &item in items {
        remaining -= item.weight;
        if remaining <= 0.0 {
            return Ok(item);
        }
    }

    Ok(fallback)
}

/// Pick one item with equal probability
pub fn sample_uniform<'a, R: RandomSource + ?Sized>(
    items: &[&'a Item],
    rng: &mut R,
) -> Result<&'a Item, ConfigError> {
    if items.is_empty() {
        return Err(ConfigError::EmptyPool);
    }
    let index = (rng.next_unit() * items.len() as f64).floor() as usize;
    Ok(items[index.min(items.len() - 1)])
}
