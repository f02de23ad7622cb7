//! Simulate command handler
//!
//! Runs single pulls against the configured catalog without touching any
//! account and compares observed frequencies with the configured rates.

use std::collections::BTreeMap;

use anyhow::Result;
use gacha::{
    pull_one, sample_rarity, sample_weighted, ConfigError, GachaConfig, PityState, RandomSource,
    Rarity, RngSource,
};
use serde::Serialize;

use crate::dispatch::Context;

/// Tally of a simulation run
#[derive(Debug, Default, Clone, Serialize)]
pub struct SimulationReport {
    pub pulls: u64,
    pub by_rarity: BTreeMap<Rarity, u64>,
    pub by_item: BTreeMap<String, u64>,
    /// Pulls forced to the top rarity by the pity counter
    pub guaranteed: u64,
    /// Longest run of consecutive pulls without a top-rarity result
    pub longest_drought: u64,
}

impl SimulationReport {
    pub fn rate_of(&self, rarity: Rarity) -> f64 {
        if self.pulls == 0 {
            return 0.0;
        }
        self.by_rarity.get(&rarity).copied().unwrap_or(0) as f64 / self.pulls as f64
    }
}

/// Run `pulls` single pulls, optionally carrying a pity counter between them
pub fn run<R: RandomSource + ?Sized>(
    game: &GachaConfig,
    pulls: u64,
    with_pity: bool,
    rng: &mut R,
) -> Result<SimulationReport, ConfigError> {
    let catalog = game.catalog();
    let top = catalog.top_rarity();
    let mut report = SimulationReport {
        pulls,
        ..SimulationReport::default()
    };
    let mut pity = 0u32;
    let mut drought = 0u64;

    for _ in 0..pulls {
        let item = if with_pity {
            let draw = pull_one(&mut pity, game, rng)?;
            if draw.state == PityState::Guaranteed {
                report.guaranteed += 1;
            }
            draw.item
        } else {
            let rarity = sample_rarity(catalog.rates(), rng)?;
            sample_weighted(&catalog.items_of(rarity), rng)?
        };

        *report.by_rarity.entry(item.rarity).or_default() += 1;
        *report.by_item.entry(item.id.clone()).or_default() += 1;

        if item.rarity == top {
            drought = 0;
        } else {
            drought += 1;
            report.longest_drought = report.longest_drought.max(drought);
        }
    }

    Ok(report)
}

pub fn handle(ctx: &Context, pulls: u64, seed: Option<u64>, with_pity: bool) -> Result<()> {
    let game = ctx.game_config()?;
    let seed = seed.unwrap_or_else(rand::random);
    tracing::debug!(pulls, seed, with_pity, "starting simulation");

    let report = run(&game, pulls, with_pity, &mut RngSource::seeded(seed))?;
    let catalog = game.catalog();

    println!(
        "Simulated {} pulls (seed {}, pity {})",
        report.pulls,
        seed,
        if with_pity { "on" } else { "off" }
    );
    println!();
    println!("{:<7} {:>10} {:>9} {:>9}", "Rarity", "Count", "Observed", "Rate");
    for (&rarity, &probability) in catalog.rates().iter().rev() {
        println!(
            "{:<7} {:>10} {:>8.3}% {:>8.3}%",
            "★".repeat(usize::from(rarity)),
            report.by_rarity.get(&rarity).copied().unwrap_or(0),
            report.rate_of(rarity) * 100.0,
            probability * 100.0
        );
    }

    println!();
    for item in catalog.items() {
        println!(
            "  {:<5} {:<12} {:>10}",
            item.stars(),
            item.name,
            report.by_item.get(&item.id).copied().unwrap_or(0)
        );
    }

    println!();
    if with_pity {
        println!("Pity guarantees: {}", report.guaranteed);
    }
    println!("Longest run without a {}★: {}", catalog.top_rarity(), report.longest_drought);
    Ok(())
}
