//! Catalog command handler

use anyhow::Result;
use gacha::GachaConfig;

use crate::cli::OutputFormat;
use crate::dispatch::Context;

pub fn handle(ctx: &Context, format: OutputFormat) -> Result<()> {
    let game = ctx.game_config()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(game.catalog())?),
        OutputFormat::Table => print_table(&game),
    }
    Ok(())
}

/// Per-item chance of a regular pull: tier probability times weight share
pub fn item_chance(game: &GachaConfig, item_id: &str) -> Option<f64> {
    let catalog = game.catalog();
    let item = catalog.get(item_id)?;
    let tier = catalog.items_of(item.rarity);
    let total: f64 = tier.iter().map(|i| i.weight).sum();
    let probability = catalog.probability(item.rarity)?;
    Some(probability * item.weight / total)
}

fn print_table(game: &GachaConfig) {
    let catalog = game.catalog();

    println!("Rates:");
    for (&rarity, &probability) in catalog.rates().iter().rev() {
        println!(
            "  {:<5} {:>6.2}%",
            "★".repeat(usize::from(rarity)),
            probability * 100.0
        );
    }

    println!();
    println!("Items:");
    for item in catalog.items() {
        let chance = item_chance(game, &item.id).unwrap_or(0.0);
        println!(
            "  {:<5} {:<12} {:>6.2}%",
            item.stars(),
            item.name,
            chance * 100.0
        );
    }

    let costs = game.costs();
    println!();
    println!("Single pull: {}  Ten pull: {}", costs.single, costs.ten);
    println!(
        "A {}★ is guaranteed within {} pulls",
        catalog.top_rarity(),
        game.pity_threshold()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_context;

    #[test]
    fn test_item_chance_default_roster() {
        let game = GachaConfig::default();
        let aiko = item_chance(&game, "aiko").unwrap();
        let yuna = item_chance(&game, "yuna").unwrap();
        let ren = item_chance(&game, "ren").unwrap();

        assert!((aiko - 0.02).abs() < 1e-12);
        assert!((yuna - 0.09).abs() < 1e-12);
        assert!((ren - 0.80 / 3.0).abs() < 1e-12);
        assert!(item_chance(&game, "nobody").is_none());
    }

    #[test]
    fn test_item_chances_sum_to_one() {
        let game = GachaConfig::default();
        let total: f64 = game
            .catalog()
            .items()
            .iter()
            .filter_map(|item| item_chance(&game, &item.id))
            .sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_handle_formats() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        handle(&ctx, OutputFormat::Table).unwrap();
        handle(&ctx, OutputFormat::Json).unwrap();
    }
}
