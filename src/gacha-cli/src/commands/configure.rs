//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up gacha CLI defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
///
/// # Arguments
/// * `db` - Optional database path to set as default
/// * `catalog` - Optional game configuration file to set as default
/// * `show` - If true, show current configuration
pub fn handle(db: Option<PathBuf>, catalog: Option<PathBuf>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if apply(&mut config, db, catalog) {
        config.save()?;
        println!("Configuration updated");
        if let Ok(path) = Config::config_path() {
            println!("Config saved to: {}", path.display());
        }
    } else {
        show_usage();
    }

    Ok(())
}

/// Apply requested changes; returns whether anything changed
fn apply(config: &mut Config, db: Option<PathBuf>, catalog: Option<PathBuf>) -> bool {
    let mut changed = false;
    if let Some(path) = db {
        config.db_path = Some(path);
        changed = true;
    }
    if let Some(path) = catalog {
        config.catalog_path = Some(path);
        changed = true;
    }
    changed
}

/// Display current configuration
fn show_config(config: &Config) {
    match &config.db_path {
        Some(path) => println!("Database: {}", path.display()),
        None => println!("Database: {} (default)", gacha_store::DEFAULT_DB_PATH),
    }
    match &config.catalog_path {
        Some(path) => println!("Game config: {}", path.display()),
        None => println!("Game config: built-in"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: gacha configure --set-db PATH");
    println!("   or: gacha configure --set-catalog GAME.json");
    println!("   or: gacha configure --show");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_usage_does_not_panic() {
        show_usage();
    }

    #[test]
    fn test_config_path_exists() {
        assert!(Config::config_path().is_ok());
    }

    #[test]
    fn test_apply() {
        let mut config = Config::default();
        assert!(!apply(&mut config, None, None));
        assert_eq!(config, Config::default());

        assert!(apply(&mut config, Some(PathBuf::from("a.db")), None));
        assert_eq!(config.db_path, Some(PathBuf::from("a.db")));
        assert!(config.catalog_path.is_none());

        assert!(apply(&mut config, None, Some(PathBuf::from("game.json"))));
        assert_eq!(config.db_path, Some(PathBuf::from("a.db")));
        assert_eq!(config.catalog_path, Some(PathBuf::from("game.json")));
    }

    #[test]
    fn test_show_config_does_not_panic() {
        show_config(&Config::default());
        show_config(&Config {
            db_path: Some(PathBuf::from("x.db")),
            catalog_path: Some(PathBuf::from("y.json")),
        });
    }
}
