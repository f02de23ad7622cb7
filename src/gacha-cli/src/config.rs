//! Configuration management for gacha CLI

use anyhow::{Context, Result};
use gacha::GachaConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Database used when `--db` is not given
    pub db_path: Option<PathBuf>,
    /// Game configuration used when `--catalog` is not given
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("gacha");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Database path: command line, then config file, then the built-in default
    pub fn resolve_db(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(gacha_store::DEFAULT_DB_PATH))
    }

    /// Game configuration from the command line or config file, else the built-in one
    pub fn game_config(&self, cli: Option<&Path>) -> Result<GachaConfig> {
        match cli.or(self.catalog_path.as_deref()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading game configuration");
                GachaConfig::load(path).with_context(|| {
                    format!("Failed to load game configuration from {}", path.display())
                })
            }
            None => Ok(GachaConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            db_path: Some(PathBuf::from("/tmp/gacha.db")),
            catalog_path: None,
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_toml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "db_path = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_resolve_db_precedence() {
        let config = Config {
            db_path: Some(PathBuf::from("configured.db")),
            catalog_path: None,
        };
        assert_eq!(
            config.resolve_db(Some(PathBuf::from("flag.db"))),
            PathBuf::from("flag.db")
        );
        assert_eq!(config.resolve_db(None), PathBuf::from("configured.db"));
        assert_eq!(
            Config::default().resolve_db(None),
            PathBuf::from(gacha_store::DEFAULT_DB_PATH)
        );
    }

    #[test]
    fn test_game_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        fs::write(
            &path,
            r#"{
                "catalog": {
                    "items": [
                        {"id": "a", "name": "A", "rarity": 5, "weight": 1.0},
                        {"id": "b", "name": "B", "rarity": 3, "weight": 1.0}
                    ],
                    "rates": {"5": 0.5, "3": 0.5}
                },
                "pity_threshold": 10
            }"#,
        )
        .unwrap();

        let game = Config::default().game_config(Some(&path)).unwrap();
        assert_eq!(game.pity_threshold(), 10);
        assert_eq!(game.catalog().items().len(), 2);

        let fallback = Config::default().game_config(None).unwrap();
        assert_eq!(fallback, GachaConfig::default());
    }
}
