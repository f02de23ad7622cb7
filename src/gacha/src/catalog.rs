//! Static reward catalog: items and per-tier base probabilities.
//!
//! A [`Catalog`] is validated once when built and never mutated afterwards.
//! Deserialization goes through the same validation, so a catalog file with
//! a missing tier or a bad probability table is rejected at load time.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Rarity tier (star count)
pub type Rarity = u8;

/// Tolerance for the rarity probability sum
const PROBABILITY_EPSILON: f64 = 1e-9;

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    /// Relative draw weight within the item's tier
    pub weight: f64,
}

impl Item {
    pub fn new(id: &str, name: &str, rarity: Rarity, weight: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rarity,
            weight,
        }
    }

    /// Star string for display, e.g. `★★★★★`
    pub fn stars(&self) -> String {
        "★".repeat(usize::from(self.rarity))
    }
}

/// On-disk shape of a catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    items: Vec<Item>,
    rates: BTreeMap<Rarity, f64>,
}

/// Validated item roster plus rarity table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogFile", into = "CatalogFile")]
pub struct Catalog {
    items: Vec<Item>,
    rates: BTreeMap<Rarity, f64>,
    top_rarity: Rarity,
}

impl TryFrom<CatalogFile> for Catalog {
    type Error = ConfigError;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        Self::new(file.items, file.rates)
    }
}

impl From<Catalog> for CatalogFile {
    fn from(catalog: Catalog) -> Self {
        CatalogFile {
            items: catalog.items,
            rates: catalog.rates,
        }
    }
}

impl Catalog {
    /// Build and validate a catalog.
    ///
    /// Items keep their given order; the weighted sampler walks them in it.
    pub fn new(items: Vec<Item>, rates: BTreeMap<Rarity, f64>) -> Result<Self, ConfigError> {
        if items.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if rates.is_empty() {
            return Err(ConfigError::NoRarities);
        }

        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(ConfigError::DuplicateId(item.id.clone()));
            }
            if !item.weight.is_finite() || item.weight <= 0.0 {
                return Err(ConfigError::InvalidWeight {
                    id: item.id.clone(),
                    weight: item.weight,
                });
            }
            if !rates.contains_key(&item.rarity) {
                return Err(ConfigError::UnratedTier {
                    id: item.id.clone(),
                    rarity: item.rarity,
                });
            }
        }

        for (&rarity, &probability) in &rates {
            if !(0.0..=1.0).contains(&probability) {
                return Err(ConfigError::InvalidProbability {
                    rarity,
                    probability,
                });
            }
            if probability > 0.0 && !items.iter().any(|item| item.rarity == rarity) {
                return Err(ConfigError::EmptyTier(rarity));
            }
        }

        let sum: f64 = rates.values().sum();
        if (sum - 1.0).abs() > PROBABILITY_EPSILON {
            return Err(ConfigError::ProbabilitySum(sum));
        }

        let top_rarity = items
            .iter()
            .map(|item| item.rarity)
            .max()
            .ok_or(ConfigError::EmptyCatalog)?;
        if rates.get(&top_rarity).map_or(true, |&p| p <= 0.0) {
            return Err(ConfigError::UnreachableTopTier(top_rarity));
        }

        Ok(Self {
            items,
            rates,
            top_rarity,
        })
    }

    /// Parse a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// All items in catalog order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Rarity → base probability
    pub fn rates(&self) -> &BTreeMap<Rarity, f64> {
        &self.rates
    }

    /// Highest rarity present in the roster; the pity guarantee targets it.
    pub fn top_rarity(&self) -> Rarity {
        self.top_rarity
    }

    /// Base probability for a tier, if the tier is rated
    pub fn probability(&self, rarity: Rarity) -> Option<f64> {
        self.rates.get(&rarity).copied()
    }

    /// Items of one tier, in catalog order
    pub fn items_of(&self, rarity: Rarity) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| item.rarity == rarity)
            .collect()
    }

    /// Look up an item by id
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }
}

impl Default for Catalog {
    /// The built-in six-character roster
    fn default() -> Self {
        let items = vec![
            Item::new("aiko", "Aiko", 5, 1.0),
            Item::new("yuna", "Yuna", 4, 4.0),
            Item::new("mika", "Mika", 4, 4.0),
            Item::new("ren", "Ren", 3, 30.0),
            Item::new("kai", "Kai", 3, 30.0),
            Item::new("sora", "Sora", 3, 30.0),
        ];
        let rates = BTreeMap::from([(5, 0.02), (4, 0.18), (3, 0.80)]);
        Self {
            items,
            rates,
            top_rarity: 5,
        }
    }
}
