//! Batch pull orchestration.
//!
//! A batch is all-or-nothing against the account: the full price is checked
//! before anything changes, and every pull of the batch is applied to a
//! working copy that replaces the account only when the batch completes.

use crate::account::{Account, PullResult};
use crate::config::GachaConfig;
use crate::error::{GachaError, GachaResult};
use crate::pity::{pull_one, PityState};
use crate::rng::RandomSource;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Supported batch sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullCount {
    Single,
    Ten,
}

impl PullCount {
    /// Number of pulls in the batch
    pub fn count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Ten => 10,
        }
    }
}

impl TryFrom<u32> for PullCount {
    type Error = GachaError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Single),
            10 => Ok(Self::Ten),
            other => Err(GachaError::InvalidPullCount(other)),
        }
    }
}

impl std::fmt::Display for PullCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Ten => write!(f, "ten"),
        }
    }
}

/// Run one batch against an account held in memory.
///
/// On `InsufficientFunds` (or any other error) the account is left exactly
/// as it was. Results come back in draw order.
pub fn perform_batch<R: RandomSource + ?Sized>(
    account: &mut Account,
    count: PullCount,
    config: &GachaConfig,
    rng: &mut R,
) -> GachaResult<Vec<PullResult>> {
    let cost = config.costs().cost_of(count);
    if account.currency < cost {
        return Err(GachaError::InsufficientFunds {
            required: cost,
            available: account.currency,
        });
    }

    let mut next = account.clone();
    next.currency -= cost;

    let mut results = Vec::with_capacity(count.count());
    for _ in 0..count.count() {
        let draw = pull_one(&mut next.pity, config, rng)?;
        let result = PullResult {
            item: draw.item.clone(),
            pulled_at: Utc::now(),
            guaranteed: draw.state == PityState::Guaranteed,
        };
        tracing::debug!(
            item = %result.item.id,
            rarity = result.item.rarity,
            guaranteed = result.guaranteed,
            pity = next.pity,
            "pull resolved"
        );
        next.record(result.clone(), config.history_limit());
        results.push(result);
    }

    *account = next;
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngSource, ScriptedSource};

    #[test]
    fn test_pull_count_conversion() {
        assert_eq!(PullCount::try_from(1).unwrap(), PullCount::Single);
        assert_eq!(PullCount::try_from(10).unwrap(), PullCount::Ten);
        assert!(matches!(
            PullCount::try_from(5),
            Err(GachaError::InvalidPullCount(5))
        ));
        assert_eq!(PullCount::Ten.to_string(), "ten");
    }

    #[test]
    fn test_ten_pull_with_exact_funds() {
        let config = GachaConfig::default();
        let mut account = Account::new(900);
        let mut rng = RngSource::seeded(5);

        let results = perform_batch(&mut account, PullCount::Ten, &config, &mut rng).unwrap();
        assert_eq!(results.len(), 10);
        assert_eq!(account.currency, 0);
        assert_eq!(account.history.len(), 10);
        assert_eq!(account.collection_size(), 10);
    }

    #[test]
    fn test_one_short_is_rejected_without_changes() {
        let config = GachaConfig::default();
        let mut account = Account::new(899);
        account.pity = 42;
        let before = account.clone();
        let mut rng = RngSource::seeded(5);

        let err = perform_batch(&mut account, PullCount::Ten, &config, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            GachaError::InsufficientFunds {
                required: 900,
                available: 899
            }
        ));
        assert_eq!(account, before);
    }

    #[test]
    fn test_single_pull_costs_single_price() {
        let config = GachaConfig::default();
        let mut account = Account::new(150);
        let mut rng = ScriptedSource::constant(0.9);

        perform_batch(&mut account, PullCount::Single, &config, &mut rng).unwrap();
        assert_eq!(account.currency, 50);
        assert_eq!(account.pity, 1);
        assert_eq!(account.history.len(), 1);
    }

    #[test]
    fn test_results_in_draw_order_history_reversed() {
        let config = GachaConfig::default();
        let mut account = Account::new(900);
        // Aiko, Ren, Mika, then the trailing 0.6 repeats
        let mut rng = ScriptedSource::new([0.0, 0.0, 0.9, 0.0, 0.1, 0.6]);

        let results = perform_batch(&mut account, PullCount::Ten, &config, &mut rng).unwrap();
        assert_eq!(results[0].item.id, "aiko");
        assert_eq!(results[1].item.id, "ren");
        assert_eq!(results[2].item.id, "mika");

        let history: Vec<&PullResult> = account.history.iter().collect();
        let mut reversed: Vec<&PullResult> = results.iter().collect();
        reversed.reverse();
        assert_eq!(history, reversed);
    }

    #[test]
    fn test_history_bounded_and_evicts_oldest() {
        let config = GachaConfig::default();
        let mut account = Account::new(900 * 25);
        let mut rng = RngSource::seeded(11);

        let mut all = Vec::new();
        for _ in 0..25 {
            all.extend(perform_batch(&mut account, PullCount::Ten, &config, &mut rng).unwrap());
        }

        assert_eq!(all.len(), 250);
        assert_eq!(account.history.len(), 200);
        let expected: Vec<&PullResult> = all.iter().rev().take(200).collect();
        let actual: Vec<&PullResult> = account.history.iter().collect();
        assert_eq!(actual, expected);
        // Inventory still counts every pull, including evicted history
        assert_eq!(account.collection_size(), 250);
    }

    #[test]
    fn test_guaranteed_flag_recorded() {
        let config = GachaConfig::default();
        let mut account = Account::new(100);
        account.pity = 89;
        let mut rng = ScriptedSource::constant(0.9);

        let results = perform_batch(&mut account, PullCount::Single, &config, &mut rng).unwrap();
        assert!(results[0].guaranteed);
        assert_eq!(results[0].item.id, "aiko");
    }

    #[test]
    fn test_pity_carries_across_pulls_in_batch() {
        let config = GachaConfig::default();
        let mut account = Account::new(900);
        account.pity = 85;
        let mut rng = ScriptedSource::constant(0.9);

        let results = perform_batch(&mut account, PullCount::Ten, &config, &mut rng).unwrap();
        let rarities: Vec<u8> = results.iter().map(|r| r.item.rarity).collect();
        // 85, 86, 87, 88 miss; the fifth pull sees 89 and is forced
        assert_eq!(rarities, vec![3, 3, 3, 3, 5, 3, 3, 3, 3, 3]);
        assert_eq!(account.pity, 5);
    }
}
