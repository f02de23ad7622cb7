//! Uniform random sources for the samplers.
//!
//! The engine never reaches for an ambient generator. Callers hand in a
//! [`RandomSource`]: a seeded or entropy-backed [`RngSource`] in production,
//! or a [`ScriptedSource`] replaying exact draws in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Producer of uniform draws in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Adapter from any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }

    pub fn into_inner(self) -> R {
        self.0
    }
}

impl RngSource<StdRng> {
    /// Reproducible source for simulations and tests
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Replays a fixed list of draws, then keeps repeating the last one.
///
/// Values are returned as given and are not clamped, which lets tests push
/// the samplers into their rounding fallbacks.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: VecDeque<f64>,
    last: f64,
}

impl ScriptedSource {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            last: 0.0,
        }
    }

    /// Source that always yields `value`
    pub fn constant(value: f64) -> Self {
        Self {
            values: VecDeque::new(),
            last: value,
        }
    }

    /// Draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if let Some(value) = self.values.pop_front() {
            self.last = value;
        }
        self.last
    }
}
