//! Injectable randomness
//!
//! Revenue amounts, trend sampling and invoice numbers all draw from a
//! [`RandomSource`] so tests and replays can pin them.

use rand::prelude::*;
use std::sync::Mutex;

/// Source of randomness shared by the store and the agents
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `low..high`; returns `low` when the range is empty
    fn amount_between(&self, low: u64, high: u64) -> u64;

    /// Shuffle `items` in place
    fn shuffle(&self, items: &mut [String]);

    /// Uniform integer in `0..n`
    fn below(&self, n: u64) -> u64 {
        self.amount_between(0, n)
    }
}

/// `StdRng` backed source
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl SeededRandom {
    /// Seed from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a source with a fixed seed (for reproducibility in tests)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn amount_between(&self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(low..high)
    }

    fn shuffle(&self, items: &mut [String]) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        items.shuffle(&mut *rng);
    }
}

/// Deterministic source: always the same amount, never reorders
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    pub amount: u64,
}

impl FixedRandom {
    pub fn new(amount: u64) -> Self {
        Self { amount }
    }
}

impl RandomSource for FixedRandom {
    fn amount_between(&self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        self.amount.clamp(low, high - 1)
    }

    fn shuffle(&self, _items: &mut [String]) {}
}
