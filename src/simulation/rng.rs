//! Per-trial random sources
//!
//! Every trial gets its own generator derived from the trial index, so a run
//! is reproducible and trials can execute in any order or in parallel.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Produces an independent random source for each trial
pub trait RngFactory: Send + Sync {
    type Rng: RngCore;

    fn rng_for_trial(&self, trial: u64) -> Self::Rng;
}

/// ChaCha8 generator seeded once, with the trial index selecting the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededRngFactory {
    seed: u64,
}

impl SeededRngFactory {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngFactory for SeededRngFactory {
    type Rng = ChaCha8Rng;

    fn rng_for_trial(&self, trial: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(trial);
        rng
    }
}
