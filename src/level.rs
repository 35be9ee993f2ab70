//! Random tower heights for new skip list nodes.
//!
//! Heights follow a geometric distribution: start at 1 and keep promoting
//! with probability `p` until a flip fails or the ceiling is reached. With
//! `p = 0.25` about one node in four reaches level 2, one in sixteen level 3,
//! and so on, which keeps expected search cost logarithmic without any
//! rebalancing.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_core::OsRng;
use rand_core::RngCore;

/// Hard upper bound on tower height. 32 levels covers far more users than
/// fit in memory at any sane promotion probability.
pub const MAX_LEVEL_CEILING: usize = 32;

/// Default tower height ceiling.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Default promotion probability.
pub const DEFAULT_P_FACTOR: f64 = 0.25;

/// Used only when the OS entropy source is unavailable.
const FALLBACK_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Draws node levels. One per board; never shared between threads.
#[derive(Clone, Debug)]
pub struct LevelGenerator {
    rng: SmallRng,
    p_factor: f64,
    max_level: usize,
}

impl LevelGenerator {
    /// Generator seeded from the operating system's secure random source.
    pub fn from_entropy(max_level: usize, p_factor: f64) -> LevelGenerator {
        let mut seed = [0u8; 8];
        let seed = match OsRng.try_fill_bytes(&mut seed) {
            Ok(()) => u64::from_le_bytes(seed),
            Err(err) => {
                tracing::warn!(error = %err, "os entropy unavailable, using fixed level seed");
                FALLBACK_SEED
            }
        };
        return LevelGenerator::with_seed(max_level, p_factor, seed);
    }

    /// Deterministic generator, for reproducible layouts.
    pub fn with_seed(max_level: usize, p_factor: f64, seed: u64) -> LevelGenerator {
        debug_assert!((1..=MAX_LEVEL_CEILING).contains(&max_level));
        debug_assert!((0.0..1.0).contains(&p_factor));
        return LevelGenerator {
            rng: SmallRng::seed_from_u64(seed),
            p_factor,
            max_level: max_level.clamp(1, MAX_LEVEL_CEILING),
        };
    }

    pub fn max_level(&self) -> usize {
        return self.max_level;
    }

    pub fn p_factor(&self) -> f64 {
        return self.p_factor;
    }

    /// Draw a level in `1..=max_level`.
    pub fn next_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen_bool(self.p_factor) {
            level += 1;
        }
        return level;
    }
}
