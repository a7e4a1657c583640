use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;

/// Source of the two uniform draws a roll consumes. Kept behind a trait so a
/// scripted source can stand in for entropy in tests.
pub trait RollSource {
    /// Uniform draw in `[0, 100)`.
    fn percent(&mut self) -> f64;

    /// Uniform integer draw in `[lo, hi]` inclusive.
    fn value_between(&mut self, lo: u64, hi: u64) -> u64;
}

/// Production source backed by `StdRng`, either OS-seeded or seeded from a
/// `--seed` flag for reproducible sessions.
pub struct EntropySource {
    rng: StdRng,
}

impl EntropySource {
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RollSource for EntropySource {
    fn percent(&mut self) -> f64 {
        self.rng.random_range(0.0..100.0)
    }

    fn value_between(&mut self, lo: u64, hi: u64) -> u64 {
        self.rng.random_range(lo..=hi)
    }
}

/// Plays back a fixed script of draws, one `(percent, value)` pair per roll.
/// Runs dry to the lowest legal draw, so a forgotten pair cannot panic a test.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    percents: VecDeque<f64>,
    values: VecDeque<u64>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roll(mut self, percent: f64, value: u64) -> Self {
        self.percents.push_back(percent);
        self.values.push_back(value);
        self
    }
}

impl RollSource for ScriptedSource {
    fn percent(&mut self) -> f64 {
        self.percents.pop_front().unwrap_or(0.0)
    }

    fn value_between(&mut self, lo: u64, hi: u64) -> u64 {
        self.values.pop_front().unwrap_or(lo).clamp(lo, hi)
    }
}
