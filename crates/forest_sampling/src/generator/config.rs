//! Run-level settings that are not part of the sampling design itself.
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::DEFAULT_ATTEMPTS_PER_POINT;

/// Configuration for one generation run.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationConfig {
    /// Base seed for all random samplers. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    /// Random draws allowed per requested plot before a sampler gives up.
    pub attempts_per_point: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            attempts_per_point: DEFAULT_ATTEMPTS_PER_POINT,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the base seed, making random and stratified output reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_attempts_per_point(mut self, attempts_per_point: usize) -> Self {
        self.attempts_per_point = attempts_per_point;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.attempts_per_point == 0 {
            return Err(Error::Configuration(
                "attempts_per_point must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// The configured seed, or a fresh one from the thread RNG.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().next_u64())
    }
}
