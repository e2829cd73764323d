//! Random (rejection-sampled) plot placement.
use rand::RngCore;
use tracing::debug;

use crate::design::SamplingType;
use crate::geometry::SamplingRegion;
use crate::sampling::{
    rejection_fill, PlotSampling, SampleSet, SpacingIndex, DEFAULT_ATTEMPTS_PER_POINT,
};

/// Uniform random sampling with an optional minimum spacing.
///
/// Draws uniform points in the region's bounding box and keeps those inside the
/// region and at least `min_distance` from every accepted point. Stops after
/// `target` acceptances or `attempts_per_point × target` draws.
#[derive(Debug, Clone)]
pub struct RandomSampling {
    /// Minimum distance between accepted plots in meters; 0 disables the check.
    pub min_distance: f64,
    pub attempts_per_point: usize,
}

impl Default for RandomSampling {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl RandomSampling {
    pub fn new(min_distance: f64) -> Self {
        Self {
            min_distance,
            attempts_per_point: DEFAULT_ATTEMPTS_PER_POINT,
        }
    }

    pub fn with_attempts_per_point(mut self, attempts_per_point: usize) -> Self {
        self.attempts_per_point = attempts_per_point.max(1);
        self
    }

    pub fn max_attempts(&self, target: usize) -> usize {
        self.attempts_per_point.saturating_mul(target)
    }
}

impl PlotSampling for RandomSampling {
    fn sampling_type(&self) -> SamplingType {
        SamplingType::Random
    }

    fn generate(
        &self,
        region: &SamplingRegion<'_>,
        target: usize,
        rng: &mut dyn RngCore,
    ) -> SampleSet {
        if target == 0 {
            return SampleSet::default();
        }
        let Some(bounds) = region.bounds() else {
            return SampleSet::exhausted_empty(0);
        };

        let mut index = SpacingIndex::new(self.min_distance);
        let mut points = Vec::with_capacity(target);
        let attempts = rejection_fill(
            region,
            &bounds,
            target,
            self.max_attempts(target),
            &mut index,
            &mut points,
            rng,
        );

        let exhausted = points.len() < target;
        debug!(
            target,
            achieved = points.len(),
            attempts,
            exhausted,
            "random fill complete"
        );

        SampleSet {
            points,
            attempts,
            exhausted,
        }
    }
}
