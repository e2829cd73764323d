//! Plot placement strategies for a single block.
//!
//! Each strategy takes a [`SamplingRegion`] (block polygon minus boundary buffer),
//! a target count and an RNG, and returns the accepted points together with
//! whether it ran out of attempts. Strategies never loop unbounded: random
//! draws are capped at `attempts_per_point × target`.
use glam::DVec2;
use rand::RngCore;

use crate::design::{EffectiveBlockParameters, SamplingType};
use crate::geometry::{Bounds, SamplingRegion};

pub mod grid;
pub mod random;
pub mod spacing;
pub mod stratified;

pub use grid::GridSampling;
pub use random::RandomSampling;
pub use spacing::SpacingIndex;
pub use stratified::StratifiedSampling;

/// Random draws allowed per requested point before a sampler gives up.
pub const DEFAULT_ATTEMPTS_PER_POINT: usize = 100;

/// Points produced by a sampler for one block, in projected coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    pub points: Vec<DVec2>,
    /// Candidate draws consumed (grid candidates for systematic sampling).
    pub attempts: usize,
    /// True when the attempt budget ran out before the target was reached.
    pub exhausted: bool,
}

impl SampleSet {
    pub fn achieved(&self) -> usize {
        self.points.len()
    }

    pub(crate) fn exhausted_empty(attempts: usize) -> Self {
        Self {
            points: Vec::new(),
            attempts,
            exhausted: true,
        }
    }
}

/// Trait for plot placement.
pub trait PlotSampling: Send + Sync {
    fn sampling_type(&self) -> SamplingType;

    fn generate(
        &self,
        region: &SamplingRegion<'_>,
        target: usize,
        rng: &mut dyn RngCore,
    ) -> SampleSet;
}

/// Builds the sampler matching a block's effective parameters.
pub fn sampler_for(
    params: &EffectiveBlockParameters,
    attempts_per_point: usize,
) -> Box<dyn PlotSampling> {
    let min_distance = params.parameters.min_distance_meters;
    match params.sampling_type {
        SamplingType::Systematic => Box::new(GridSampling::new().with_min_distance(min_distance)),
        SamplingType::Random => Box::new(
            RandomSampling::new(min_distance).with_attempts_per_point(attempts_per_point),
        ),
        SamplingType::Stratified => {
            let mut sampler =
                StratifiedSampling::new(min_distance).with_attempts_per_point(attempts_per_point);
            if let Some(n) = params.parameters.num_strata {
                sampler = sampler.with_num_strata(n as usize);
            }
            Box::new(sampler)
        }
    }
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Uniform point inside `bounds`.
#[inline]
pub(crate) fn random_point_in(bounds: &Bounds, rng: &mut dyn RngCore) -> DVec2 {
    let u = rand01(rng);
    let v = rand01(rng);
    bounds.lerp(DVec2::new(u, v))
}

/// Rejection-samples up to `quota` points in `bounds ∩ region`, spending at most
/// `budget` draws. Returns the number of draws used.
pub(crate) fn rejection_fill(
    region: &SamplingRegion<'_>,
    bounds: &Bounds,
    quota: usize,
    budget: usize,
    index: &mut SpacingIndex,
    out: &mut Vec<DVec2>,
    rng: &mut dyn RngCore,
) -> usize {
    let mut accepted = 0;
    let mut attempts = 0;
    while accepted < quota && attempts < budget {
        attempts += 1;
        let p = random_point_in(bounds, rng);
        if !region.contains(p) || !index.is_clear(p) {
            continue;
        }
        index.insert(p);
        out.push(p);
        accepted += 1;
    }
    attempts
}
