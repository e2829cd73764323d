//! Output value objects of a generation run.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::design::{SamplingType, SizeClass};
use crate::error::{Error, GenerationWarning};

/// Longitude/latitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoCoord {
    pub lon: f64,
    pub lat: f64,
}

impl GeoCoord {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Converts projected coordinates to geographic ones.
///
/// Supplied by the caller, who knows the block CRS. Returning `None` leaves
/// the point without geographic coordinates.
pub trait ToGeographic: Send + Sync {
    fn to_geographic(&self, projected: DVec2) -> Option<GeoCoord>;
}

impl<F> ToGeographic for F
where
    F: Fn(DVec2) -> Option<GeoCoord> + Send + Sync,
{
    fn to_geographic(&self, projected: DVec2) -> Option<GeoCoord> {
        self(projected)
    }
}

/// One inventory plot location.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplePoint {
    /// Sequential number, unique across the whole design, starting at 1.
    pub plot_number: u32,
    /// Position of the owning block in the input list.
    pub block_index: usize,
    pub block: String,
    /// Projected coordinates in the block CRS.
    pub position: DVec2,
    pub geographic: Option<GeoCoord>,
    pub plot_area_sqm: f64,
}

/// Per-block summary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockSamplingInfo {
    pub block_index: usize,
    pub block: String,
    pub area_hectares: f64,
    pub sampling_type: SamplingType,
    pub size_class: SizeClass,
    /// Required floor for this block.
    pub minimum: usize,
    /// Count requested from the sampler.
    pub target: usize,
    pub samples_generated: usize,
    pub minimum_enforced: bool,
    /// Intensity implied by `target`, in percent of block area.
    pub actual_intensity_percent: f64,
    /// Intensity implied by `samples_generated`; differs from
    /// `actual_intensity_percent` when a grid fill or a partial run misses the target.
    pub achieved_intensity_percent: f64,
    /// True when a [`GenerationWarning`] was raised for this block.
    pub partial: bool,
}

/// A block that was skipped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BlockFailure {
    pub block_index: usize,
    pub block: String,
    pub error: Error,
}

/// Complete result of a generation run. Immutable once produced; a rerun
/// replaces it wholesale.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DesignResult {
    pub sampling_type: SamplingType,
    pub total_points: usize,
    /// Number of blocks that were sampled (skipped blocks are in `failures`).
    pub total_blocks: usize,
    /// Summed area of the sampled blocks.
    pub forest_area_hectares: f64,
    /// Design-wide default intensity, informational.
    pub requested_intensity_percent: f64,
    /// Plots per hectare over the sampled area.
    pub actual_intensity_per_hectare: f64,
    /// Share of the sampled area covered by plots, in percent.
    pub sampling_percentage: f64,
    pub plot_area_sqm: f64,
    pub total_sampled_area_hectares: f64,
    pub blocks_info: Vec<BlockSamplingInfo>,
    pub points: Vec<SamplePoint>,
    pub failures: Vec<BlockFailure>,
    pub warnings: Vec<GenerationWarning>,
    /// Base seed used for the run, for reproduction.
    pub seed: u64,
}

impl DesignResult {
    pub fn points_for_block<'a>(&'a self, block: &'a str) -> impl Iterator<Item = &'a SamplePoint> + 'a {
        self.points.iter().filter(move |p| p.block == block)
    }

    pub fn block_info(&self, block: &str) -> Option<&BlockSamplingInfo> {
        self.blocks_info.iter().find(|info| info.block == block)
    }

    /// True when no block was skipped and no warning was raised.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.warnings.is_empty()
    }
}
