//! Target plot count per block, with minimum-sample enforcement.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::design::params::SamplingParameters;
use crate::error::{Error, GeometryIssue, Result};
use crate::geometry::SQM_PER_HECTARE;

/// Blocks strictly below this area use the small-block minimum.
pub const SMALL_BLOCK_THRESHOLD_HA: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SizeClass {
    Small,
    Large,
}

impl SizeClass {
    pub fn of_area(area_ha: f64) -> Self {
        if area_ha < SMALL_BLOCK_THRESHOLD_HA {
            SizeClass::Small
        } else {
            SizeClass::Large
        }
    }
}

/// Outcome of count resolution for one block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleCount {
    pub size_class: SizeClass,
    /// Required floor for this size class.
    pub minimum: usize,
    /// Count implied by intensity alone.
    pub from_intensity: usize,
    /// Count handed to the sampler.
    pub target: usize,
    /// True when the floor replaced a smaller intensity-derived count.
    pub minimum_enforced: bool,
    /// Share of block area covered by `target` plots, in percent.
    pub actual_intensity_percent: f64,
}

/// Turns a block area and its effective parameters into a target count.
pub fn resolve_sample_count(
    block: &str,
    area_ha: f64,
    params: &SamplingParameters,
    plot_area_sqm: f64,
) -> Result<SampleCount> {
    if !area_ha.is_finite() || area_ha <= 0.0 {
        return Err(Error::InvalidGeometry {
            block: block.to_owned(),
            issue: GeometryIssue::ZeroArea,
        });
    }
    if !plot_area_sqm.is_finite() || plot_area_sqm <= 0.0 {
        return Err(Error::Configuration(format!(
            "plot area must be > 0, got {plot_area_sqm}"
        )));
    }

    let size_class = SizeClass::of_area(area_ha);
    let minimum = match size_class {
        SizeClass::Small => params.min_samples_small,
        SizeClass::Large => params.min_samples_large,
    } as usize;

    let sample_area_ha = area_ha * params.intensity_percent / 100.0;
    let from_intensity = (sample_area_ha * SQM_PER_HECTARE / plot_area_sqm)
        .round()
        .max(0.0) as usize;

    let target = minimum.max(from_intensity);
    let minimum_enforced = target == minimum && from_intensity < minimum;
    let actual_intensity_percent =
        target as f64 * plot_area_sqm / (area_ha * SQM_PER_HECTARE) * 100.0;

    Ok(SampleCount {
        size_class,
        minimum,
        from_intensity,
        target,
        minimum_enforced,
        actual_intensity_percent,
    })
}
