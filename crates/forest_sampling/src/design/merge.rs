//! Merging design defaults with per-block overrides.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::design::params::{ParameterOverrides, PlotShape, SamplingParameters, SamplingType};
use crate::error::{Result, Scope};

/// Parameters for one block after merging; recomputed on every run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EffectiveBlockParameters {
    pub sampling_type: SamplingType,
    pub parameters: SamplingParameters,
    pub plot: PlotShape,
}

impl EffectiveBlockParameters {
    pub fn plot_area_sqm(&self) -> f64 {
        self.plot.area_sqm()
    }
}

/// Field-by-field merge: present override values win, absent ones inherit.
pub fn apply_overrides(
    sampling_type: SamplingType,
    defaults: &SamplingParameters,
    overrides: &ParameterOverrides,
) -> (SamplingType, SamplingParameters) {
    let merged = SamplingParameters {
        intensity_percent: overrides
            .intensity_percent
            .unwrap_or(defaults.intensity_percent),
        min_samples_large: overrides
            .min_samples_large
            .unwrap_or(defaults.min_samples_large),
        min_samples_small: overrides
            .min_samples_small
            .unwrap_or(defaults.min_samples_small),
        min_distance_meters: overrides
            .min_distance_meters
            .unwrap_or(defaults.min_distance_meters),
        boundary_buffer_meters: overrides
            .boundary_buffer_meters
            .unwrap_or(defaults.boundary_buffer_meters),
        num_strata: overrides.num_strata.or(defaults.num_strata),
    };
    (overrides.sampling_type.unwrap_or(sampling_type), merged)
}

/// Resolves the effective parameters for `block_name`.
///
/// The override (if any) is validated against the same bounds as the defaults
/// before merging, so an out-of-range value fails with an error naming the block.
pub fn merge_block_parameters(
    block_name: &str,
    sampling_type: SamplingType,
    defaults: &SamplingParameters,
    plot: PlotShape,
    overrides: Option<&ParameterOverrides>,
) -> Result<EffectiveBlockParameters> {
    let (sampling_type, parameters) = match overrides {
        Some(o) => {
            o.validate(&Scope::Block(block_name.to_owned()))?;
            apply_overrides(sampling_type, defaults, o)
        }
        None => (sampling_type, defaults.clone()),
    };
    Ok(EffectiveBlockParameters {
        sampling_type,
        parameters,
        plot,
    })
}
