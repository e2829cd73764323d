//! Sampling design configuration: blocks, parameters, overrides, merge and count resolution.
use std::collections::BTreeMap;

use geo::Polygon;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, Scope};
use crate::geometry::{check_polygon, polygon_area_sqm, SQM_PER_HECTARE};

pub mod count;
pub mod merge;
pub mod params;

pub use count::{resolve_sample_count, SampleCount, SizeClass};
pub use merge::{apply_overrides, merge_block_parameters, EffectiveBlockParameters};
pub use params::{
    ParameterOverrides, PlotShape, SamplingParameters, SamplingType, MAX_NUM_STRATA,
};

/// A forest block to be sampled independently.
///
/// The polygon must already be in a planar metric CRS. Area is always derived
/// from the polygon itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Block {
    pub name: String,
    pub polygon: Polygon<f64>,
}

impl Block {
    pub fn new(name: impl Into<String>, polygon: Polygon<f64>) -> Self {
        Self {
            name: name.into(),
            polygon,
        }
    }

    pub fn area_sqm(&self) -> f64 {
        polygon_area_sqm(&self.polygon)
    }

    pub fn area_hectares(&self) -> f64 {
        self.area_sqm() / SQM_PER_HECTARE
    }

    /// Checks the polygon and returns its area in hectares.
    pub fn validate(&self) -> Result<f64> {
        check_polygon(&self.polygon)
            .map(|sqm| sqm / SQM_PER_HECTARE)
            .map_err(|issue| Error::InvalidGeometry {
                block: self.name.clone(),
                issue,
            })
    }
}

/// Design-wide sampling configuration, owned by the caller.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SamplingDesign {
    pub sampling_type: SamplingType,
    pub default_parameters: SamplingParameters,
    /// Plot shape shared by every block.
    pub plot: PlotShape,
    /// Partial parameter records keyed by block name.
    pub block_overrides: BTreeMap<String, ParameterOverrides>,
}

impl SamplingDesign {
    pub fn new(sampling_type: SamplingType) -> Self {
        Self {
            sampling_type,
            ..Default::default()
        }
    }

    pub fn with_default_parameters(mut self, parameters: SamplingParameters) -> Self {
        self.default_parameters = parameters;
        self
    }

    pub fn with_plot(mut self, plot: PlotShape) -> Self {
        self.plot = plot;
        self
    }

    pub fn with_block_override(
        mut self,
        block: impl Into<String>,
        overrides: ParameterOverrides,
    ) -> Self {
        self.block_overrides.insert(block.into(), overrides);
        self
    }

    pub fn plot_area_sqm(&self) -> f64 {
        self.plot.area_sqm()
    }

    /// Validates defaults, plot shape and every override record.
    pub fn validate(&self) -> Result<()> {
        self.default_parameters.validate(&Scope::Defaults)?;
        self.plot.validate()?;
        for (block, overrides) in &self.block_overrides {
            overrides.validate(&Scope::Block(block.clone()))?;
        }
        Ok(())
    }

    /// Effective parameters for the block called `block_name`.
    pub fn effective_parameters(&self, block_name: &str) -> Result<EffectiveBlockParameters> {
        merge_block_parameters(
            block_name,
            self.sampling_type,
            &self.default_parameters,
            self.plot,
            self.block_overrides.get(block_name),
        )
    }
}
