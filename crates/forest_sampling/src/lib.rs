#![forbid(unsafe_code)]
//! forest_sampling: sample-plot designs for forest inventory.
//!
//! Modules:
//! - design: blocks, design-wide parameters, per-block overrides, sample count resolution
//! - geometry: polygon validation, bounds and buffered sampling regions
//! - sampling: systematic grid, simple random and stratified random plot placement
//! - generator: runs a design over all blocks, numbers plots and aggregates statistics
//!
//! For examples and docs, see README and docs.rs.
pub mod design;
pub mod error;
pub mod generator;
pub mod geometry;
mod maybe_rayon;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use forest_sampling::prelude::*;`.
pub mod prelude {
    pub use crate::design::{
        resolve_sample_count, Block, EffectiveBlockParameters, ParameterOverrides, PlotShape,
        SampleCount, SamplingDesign, SamplingParameters, SamplingType, SizeClass,
    };
    pub use crate::error::{Error, ErrorKind, GenerationWarning, GeometryIssue, Result, Scope};
    pub use crate::generator::{
        generate, generate_with_events, seed_for_block, BlockFailure, BlockSamplingInfo,
        DesignEvent, DesignEventKind, DesignGenerator, DesignResult, EventSink, FnSink,
        GenerationConfig, GeoCoord, MultiSink, SamplePoint, ToGeographic, VecSink,
    };
    pub use crate::geometry::{Bounds, SamplingRegion};
    pub use crate::sampling::{
        sampler_for, GridSampling, PlotSampling, RandomSampling, SampleSet, StratifiedSampling,
    };
}
