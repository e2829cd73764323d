//! Design-wide generation: merge, count, sample every block, then number and aggregate.
//!
//! Blocks are sampled independently (in parallel with the `parallel` feature).
//! Plot numbers, events and aggregates are produced afterwards in one
//! sequential pass over the caller's block order, so the result never depends
//! on completion order.
use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::design::{
    resolve_sample_count, Block, EffectiveBlockParameters, SampleCount, SamplingDesign,
};
use crate::error::{GenerationWarning, Result};
use crate::geometry::{SamplingRegion, SQM_PER_HECTARE};
use crate::maybe_rayon::*;
use crate::sampling::{sampler_for, SampleSet};

pub mod config;
pub mod events;
pub mod result;
pub mod seed;

pub use config::GenerationConfig;
pub use events::{DesignEvent, DesignEventKind, EventSink, FnSink, MultiSink, VecSink};
pub use result::{
    BlockFailure, BlockSamplingInfo, DesignResult, GeoCoord, SamplePoint, ToGeographic,
};
pub use seed::seed_for_block;

/// Runs designs with a fixed configuration and optional geographic transform.
pub struct DesignGenerator<'a> {
    /// Run configuration applied to every design.
    pub config: GenerationConfig,
    geographic: Option<&'a dyn ToGeographic>,
}

impl<'a> DesignGenerator<'a> {
    pub fn try_new(config: GenerationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            geographic: None,
        })
    }

    /// Attaches a projected-to-geographic transform applied to every point.
    pub fn with_geographic(mut self, transform: &'a dyn ToGeographic) -> Self {
        self.geographic = Some(transform);
        self
    }

    pub fn run(&self, design: &SamplingDesign, blocks: &[Block]) -> Result<DesignResult> {
        generate_with_events(design, blocks, &self.config, self.geographic, &mut ())
    }

    pub fn run_with_events(
        &self,
        design: &SamplingDesign,
        blocks: &[Block],
        sink: &mut dyn EventSink,
    ) -> Result<DesignResult> {
        generate_with_events(design, blocks, &self.config, self.geographic, sink)
    }
}

/// Generates a full design without geographic coordinates or events.
pub fn generate(
    design: &SamplingDesign,
    blocks: &[Block],
    config: &GenerationConfig,
) -> Result<DesignResult> {
    generate_with_events(design, blocks, config, None, &mut ())
}

/// Points and counts computed for one block, before numbering.
struct BlockRun {
    area_ha: f64,
    params: EffectiveBlockParameters,
    count: SampleCount,
    set: SampleSet,
}

/// Generates a full design.
///
/// Fails before sampling anything if the configuration, the design defaults,
/// the plot shape or any override is invalid. Blocks with invalid geometry are
/// skipped and reported in [`DesignResult::failures`].
pub fn generate_with_events(
    design: &SamplingDesign,
    blocks: &[Block],
    config: &GenerationConfig,
    geographic: Option<&dyn ToGeographic>,
    sink: &mut dyn EventSink,
) -> Result<DesignResult> {
    config.validate()?;
    design.validate()?;

    let known: HashSet<&str> = blocks.iter().map(|b| b.name.as_str()).collect();
    for name in design.block_overrides.keys() {
        if !known.contains(name.as_str()) {
            warn!("Override for unknown block '{}' is ignored.", name);
        }
    }

    let effective = blocks
        .iter()
        .map(|b| design.effective_parameters(&b.name))
        .collect::<Result<Vec<_>>>()?;

    let base_seed = config.resolve_seed();
    let plot_area_sqm = design.plot_area_sqm();

    info!(
        "Generating {} design over {} blocks (seed {}).",
        design.sampling_type,
        blocks.len(),
        base_seed
    );
    if sink.wants(DesignEventKind::RunStarted) {
        sink.send(DesignEvent::RunStarted {
            sampling_type: design.sampling_type,
            block_count: blocks.len(),
            seed: base_seed,
        });
    }

    let runs: Vec<Result<BlockRun>> = (0..blocks.len())
        .into_par_iter()
        .map(|i| {
            sample_block(
                i,
                &blocks[i],
                &effective[i],
                config.attempts_per_point,
                base_seed,
            )
        })
        .collect();

    // Numbering and aggregation: strictly sequential, in block order.
    let mut points = Vec::new();
    let mut blocks_info = Vec::new();
    let mut failures = Vec::new();
    let mut warnings = Vec::new();
    let mut next_plot_number: u32 = 1;

    for (index, (block, run)) in blocks.iter().zip(runs).enumerate() {
        let run = match run {
            Ok(run) => run,
            Err(error) => {
                warn!("Skipping block '{}': {}.", block.name, error);
                if sink.wants(DesignEventKind::BlockSkipped) {
                    sink.send(DesignEvent::BlockSkipped {
                        index,
                        block: block.name.clone(),
                        error: error.clone(),
                    });
                }
                failures.push(BlockFailure {
                    block_index: index,
                    block: block.name.clone(),
                    error,
                });
                continue;
            }
        };

        let achieved = run.set.achieved();
        let partial = run.set.exhausted || achieved < run.count.minimum;
        if partial {
            let warning = GenerationWarning::PartialGeneration {
                block: block.name.clone(),
                requested: run.count.target,
                achieved,
                minimum: run.count.minimum,
            };
            warn!("Partial generation: {}.", warning);
            if sink.wants(DesignEventKind::Warning) {
                sink.send(DesignEvent::Warning(warning.clone()));
            }
            warnings.push(warning);
        }

        let first_plot_number = (achieved > 0).then_some(next_plot_number);
        for position in run.set.points {
            points.push(SamplePoint {
                plot_number: next_plot_number,
                block_index: index,
                block: block.name.clone(),
                position,
                geographic: geographic.and_then(|g| g.to_geographic(position)),
                plot_area_sqm,
            });
            next_plot_number += 1;
        }

        let info = BlockSamplingInfo {
            block_index: index,
            block: block.name.clone(),
            area_hectares: run.area_ha,
            sampling_type: run.params.sampling_type,
            size_class: run.count.size_class,
            minimum: run.count.minimum,
            target: run.count.target,
            samples_generated: achieved,
            minimum_enforced: run.count.minimum_enforced,
            actual_intensity_percent: run.count.actual_intensity_percent,
            achieved_intensity_percent: achieved as f64 * plot_area_sqm
                / (run.area_ha * SQM_PER_HECTARE)
                * 100.0,
            partial,
        };
        info!(
            "Block '{}': {:.2} ha, {} | target {} | generated {}.",
            info.block,
            info.area_hectares,
            info.sampling_type,
            info.target,
            info.samples_generated
        );
        if sink.wants(DesignEventKind::BlockSampled) {
            sink.send(DesignEvent::BlockSampled {
                index,
                info: info.clone(),
                first_plot_number,
            });
        }
        blocks_info.push(info);
    }

    let total_points = points.len();
    let forest_area_hectares: f64 = blocks_info.iter().map(|b| b.area_hectares).sum();
    let total_sampled_area_hectares = total_points as f64 * plot_area_sqm / SQM_PER_HECTARE;
    let (actual_intensity_per_hectare, sampling_percentage) = if forest_area_hectares > 0.0 {
        (
            total_points as f64 / forest_area_hectares,
            total_sampled_area_hectares / forest_area_hectares * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    let result = DesignResult {
        sampling_type: design.sampling_type,
        total_points,
        total_blocks: blocks_info.len(),
        forest_area_hectares,
        requested_intensity_percent: design.default_parameters.intensity_percent,
        actual_intensity_per_hectare,
        sampling_percentage,
        plot_area_sqm,
        total_sampled_area_hectares,
        blocks_info,
        points,
        failures,
        warnings,
        seed: base_seed,
    };

    info!(
        "Design complete: {} plots over {} blocks ({} skipped, {} warnings).",
        result.total_points,
        result.total_blocks,
        result.failures.len(),
        result.warnings.len()
    );
    if sink.wants(DesignEventKind::RunFinished) {
        sink.send(DesignEvent::RunFinished {
            total_points: result.total_points,
            total_blocks: result.total_blocks,
            skipped_blocks: result.failures.len(),
        });
    }

    Ok(result)
}

fn sample_block(
    index: usize,
    block: &Block,
    params: &EffectiveBlockParameters,
    attempts_per_point: usize,
    base_seed: u64,
) -> Result<BlockRun> {
    let area_ha = block.validate()?;
    let count = resolve_sample_count(
        &block.name,
        area_ha,
        &params.parameters,
        params.plot_area_sqm(),
    )?;

    let region = SamplingRegion::new(&block.polygon, params.parameters.boundary_buffer_meters);
    let sampler = sampler_for(params, attempts_per_point);
    let mut rng = StdRng::seed_from_u64(seed_for_block(base_seed, index));
    let set = sampler.generate(&region, count.target, &mut rng);

    Ok(BlockRun {
        area_ha,
        params: params.clone(),
        count,
        set,
    })
}
