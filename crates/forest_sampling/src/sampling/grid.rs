//! Systematic (square grid) plot placement.
use glam::DVec2;
use rand::RngCore;
use tracing::debug;

use crate::design::SamplingType;
use crate::geometry::{Bounds, SamplingRegion};
use crate::sampling::{PlotSampling, SampleSet};

/// Square-grid sampling.
///
/// Spacing is `sqrt(polygon_area / target)`, raised to the minimum distance if
/// that is larger. The lattice is anchored at the minimum corner of the
/// polygon's bounding box and candidates sit at cell centres
/// (`min + (i + 0.5, j + 0.5) * spacing`). Candidates outside the region are
/// dropped; the result is the natural fill of the shape and may differ from
/// `target`. The RNG is never used.
#[derive(Debug, Clone, Default)]
pub struct GridSampling {
    /// Lower bound for grid spacing in meters.
    pub min_distance: f64,
}

impl GridSampling {
    pub fn new() -> Self {
        Self { min_distance: 0.0 }
    }

    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Grid spacing used for `target` plots over `area_sqm`.
    pub fn spacing(&self, area_sqm: f64, target: usize) -> f64 {
        let natural = (area_sqm / target as f64).sqrt();
        if self.min_distance.is_finite() && self.min_distance > natural {
            self.min_distance
        } else {
            natural
        }
    }
}

impl PlotSampling for GridSampling {
    fn sampling_type(&self) -> SamplingType {
        SamplingType::Systematic
    }

    fn generate(
        &self,
        region: &SamplingRegion<'_>,
        target: usize,
        _rng: &mut dyn RngCore,
    ) -> SampleSet {
        if target == 0 {
            return SampleSet::default();
        }
        let Some(bounds) = Bounds::of_polygon(region.polygon()) else {
            return SampleSet::default();
        };

        let spacing = self.spacing(region.area_sqm(), target);
        if !spacing.is_finite() || spacing <= 0.0 {
            return SampleSet::default();
        }

        let cols = (bounds.width() / spacing).ceil().max(1.0) as usize;
        let rows = (bounds.height() / spacing).ceil().max(1.0) as usize;

        let mut points = Vec::with_capacity(target);
        for j in 0..rows {
            for i in 0..cols {
                let p = bounds.min + DVec2::new(i as f64 + 0.5, j as f64 + 0.5) * spacing;
                if region.contains(p) {
                    points.push(p);
                }
            }
        }

        debug!(
            spacing,
            cols,
            rows,
            target,
            achieved = points.len(),
            "grid fill complete"
        );

        SampleSet {
            points,
            attempts: cols * rows,
            exhausted: false,
        }
    }
}
