//! Stratified plot placement over bounding-box cells.
use geo::{Area, BooleanOps, BoundingRect};
use glam::DVec2;
use rand::RngCore;
use tracing::debug;

use crate::design::SamplingType;
use crate::geometry::{Bounds, SamplingRegion};
use crate::sampling::{
    rejection_fill, PlotSampling, SampleSet, SpacingIndex, DEFAULT_ATTEMPTS_PER_POINT,
};

/// Intersections smaller than this (m²) do not count as strata.
const MIN_STRATUM_AREA_SQM: f64 = 1e-6;

/// Stratified random sampling.
///
/// The region's bounding box is split into `num_strata` equal cells. Each cell
/// that overlaps the polygon receives `round(target / overlapping_cells)`
/// plots; the total is then corrected one plot at a time, largest overlap
/// first (ties by cell index), until it equals `target`. Each cell is filled
/// by bounded rejection sampling restricted to `cell ∩ region`. Shortfalls are
/// offered to the other cells, in the same order, before giving up.
#[derive(Debug, Clone)]
pub struct StratifiedSampling {
    /// Minimum distance between accepted plots in meters; 0 disables the check.
    pub min_distance: f64,
    /// Fixed stratum count; `None` uses `ceil(sqrt(target))^2`.
    pub num_strata: Option<usize>,
    pub attempts_per_point: usize,
}

impl Default for StratifiedSampling {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// One bounding-box cell that overlaps the polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Stratum {
    /// Row-major cell index within the full partition.
    pub index: usize,
    /// Cell box clipped to the overlap's extent.
    pub bounds: Bounds,
    /// Area of `cell ∩ polygon` in square meters.
    pub area_sqm: f64,
    pub quota: usize,
}

impl StratifiedSampling {
    pub fn new(min_distance: f64) -> Self {
        Self {
            min_distance,
            num_strata: None,
            attempts_per_point: DEFAULT_ATTEMPTS_PER_POINT,
        }
    }

    pub fn with_num_strata(mut self, num_strata: usize) -> Self {
        self.num_strata = Some(num_strata.max(1));
        self
    }

    pub fn with_attempts_per_point(mut self, attempts_per_point: usize) -> Self {
        self.attempts_per_point = attempts_per_point.max(1);
        self
    }

    /// Stratum count used for `target` plots.
    pub fn strata_count(&self, target: usize) -> usize {
        self.num_strata.unwrap_or_else(|| {
            let side = (target as f64).sqrt().ceil() as usize;
            (side * side).max(1)
        })
    }

    /// Splits `bounds` into `n` equal cells, keeps those overlapping the region's
    /// polygon and assigns quotas summing to `target`.
    pub fn build_strata(
        &self,
        region: &SamplingRegion<'_>,
        bounds: &Bounds,
        target: usize,
    ) -> Vec<Stratum> {
        let n = self.strata_count(target);
        let (cols, rows) = cell_layout(n, bounds);
        let cell_size = DVec2::new(bounds.width() / cols as f64, bounds.height() / rows as f64);

        let mut strata = Vec::new();
        for j in 0..rows {
            for i in 0..cols {
                let min = bounds.min + DVec2::new(i as f64, j as f64) * cell_size;
                let cell = Bounds::new(min, min + cell_size);
                let overlap = region.polygon().intersection(&cell.to_polygon());
                let area_sqm = overlap.unsigned_area();
                if area_sqm <= MIN_STRATUM_AREA_SQM {
                    continue;
                }
                let clipped = overlap
                    .bounding_rect()
                    .map(|r| {
                        Bounds::new(
                            DVec2::new(r.min().x, r.min().y),
                            DVec2::new(r.max().x, r.max().y),
                        )
                    })
                    .and_then(|b| b.intersection(&cell))
                    .unwrap_or(cell);
                strata.push(Stratum {
                    index: j * cols + i,
                    bounds: clipped,
                    area_sqm,
                    quota: 0,
                });
            }
        }

        assign_quotas(&mut strata, target);
        strata
    }
}

/// Factors `n` into `cols × rows` with the factors as close as possible,
/// placing the larger factor along the longer side of `bounds`.
fn cell_layout(n: usize, bounds: &Bounds) -> (usize, usize) {
    let n = n.max(1);
    let root = (n as f64).sqrt().floor() as usize;
    let small = (1..=root.max(1)).rev().find(|d| n % d == 0).unwrap_or(1);
    let large = n / small;
    if bounds.width() >= bounds.height() {
        (large, small)
    } else {
        (small, large)
    }
}

/// Stratum positions ordered by overlap area (descending), then cell index.
fn area_order(strata: &[Stratum]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..strata.len()).collect();
    order.sort_by(|&a, &b| {
        strata[b]
            .area_sqm
            .total_cmp(&strata[a].area_sqm)
            .then(strata[a].index.cmp(&strata[b].index))
    });
    order
}

fn assign_quotas(strata: &mut [Stratum], target: usize) {
    if strata.is_empty() {
        return;
    }
    let share = (target as f64 / strata.len() as f64).round() as usize;
    for s in strata.iter_mut() {
        s.quota = share;
    }

    let order = area_order(strata);
    let mut total = share * strata.len();
    while total < target {
        for &k in &order {
            if total == target {
                break;
            }
            strata[k].quota += 1;
            total += 1;
        }
    }
    while total > target {
        for &k in &order {
            if total == target {
                break;
            }
            if strata[k].quota > 0 {
                strata[k].quota -= 1;
                total -= 1;
            }
        }
    }
}

impl PlotSampling for StratifiedSampling {
    fn sampling_type(&self) -> SamplingType {
        SamplingType::Stratified
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

        let strata = self.build_strata(region, &bounds, target);
        if strata.is_empty() {
            return SampleSet::exhausted_empty(0);
        }

        let mut index = SpacingIndex::new(self.min_distance);
        let mut points = Vec::with_capacity(target);
        let mut attempts = 0;

        for stratum in &strata {
            if stratum.quota == 0 {
                continue;
            }
            attempts += rejection_fill(
                region,
                &stratum.bounds,
                stratum.quota,
                self.attempts_per_point.saturating_mul(stratum.quota),
                &mut index,
                &mut points,
                rng,
            );
        }

        // Offer any shortfall to the strata with the most room.
        let mut missing = target - points.len();
        if missing > 0 {
            for k in area_order(&strata) {
                if missing == 0 {
                    break;
                }
                let before = points.len();
                attempts += rejection_fill(
                    region,
                    &strata[k].bounds,
                    missing,
                    self.attempts_per_point.saturating_mul(missing),
                    &mut index,
                    &mut points,
                    rng,
                );
                missing -= points.len() - before;
            }
        }

        let exhausted = points.len() < target;
        debug!(
            target,
            strata = strata.len(),
            achieved = points.len(),
            attempts,
            exhausted,
            "stratified fill complete"
        );

        SampleSet {
            points,
            attempts,
            exhausted,
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, Polygon};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn square(side: f64) -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: side, y: 0.0),
            (x: side, y: side),
            (x: 0.0, y: side),
        ]
    }

    fn stratum(index: usize, area_sqm: f64) -> Stratum {
        Stratum {
            index,
            bounds: Bounds::new(DVec2::ZERO, DVec2::ONE),
            area_sqm,
            quota: 0,
        }
    }

    #[test]
    fn default_strata_count_is_next_square() {
        let s = StratifiedSampling::default();
        assert_eq!(s.strata_count(1), 1);
        assert_eq!(s.strata_count(5), 9);
        assert_eq!(s.strata_count(9), 9);
        assert_eq!(s.strata_count(50), 64);
        assert_eq!(s.clone().with_num_strata(6).strata_count(50), 6);
    }

    #[test]
    fn cell_layout_factors_exactly() {
        let wide = Bounds::new(DVec2::ZERO, DVec2::new(200.0, 100.0));
        let tall = Bounds::new(DVec2::ZERO, DVec2::new(100.0, 200.0));
        assert_eq!(cell_layout(9, &wide), (3, 3));
        assert_eq!(cell_layout(6, &wide), (3, 2));
        assert_eq!(cell_layout(6, &tall), (2, 3));
        assert_eq!(cell_layout(7, &wide), (7, 1));
    }

    #[test]
    fn quotas_trim_from_largest_strata_first() {
        let mut strata = vec![
            stratum(0, 10.0),
            stratum(1, 40.0),
            stratum(2, 40.0),
            stratum(3, 5.0),
        ];
        // round(2 / 4) = 1 each, total 4, two must go.
        assert_eq!(strata.len(), 4);
        assign_quotas(&mut strata, 2);
        let quotas: Vec<_> = strata.iter().map(|s| s.quota).collect();
        assert_eq!(quotas, vec![1, 0, 0, 1]);
    }

    #[test]
    fn quotas_top_up_largest_strata_first() {
        let mut strata = vec![stratum(0, 1.0), stratum(1, 3.0), stratum(2, 2.0)];
        // round(7 / 3) = 2 each, total 6, one more goes to the largest.
        assign_quotas(&mut strata, 7);
        let quotas: Vec<_> = strata.iter().map(|s| s.quota).collect();
        assert_eq!(quotas, vec![2, 3, 2]);
    }

    #[test]
    fn exact_target_for_small_and_large_counts() {
        let poly = square(1_000.0);
        let region = SamplingRegion::new(&poly, 0.0);
        for (seed, target) in [(1u64, 1usize), (2, 5), (3, 50)] {
            let set = StratifiedSampling::default().generate(
                &region,
                target,
                &mut StdRng::seed_from_u64(seed),
            );
            assert_eq!(set.achieved(), target, "target {target}");
            assert!(!set.exhausted);
            assert!(set.points.iter().all(|p| region.contains(*p)));
        }
    }

    #[test]
    fn strata_skip_cells_outside_polygon() {
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: 300.0, y: 0.0),
            (x: 0.0, y: 300.0),
        ];
        let region = SamplingRegion::new(&poly, 0.0);
        let bounds = region.bounds().unwrap();
        let strata = StratifiedSampling::default().build_strata(&region, &bounds, 9);
        // The three cells above the diagonal only touch it at a corner.
        assert_eq!(strata.len(), 6);
        assert_eq!(strata.iter().map(|s| s.quota).sum::<usize>(), 9);

        let set = StratifiedSampling::default().generate(&region, 9, &mut StdRng::seed_from_u64(4));
        assert_eq!(set.achieved(), 9);
        assert!(set.points.iter().all(|p| p.x + p.y < 300.0));
    }

    #[test]
    fn points_spread_across_strata() {
        let poly = square(300.0);
        let region = SamplingRegion::new(&poly, 0.0);
        let set = StratifiedSampling::default().generate(&region, 9, &mut StdRng::seed_from_u64(8));
        let mut cells: Vec<_> = set
            .points
            .iter()
            .map(|p| ((p.x / 100.0) as usize, (p.y / 100.0) as usize))
            .collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 9);
    }

    #[test]
    fn determinism_for_same_seed() {
        let poly = square(500.0);
        let region = SamplingRegion::new(&poly, 10.0);
        let sampler = StratifiedSampling::new(20.0);
        let a = sampler.generate(&region, 12, &mut StdRng::seed_from_u64(77));
        let b = sampler.generate(&region, 12, &mut StdRng::seed_from_u64(77));
        assert_eq!(a, b);
    }

    #[test]
    fn insufficient_area_falls_back_to_partial_result() {
        let poly = square(60.0);
        let region = SamplingRegion::new(&poly, 0.0);
        let sampler = StratifiedSampling::new(50.0).with_attempts_per_point(30);
        let set = sampler.generate(&region, 9, &mut StdRng::seed_from_u64(5));
        assert!(set.exhausted);
        assert!(set.achieved() < 9);
        assert!(set.achieved() >= 1);
        for (i, a) in set.points.iter().enumerate() {
            for b in &set.points[i + 1..] {
                assert!(a.distance(*b) >= 50.0);
            }
        }
    }
}
