//! Bucketed neighbour lookup for the minimum-distance constraint.
use std::collections::HashMap;

use glam::DVec2;

/// Spatial hash of accepted points, bucketed by `min_distance`.
///
/// Any point closer than `min_distance` to `p` lives in one of the nine
/// buckets around `p`'s bucket. With `min_distance <= 0` every point is clear.
#[derive(Debug, Clone, Default)]
pub struct SpacingIndex {
    min_distance: f64,
    min_distance_squared: f64,
    buckets: HashMap<(i64, i64), Vec<DVec2>>,
}

impl SpacingIndex {
    pub fn new(min_distance: f64) -> Self {
        let min_distance = if min_distance.is_finite() {
            min_distance.max(0.0)
        } else {
            0.0
        };
        Self {
            min_distance,
            min_distance_squared: min_distance * min_distance,
            buckets: HashMap::new(),
        }
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    #[inline]
    fn bucket(&self, p: DVec2) -> (i64, i64) {
        (
            (p.x / self.min_distance).floor() as i64,
            (p.y / self.min_distance).floor() as i64,
        )
    }

    /// Whether `p` keeps at least `min_distance` to every inserted point.
    pub fn is_clear(&self, p: DVec2) -> bool {
        if self.min_distance <= 0.0 {
            return true;
        }
        let (bx, by) = self.bucket(p);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(points) = self.buckets.get(&(bx + dx, by + dy)) {
                    if points
                        .iter()
                        .any(|q| q.distance_squared(p) < self.min_distance_squared)
                    {
                        return false;
                    }
                }
            }
        }
        true
    }

    pub fn insert(&mut self, p: DVec2) {
        if self.min_distance <= 0.0 {
            return;
        }
        let key = self.bucket(p);
        self.buckets.entry(key).or_default().push(p);
    }
}
