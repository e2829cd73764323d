//! Buffered point-in-polygon test used by every sampler.
use geo::{Contains, Point, Polygon};
use glam::DVec2;

use crate::geometry::Bounds;

/// A block polygon shrunk inward by a boundary buffer.
///
/// A point is inside the region when it lies strictly inside the polygon and at
/// least `buffer` meters from every ring (exterior and holes).
#[derive(Debug, Clone)]
pub struct SamplingRegion<'a> {
    polygon: &'a Polygon<f64>,
    buffer: f64,
    bounds: Option<Bounds>,
    area_sqm: f64,
}

impl<'a> SamplingRegion<'a> {
    /// Builds a region for `polygon`, treating negative or non-finite buffers as zero.
    pub fn new(polygon: &'a Polygon<f64>, buffer: f64) -> Self {
        let buffer = if buffer.is_finite() { buffer.max(0.0) } else { 0.0 };
        let bounds = Bounds::of_polygon(polygon).and_then(|b| {
            if buffer > 0.0 {
                b.shrink(buffer)
            } else {
                (!b.is_degenerate()).then_some(b)
            }
        });
        Self {
            polygon,
            buffer,
            bounds,
            area_sqm: super::polygon_area_sqm(polygon),
        }
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        self.polygon
    }

    pub fn buffer(&self) -> f64 {
        self.buffer
    }

    /// Area of the unbuffered polygon in square meters.
    pub fn area_sqm(&self) -> f64 {
        self.area_sqm
    }

    /// Box that contains every point of the region, or `None` if the buffer
    /// consumes the polygon's extent entirely.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn contains(&self, p: DVec2) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        if !bounds.contains(p) {
            return false;
        }
        if !self.polygon.contains(&Point::new(p.x, p.y)) {
            return false;
        }
        self.buffer <= 0.0 || self.clearance(p) >= self.buffer
    }

    /// Distance from `p` to the nearest polygon edge.
    pub fn clearance(&self, p: DVec2) -> f64 {
        std::iter::once(self.polygon.exterior())
            .chain(self.polygon.interiors())
            .flat_map(|ring| ring.lines())
            .map(|line| {
                segment_distance(
                    p,
                    DVec2::new(line.start.x, line.start.y),
                    DVec2::new(line.end.x, line.end.y),
                )
            })
            .fold(f64::INFINITY, f64::min)
    }
}

#[inline]
fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn square(side: f64) -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: side, y: 0.0),
            (x: side, y: side),
            (x: 0.0, y: side),
        ]
    }

    #[test]
    fn unbuffered_region_matches_polygon() {
        let poly = square(100.0);
        let region = SamplingRegion::new(&poly, 0.0);
        assert!(region.contains(DVec2::new(50.0, 50.0)));
        assert!(region.contains(DVec2::new(0.5, 99.5)));
        assert!(!region.contains(DVec2::new(-1.0, 50.0)));
        assert!(!region.contains(DVec2::new(150.0, 50.0)));
        assert_eq!(region.area_sqm(), 10_000.0);
    }

    #[test]
    fn buffer_excludes_edge_band() {
        let poly = square(100.0);
        let region = SamplingRegion::new(&poly, 10.0);
        assert!(region.contains(DVec2::new(50.0, 50.0)));
        assert!(region.contains(DVec2::new(10.5, 10.5)));
        assert!(!region.contains(DVec2::new(5.0, 50.0)));
        assert!(!region.contains(DVec2::new(50.0, 95.0)));
        let bounds = region.bounds().expect("buffer leaves room");
        assert_eq!(bounds.min, DVec2::new(10.0, 10.0));
        assert_eq!(bounds.max, DVec2::new(90.0, 90.0));
    }

    #[test]
    fn buffer_respects_holes() {
        let poly = polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 100.0, y: 0.0),
                (x: 100.0, y: 100.0),
                (x: 0.0, y: 100.0),
            ],
            interiors: [[
                (x: 40.0, y: 40.0),
                (x: 60.0, y: 40.0),
                (x: 60.0, y: 60.0),
                (x: 40.0, y: 60.0),
            ]],
        );
        let region = SamplingRegion::new(&poly, 5.0);
        assert!(!region.contains(DVec2::new(50.0, 50.0)));
        assert!(!region.contains(DVec2::new(37.0, 50.0)));
        assert!(region.contains(DVec2::new(30.0, 50.0)));
    }

    #[test]
    fn oversized_buffer_leaves_empty_region() {
        let poly = square(20.0);
        let region = SamplingRegion::new(&poly, 15.0);
        assert!(region.bounds().is_none());
        assert!(!region.contains(DVec2::new(10.0, 10.0)));
    }

    #[test]
    fn negative_buffer_is_ignored() {
        let poly = square(10.0);
        let region = SamplingRegion::new(&poly, -3.0);
        assert_eq!(region.buffer(), 0.0);
        assert!(region.contains(DVec2::new(1.0, 1.0)));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = DVec2::ZERO;
        let b = DVec2::new(10.0, 0.0);
        assert_eq!(segment_distance(DVec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(segment_distance(DVec2::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(segment_distance(DVec2::new(1.0, 1.0), a, a), 2f64.sqrt());
    }
}
