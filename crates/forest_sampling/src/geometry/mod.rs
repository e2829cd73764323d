//! Planar geometry helpers for block polygons.
//!
//! All coordinates are assumed to be in a projected, metric CRS. The engine never
//! reprojects; a caller hands in polygons whose units are meters.
use geo::{BoundingRect, Coord, Polygon, Rect};
use glam::DVec2;

pub mod region;
pub mod validate;

pub use region::SamplingRegion;
pub use validate::{check_polygon, polygon_area_sqm};

/// Square meters per hectare.
pub const SQM_PER_HECTARE: f64 = 10_000.0;

/// Axis-aligned bounding box in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Bounding box of the polygon's exterior ring, or `None` for an empty polygon.
    pub fn of_polygon(polygon: &Polygon<f64>) -> Option<Self> {
        polygon.bounding_rect().map(|rect| Self {
            min: DVec2::new(rect.min().x, rect.min().y),
            max: DVec2::new(rect.max().x, rect.max().y),
        })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn extent(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Shrinks the box by `amount` on every side. Returns `None` if nothing is left.
    pub fn shrink(&self, amount: f64) -> Option<Self> {
        let shrunk = Self {
            min: self.min + DVec2::splat(amount),
            max: self.max - DVec2::splat(amount),
        };
        (!shrunk.is_degenerate()).then_some(shrunk)
    }

    pub fn intersection(&self, other: &Bounds) -> Option<Self> {
        let clipped = Self {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        };
        (!clipped.is_degenerate()).then_some(clipped)
    }

    /// Maps unit-square coordinates `t` in `[0, 1]^2` into the box.
    #[inline]
    pub fn lerp(&self, t: DVec2) -> DVec2 {
        self.min + self.extent() * t
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        Rect::new(
            Coord {
                x: self.min.x,
                y: self.min.y,
            },
            Coord {
                x: self.max.x,
                y: self.max.y,
            },
        )
        .to_polygon()
    }
}
