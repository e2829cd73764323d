//! Block polygon validation and area computation.
use geo::algorithm::line_intersection::line_intersection;
use geo::{Area, Line, LineString, Polygon};

use crate::error::GeometryIssue;

/// Areas at or below this value (m²) are treated as zero.
const AREA_EPSILON: f64 = 1e-9;

/// Planar area of the polygon in square meters (shoelace over all rings, holes subtracted).
pub fn polygon_area_sqm(polygon: &Polygon<f64>) -> f64 {
    polygon.unsigned_area()
}

/// Validates a block polygon and returns its area in square meters.
///
/// Checks run in order: vertex count, finiteness, area, then ring intersections.
pub fn check_polygon(polygon: &Polygon<f64>) -> Result<f64, GeometryIssue> {
    if distinct_vertex_count(polygon.exterior()) < 3 {
        return Err(GeometryIssue::Empty);
    }

    let all_finite = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .flat_map(|ring| ring.coords())
        .all(|c| c.x.is_finite() && c.y.is_finite());
    if !all_finite {
        return Err(GeometryIssue::NonFinite);
    }

    let area = polygon_area_sqm(polygon);
    if area <= AREA_EPSILON {
        return Err(GeometryIssue::ZeroArea);
    }

    if has_ring_intersections(polygon) {
        return Err(GeometryIssue::SelfIntersecting);
    }

    Ok(area)
}

fn distinct_vertex_count(ring: &LineString<f64>) -> usize {
    let coords = &ring.0;
    let open = match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => &coords[..coords.len() - 1],
        _ => &coords[..],
    };
    let mut distinct: Vec<_> = Vec::with_capacity(open.len());
    for c in open {
        if !distinct.contains(c) {
            distinct.push(*c);
        }
    }
    distinct.len()
}

/// Non-degenerate segments of a closed ring.
fn ring_segments(ring: &LineString<f64>) -> Vec<Line<f64>> {
    ring.lines().filter(|l| l.start != l.end).collect()
}

fn has_ring_intersections(polygon: &Polygon<f64>) -> bool {
    let rings: Vec<Vec<Line<f64>>> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_segments)
        .collect();

    for (r, segments) in rings.iter().enumerate() {
        if ring_self_intersects(segments) {
            return true;
        }
        for other in &rings[r + 1..] {
            for a in segments {
                for b in other {
                    if line_intersection(*a, *b).is_some() {
                        return true;
                    }
                }
            }
        }
    }

    false
}

fn ring_self_intersects(segments: &[Line<f64>]) -> bool {
    let n = segments.len();
    for i in 0..n {
        for j in (i + 1)..n {
            // Neighbours share a vertex by construction.
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            if line_intersection(segments[i], segments[j]).is_some() {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use geo::{polygon, Coord};

    use super::*;

    #[test]
    fn square_area_matches_shoelace() {
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: 100.0, y: 0.0),
            (x: 100.0, y: 100.0),
            (x: 0.0, y: 100.0),
        ];
        assert_eq!(check_polygon(&poly), Ok(10_000.0));
    }

    #[test]
    fn holes_are_subtracted() {
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
        let area = check_polygon(&poly).expect("valid polygon with hole");
        assert!((area - 9_600.0).abs() < 1e-9);
    }

    #[test]
    fn too_few_vertices_is_empty() {
        let poly = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 0.0)];
        assert_eq!(check_polygon(&poly), Err(GeometryIssue::Empty));
        let empty = Polygon::new(LineString::new(vec![]), vec![]);
        assert_eq!(check_polygon(&empty), Err(GeometryIssue::Empty));
    }

    #[test]
    fn collinear_ring_has_zero_area() {
        let poly = polygon![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0), (x: 10.0, y: 0.0)];
        assert_eq!(check_polygon(&poly), Err(GeometryIssue::ZeroArea));
    }

    #[test]
    fn nan_coordinates_are_rejected() {
        let poly = Polygon::new(
            LineString::from(vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: f64::NAN, y: 0.0 },
                Coord { x: 10.0, y: 10.0 },
            ]),
            vec![],
        );
        assert_eq!(check_polygon(&poly), Err(GeometryIssue::NonFinite));
    }

    #[test]
    fn bowtie_is_self_intersecting() {
        // Lobes have different sizes so the signed area does not cancel out.
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 20.0),
        ];
        assert_eq!(check_polygon(&poly), Err(GeometryIssue::SelfIntersecting));
    }

    #[test]
    fn hole_crossing_exterior_is_rejected() {
        let poly = polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 100.0, y: 0.0),
                (x: 100.0, y: 100.0),
                (x: 0.0, y: 100.0),
            ],
            interiors: [[
                (x: 80.0, y: 40.0),
                (x: 120.0, y: 40.0),
                (x: 120.0, y: 60.0),
                (x: 80.0, y: 60.0),
            ]],
        );
        assert_eq!(check_polygon(&poly), Err(GeometryIssue::SelfIntersecting));
    }

    #[test]
    fn concave_polygon_is_valid() {
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: 100.0, y: 0.0),
            (x: 100.0, y: 100.0),
            (x: 50.0, y: 40.0),
            (x: 0.0, y: 100.0),
        ];
        assert!(check_polygon(&poly).is_ok());
    }
}
