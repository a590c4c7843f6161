//! Polygon and path measurement
//!
//! Shoelace area/centroid, bounding boxes, and path length for tessellated
//! point runs. Undersized or empty inputs return a defined zero/`None`
//! result rather than panicking.

use yardkit_core::Point2;

/// Area below which a polygon is treated as degenerate for centroid purposes
const AREA_EPSILON: f64 = 1e-12;

/// Absolute polygon area by the shoelace formula.
///
/// Fewer than 3 points, or any non-finite vertex, gives 0.
pub fn polygon_area(points: &[Point2]) -> f64 {
    if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        twice_area += a.x * b.y - b.x * a.y;
    }
    (twice_area / 2.0).abs()
}

/// Area-weighted polygon centroid.
///
/// Falls back to the plain vertex average when the polygon is degenerate
/// (near-zero area, e.g. collinear points). Empty input gives `None`.
pub fn polygon_centroid(points: &[Point2]) -> Option<Point2> {
    let finite: Vec<Point2> = points.iter().copied().filter(Point2::is_finite).collect();
    if finite.is_empty() {
        return None;
    }
    if finite.len() < 3 {
        return Some(vertex_average(&finite));
    }

    let mut twice_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..finite.len() {
        let a = finite[i];
        let b = finite[(i + 1) % finite.len()];
        let cross = a.x * b.y - b.x * a.y;
        twice_area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }

    if twice_area.abs() < AREA_EPSILON {
        return Some(vertex_average(&finite));
    }
    let factor = 1.0 / (3.0 * twice_area);
    let centroid = Point2::new(cx * factor, cy * factor);
    if centroid.is_finite() {
        Some(centroid)
    } else {
        Some(vertex_average(&finite))
    }
}

fn vertex_average(points: &[Point2]) -> Point2 {
    let n = points.len() as f64;
    let sum = points
        .iter()
        .fold(Point2::new(0.0, 0.0), |acc, p| acc + *p);
    Point2::new(sum.x / n, sum.y / n)
}

/// Axis-aligned bounding box as `(min, max)`.
///
/// Non-finite points are skipped; `None` when no usable point remains.
pub fn bounding_box(points: &[Point2]) -> Option<(Point2, Point2)> {
    let mut min: Option<Point2> = None;
    let mut max: Option<Point2> = None;
    for p in points.iter().filter(|p| p.is_finite()) {
        min = Some(match min {
            Some(m) => Point2::new(m.x.min(p.x), m.y.min(p.y)),
            None => *p,
        });
        max = Some(match max {
            Some(m) => Point2::new(m.x.max(p.x), m.y.max(p.y)),
            None => *p,
        });
    }
    Some((min?, max?))
}

/// Summed Euclidean length of a point run's segments.
///
/// Segments touching a non-finite endpoint contribute nothing.
pub fn path_length(points: &[Point2]) -> f64 {
    points
        .windows(2)
        .filter(|w| w[0].is_finite() && w[1].is_finite())
        .map(|w| w[0].distance_to(w[1]))
        .sum()
}
