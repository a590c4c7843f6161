//! Arc and ellipse tessellation
//!
//! Reconstructs curved survey entities (polyline bulges, circular arcs,
//! ellipses) as point runs suitable for line batching.

use yardkit_core::constants::{BULGE_ARC_SEGMENTS, ELLIPSE_SEGMENTS};
use yardkit_core::Point2;

/// Bulge magnitude below which a segment is treated as straight
const BULGE_EPSILON: f64 = 1e-9;

/// Chord / half-angle magnitude below which the arc is degenerate
const DEGENERACY_EPSILON: f64 = 1e-12;

/// Tessellate the arc implied by a polyline bulge factor.
///
/// The bulge encodes the arc between `start` and `end` as
/// `tan(included_angle / 4)`; its sign gives the sweep direction.
/// Degenerate inputs (near-zero bulge, near-zero chord, near-zero
/// `sin(angle/2)`) fall back to the straight two-point segment.
/// Non-finite inputs produce an empty vec.
pub fn bulge_arc_points(start: Point2, end: Point2, bulge: f64, segments: usize) -> Vec<Point2> {
    if !start.is_finite() || !end.is_finite() || !bulge.is_finite() {
        return Vec::new();
    }
    if bulge.abs() < BULGE_EPSILON {
        return vec![start, end];
    }

    let chord = start.distance_to(end);
    if chord < DEGENERACY_EPSILON {
        return vec![start, end];
    }

    let included_angle = 4.0 * bulge.atan();
    let half_sin = (included_angle / 2.0).sin();
    if half_sin.abs() < DEGENERACY_EPSILON {
        return vec![start, end];
    }

    let radius = chord / (2.0 * half_sin.abs());

    // Center sits on the chord's perpendicular bisector; which side depends
    // on the sweep direction.
    let mid = Point2::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    let apothem = (radius * radius - (chord / 2.0) * (chord / 2.0)).max(0.0).sqrt();
    let dir = Point2::new((end.x - start.x) / chord, (end.y - start.y) / chord);
    let normal = if bulge > 0.0 {
        Point2::new(-dir.y, dir.x)
    } else {
        Point2::new(dir.y, -dir.x)
    };
    let center = Point2::new(mid.x + normal.x * apothem, mid.y + normal.y * apothem);
    if !center.is_finite() {
        return vec![start, end];
    }

    let start_angle = (start.y - center.y).atan2(start.x - center.x);
    let sweep = if bulge > 0.0 {
        included_angle.abs()
    } else {
        -included_angle.abs()
    };

    let segments = segments.max(1);
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f64 / segments as f64;
        let angle = start_angle + sweep * t;
        let p = Point2::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        );
        if p.is_finite() {
            points.push(p);
        }
    }
    if points.len() < 2 {
        return vec![start, end];
    }
    // Pin the endpoints exactly so adjacent segments share vertices.
    points[0] = start;
    *points.last_mut().unwrap() = end;
    points
}

/// Tessellate a bulge arc with the default segment count.
pub fn bulge_arc_points_default(start: Point2, end: Point2, bulge: f64) -> Vec<Point2> {
    bulge_arc_points(start, end, bulge, BULGE_ARC_SEGMENTS)
}

/// Sample a circular arc at uniform angular steps.
///
/// Angles are degrees; an end angle below the start angle wraps by a full
/// turn (`end += 360`). Non-finite inputs or a non-positive radius yield
/// an empty vec.
pub fn circular_arc_points(
    center: Point2,
    radius: f64,
    start_angle_deg: f64,
    end_angle_deg: f64,
    segments: usize,
) -> Vec<Point2> {
    if !center.is_finite()
        || !radius.is_finite()
        || radius <= 0.0
        || !start_angle_deg.is_finite()
        || !end_angle_deg.is_finite()
    {
        return Vec::new();
    }

    let start = start_angle_deg.to_radians();
    let mut end = end_angle_deg.to_radians();
    if end < start {
        end += std::f64::consts::TAU;
    }

    let segments = segments.max(1);
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f64 / segments as f64;
        let angle = start + (end - start) * t;
        let p = Point2::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        );
        if p.is_finite() {
            points.push(p);
        }
    }
    points
}

/// Sample a parametric ellipse (survey ELLIPSE entity).
///
/// The ellipse is defined by its center, the endpoint of the major axis
/// relative to that center, and the minor/major axis ratio. Rotation comes
/// from the major-axis vector. `start`/`end` are parametric angles in
/// radians; `end <= start` wraps by a full turn so full ellipses close.
/// A non-positive ratio or non-finite input yields an empty vec.
pub fn ellipse_points(
    center: Point2,
    major_axis_end: Point2,
    axis_ratio: f64,
    start_rad: f64,
    end_rad: f64,
    segments: usize,
) -> Vec<Point2> {
    if !center.is_finite()
        || !major_axis_end.is_finite()
        || !axis_ratio.is_finite()
        || axis_ratio <= 0.0
        || !start_rad.is_finite()
        || !end_rad.is_finite()
    {
        return Vec::new();
    }

    let major_len = (major_axis_end.x.powi(2) + major_axis_end.y.powi(2)).sqrt();
    if major_len < DEGENERACY_EPSILON {
        return Vec::new();
    }
    let minor_len = major_len * axis_ratio;
    let rotation = major_axis_end.y.atan2(major_axis_end.x);
    let (rot_sin, rot_cos) = rotation.sin_cos();

    let mut end = end_rad;
    if end <= start_rad {
        end += std::f64::consts::TAU;
    }

    let segments = segments.max(1);
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f64 / segments as f64;
        let angle = start_rad + (end - start_rad) * t;
        let ex = major_len * angle.cos();
        let ey = minor_len * angle.sin();
        let p = Point2::new(
            center.x + ex * rot_cos - ey * rot_sin,
            center.y + ex * rot_sin + ey * rot_cos,
        );
        if p.is_finite() {
            points.push(p);
        }
    }
    points
}

/// Sample an ellipse with the default segment count.
pub fn ellipse_points_default(
    center: Point2,
    major_axis_end: Point2,
    axis_ratio: f64,
    start_rad: f64,
    end_rad: f64,
) -> Vec<Point2> {
    ellipse_points(
        center,
        major_axis_end,
        axis_ratio,
        start_rad,
        end_rad,
        ELLIPSE_SEGMENTS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bulge_is_straight_segment() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert_eq!(bulge_arc_points(a, b, 0.0, 16), vec![a, b]);
    }

    #[test]
    fn test_zero_length_chord_degenerates() {
        let p = Point2::new(3.0, 4.0);
        let points = bulge_arc_points(p, p, 1.0, 16);
        assert!(points.len() <= 2);
        assert!(points.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let bad = Point2::new(f64::NAN, 0.0);
        let ok = Point2::new(1.0, 0.0);
        assert!(bulge_arc_points(bad, ok, 0.5, 16).is_empty());
        assert!(bulge_arc_points(ok, ok, f64::INFINITY, 16).is_empty());
    }

    #[test]
    fn test_semicircle_bulge() {
        // Bulge 1.0 is a half circle: tan(180deg / 4) = 1.
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        let points = bulge_arc_points(a, b, 1.0, 32);
        assert_eq!(points.len(), 33);
        assert_eq!(points[0], a);
        assert_eq!(*points.last().unwrap(), b);
        // Peak of a CCW half circle over this chord is at (5, 5).
        let peak = points[16];
        assert!((peak.x - 5.0).abs() < 1e-9);
        assert!((peak.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_bulge_sweeps_clockwise() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        let points = bulge_arc_points(a, b, -1.0, 32);
        let peak = points[16];
        assert!((peak.y + 5.0).abs() < 1e-9, "expected dip below the chord");
    }

    #[test]
    fn test_circular_arc_wraps_angles() {
        // 350 deg to 10 deg crosses zero: a 20 degree sweep.
        let points = circular_arc_points(Point2::new(0.0, 0.0), 1.0, 350.0, 10.0, 4);
        assert_eq!(points.len(), 5);
        let last = points.last().unwrap();
        assert!((last.x - 10.0_f64.to_radians().cos()).abs() < 1e-9);
    }

    #[test]
    fn test_full_circle() {
        let points = circular_arc_points(Point2::new(1.0, 1.0), 2.0, 0.0, 360.0, 32);
        assert_eq!(points.len(), 33);
        assert!((points[0].x - points[32].x).abs() < 1e-9);
        assert!((points[0].y - points[32].y).abs() < 1e-9);
    }

    #[test]
    fn test_arc_rejects_bad_radius() {
        assert!(circular_arc_points(Point2::new(0.0, 0.0), 0.0, 0.0, 90.0, 8).is_empty());
        assert!(circular_arc_points(Point2::new(0.0, 0.0), -1.0, 0.0, 90.0, 8).is_empty());
        assert!(circular_arc_points(Point2::new(0.0, 0.0), f64::NAN, 0.0, 90.0, 8).is_empty());
    }

    #[test]
    fn test_axis_aligned_ellipse() {
        let points = ellipse_points(
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            0.5,
            0.0,
            std::f64::consts::TAU,
            4,
        );
        assert_eq!(points.len(), 5);
        assert!((points[0].x - 4.0).abs() < 1e-9);
        // Quarter turn lands on the minor axis.
        assert!((points[1].x).abs() < 1e-9);
        assert!((points[1].y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_ellipse() {
        // Major axis along +Y: the parametric start point is (0, 3).
        let points = ellipse_points(
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 3.0),
            0.5,
            0.0,
            std::f64::consts::TAU,
            8,
        );
        assert!((points[0].x).abs() < 1e-9);
        assert!((points[0].y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_ellipse_segment_count() {
        let points = ellipse_points_default(
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            0.5,
            0.0,
            std::f64::consts::TAU,
        );
        assert_eq!(points.len(), ELLIPSE_SEGMENTS + 1);
    }

    #[test]
    fn test_ellipse_rejects_bad_ratio() {
        let c = Point2::new(0.0, 0.0);
        let m = Point2::new(1.0, 0.0);
        assert!(ellipse_points(c, m, 0.0, 0.0, 1.0, 8).is_empty());
        assert!(ellipse_points(c, m, -0.5, 0.0, 1.0, 8).is_empty());
    }
}
