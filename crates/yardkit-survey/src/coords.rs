//! Survey/world coordinate system
//!
//! Derived once per loaded document from the header extents, then used for
//! every survey↔world translation. The axis convention is fixed: the
//! survey plane's Y axis becomes the negative world depth axis and the
//! survey's Z (up) axis becomes world Y. All downstream code assumes this
//! swap; it is deliberately not configurable.

use serde::{Deserialize, Serialize};
use tracing::debug;
use yardkit_core::{Point3, SurveyUnit};

use crate::entity::SurveyHeader;

/// A point in render-world space (meters, Y up)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Drawing extents recorded at derivation time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyBounds {
    pub min: Point3,
    pub max: Point3,
    pub width: f64,
    pub height: f64,
}

/// Center/scale/unit record translating survey coordinates to world space
///
/// Immutable after derivation. Consumers hold the single instance derived
/// at document load time and never recompute it per call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    pub center: Point3,
    pub scale: f64,
    pub unit: SurveyUnit,
    pub bounds: SurveyBounds,
}

impl CoordinateSystem {
    /// Derive a coordinate system from the survey header.
    ///
    /// Returns `None` when either extent is absent or any component is
    /// non-finite. Callers must surface that, not substitute defaults —
    /// a silently defaulted center corrupts every downstream placement.
    pub fn derive(header: &SurveyHeader) -> Option<Self> {
        let min = header.ext_min?;
        let max = header.ext_max?;
        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        let unit = SurveyUnit::from_code(header.units_code);
        let scale = unit.meters_per_unit();
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }

        let center = Point3::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        );
        let bounds = SurveyBounds {
            min,
            max,
            width: max.x - min.x,
            height: max.y - min.y,
        };
        debug!(
            ?center,
            scale,
            %unit,
            "derived survey coordinate system"
        );
        Some(Self {
            center,
            scale,
            unit,
            bounds,
        })
    }

    /// Translate a survey point into world space.
    ///
    /// `world.x = (p.x - center.x) * scale`; survey Z (up) maps to world
    /// Y; survey plane Y maps to negative world depth (Z). Returns `None`
    /// for non-finite input or a degenerate scale.
    pub fn to_world(&self, p: Point3) -> Option<WorldPoint> {
        if !p.is_finite() || !self.scale.is_finite() || self.scale <= 0.0 {
            return None;
        }
        let w = WorldPoint::new(
            (p.x - self.center.x) * self.scale,
            (p.z - self.center.z) * self.scale,
            -(p.y - self.center.y) * self.scale,
        );
        if w.is_finite() {
            Some(w)
        } else {
            None
        }
    }

    /// Exact algebraic inverse of [`to_world`](Self::to_world).
    pub fn to_survey(&self, w: WorldPoint) -> Option<Point3> {
        if !w.is_finite() || !self.scale.is_finite() || self.scale <= 0.0 {
            return None;
        }
        let p = Point3::new(
            w.x / self.scale + self.center.x,
            -w.z / self.scale + self.center.y,
            w.y / self.scale + self.center.z,
        );
        if p.is_finite() {
            Some(p)
        } else {
            None
        }
    }

    /// Inverse transform rounded to whole survey units for display.
    pub fn to_survey_rounded(&self, w: WorldPoint) -> Option<Point3> {
        let p = self.to_survey(w)?;
        Some(Point3::new(p.x.round(), p.y.round(), p.z.round()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter_header() -> SurveyHeader {
        SurveyHeader {
            ext_min: Some(Point3::new(0.0, 0.0, 0.0)),
            ext_max: Some(Point3::new(100.0, 50.0, 0.0)),
            units_code: 6,
        }
    }

    #[test]
    fn test_derivation_from_meter_extents() {
        let cs = CoordinateSystem::derive(&meter_header()).unwrap();
        assert_eq!(cs.center, Point3::new(50.0, 25.0, 0.0));
        assert_eq!(cs.scale, 1.0);
        assert_eq!(cs.unit, SurveyUnit::Meters);
        assert_eq!(cs.bounds.width, 100.0);
        assert_eq!(cs.bounds.height, 50.0);
    }

    #[test]
    fn test_center_maps_to_world_origin() {
        let cs = CoordinateSystem::derive(&meter_header()).unwrap();
        let w = cs.to_world(Point3::new(50.0, 25.0, 0.0)).unwrap();
        assert_eq!(w, WorldPoint::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_axis_swap_convention() {
        let cs = CoordinateSystem::derive(&meter_header()).unwrap();
        // +10 on survey Y moves -10 along world depth (Z).
        let w = cs.to_world(Point3::new(50.0, 35.0, 0.0)).unwrap();
        assert_eq!(w, WorldPoint::new(0.0, 0.0, -10.0));
        // +2 on survey Z (up) moves +2 along world Y.
        let w = cs.to_world(Point3::new(50.0, 25.0, 2.0)).unwrap();
        assert_eq!(w, WorldPoint::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_unit_scale_applied() {
        let header = SurveyHeader {
            units_code: 4, // millimeters
            ..meter_header()
        };
        let cs = CoordinateSystem::derive(&header).unwrap();
        let w = cs.to_world(Point3::new(51.0, 25.0, 0.0)).unwrap();
        assert!((w.x - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_missing_extents_fail_derivation() {
        let header = SurveyHeader {
            ext_min: None,
            ..meter_header()
        };
        assert!(CoordinateSystem::derive(&header).is_none());
    }

    #[test]
    fn test_non_finite_extents_fail_derivation() {
        let header = SurveyHeader {
            ext_max: Some(Point3::new(f64::NAN, 50.0, 0.0)),
            ..meter_header()
        };
        assert!(CoordinateSystem::derive(&header).is_none());
    }

    #[test]
    fn test_round_trip() {
        let cs = CoordinateSystem::derive(&meter_header()).unwrap();
        let p = Point3::new(12.34, -56.78, 3.21);
        let back = cs.to_survey(cs.to_world(p).unwrap()).unwrap();
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
        assert!((back.z - p.z).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_point_rejected() {
        let cs = CoordinateSystem::derive(&meter_header()).unwrap();
        assert!(cs.to_world(Point3::new(f64::NAN, 0.0, 0.0)).is_none());
        assert!(cs.to_survey(WorldPoint::new(f64::INFINITY, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_rounded_inverse() {
        let cs = CoordinateSystem::derive(&meter_header()).unwrap();
        let w = cs.to_world(Point3::new(12.6, 30.4, 0.0)).unwrap();
        let p = cs.to_survey_rounded(w).unwrap();
        assert_eq!(p, Point3::new(13.0, 30.0, 0.0));
    }
}
