//! Survey-space point types
//!
//! Plain value types for 2D and 3D survey coordinates. These carry raw
//! document coordinates (whatever unit the survey was drawn in) — the
//! coordinate system in `yardkit-survey` is what maps them into world space.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// 2D point in survey-plane coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point2) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// 3D point in survey coordinates (Z is the survey's up axis)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True when all three components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Drop the Z component
    pub fn truncate(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

impl From<Point2> for Point3 {
    fn from(p: Point2) -> Self {
        Point3::new(p.x, p.y, 0.0)
    }
}
