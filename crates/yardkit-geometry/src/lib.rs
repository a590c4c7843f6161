//! # YardKit Geometry
//!
//! Pure tessellation and measurement primitives over survey-plane points.
//! Every function validates finiteness of its inputs and outputs: invalid
//! samples are dropped (empty vec / `None` / zero) rather than propagated
//! as NaN into downstream scene building.

pub mod arcs;
pub mod polygon;

pub use arcs::{
    bulge_arc_points, bulge_arc_points_default, circular_arc_points, ellipse_points,
    ellipse_points_default,
};
pub use polygon::{bounding_box, path_length, polygon_area, polygon_centroid};
