//! Container-box geometry cache
//!
//! The yard overlay draws many identical container boxes (every 40ft box
//! shares one geometry). The cache is owned by the scene builder instance
//! and keyed by quantized dimensions, with an explicit `clear()` tied to
//! scene teardown. It is deliberately not a process-wide singleton.

use glam::{Mat4, Vec3};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Box dimensions in meters, quantized to millimeters for cache keying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxDimensions {
    length_mm: u32,
    width_mm: u32,
    height_mm: u32,
}

impl BoxDimensions {
    /// Quantize meter dimensions to a cache key. Non-finite or
    /// non-positive dimensions have no valid geometry.
    pub fn from_meters(length: f64, width: f64, height: f64) -> Option<Self> {
        if ![length, width, height]
            .iter()
            .all(|d| d.is_finite() && *d > 0.0)
        {
            return None;
        }
        Some(Self {
            length_mm: (length * 1000.0).round() as u32,
            width_mm: (width * 1000.0).round() as u32,
            height_mm: (height * 1000.0).round() as u32,
        })
    }

    pub fn length_m(&self) -> f32 {
        self.length_mm as f32 / 1000.0
    }

    pub fn width_m(&self) -> f32 {
        self.width_mm as f32 / 1000.0
    }

    pub fn height_m(&self) -> f32 {
        self.height_mm as f32 / 1000.0
    }
}

/// Triangle-list box geometry shared between marker instances
#[derive(Debug)]
pub struct BoxGeometry {
    pub dimensions: BoxDimensions,
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl BoxGeometry {
    /// Axis-aligned box centered on the origin at ground level: X is the
    /// container length, Z the width (world depth), Y the height with the
    /// base at y=0.
    fn build(dimensions: BoxDimensions) -> Self {
        let hl = dimensions.length_m() / 2.0;
        let hw = dimensions.width_m() / 2.0;
        let h = dimensions.height_m();

        let vertices = vec![
            Vec3::new(-hl, 0.0, -hw),
            Vec3::new(hl, 0.0, -hw),
            Vec3::new(hl, 0.0, hw),
            Vec3::new(-hl, 0.0, hw),
            Vec3::new(-hl, h, -hw),
            Vec3::new(hl, h, -hw),
            Vec3::new(hl, h, hw),
            Vec3::new(-hl, h, hw),
        ];
        // Two triangles per face, outward winding.
        let indices = vec![
            0, 2, 1, 0, 3, 2, // bottom
            4, 5, 6, 4, 6, 7, // top
            0, 1, 5, 0, 5, 4, // near
            2, 3, 7, 2, 7, 6, // far
            1, 2, 6, 1, 6, 5, // right
            3, 0, 4, 3, 4, 7, // left
        ];
        Self {
            dimensions,
            vertices,
            indices,
        }
    }
}

/// One container box placed in the world
#[derive(Debug, Clone)]
pub struct MarkerInstance {
    pub geometry: Arc<BoxGeometry>,
    pub transform: Mat4,
    /// Occupant identifier for picking
    pub occupant_id: String,
}

/// Dimension-keyed box geometry cache owned by the scene builder
#[derive(Debug, Default)]
pub struct GeometryCache {
    boxes: HashMap<BoxDimensions, Arc<BoxGeometry>>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch or build the shared geometry for a box of these dimensions
    pub fn box_geometry(&mut self, dims: BoxDimensions) -> Arc<BoxGeometry> {
        self.boxes
            .entry(dims)
            .or_insert_with(|| {
                trace!(?dims, "building container box geometry");
                Arc::new(BoxGeometry::build(dims))
            })
            .clone()
    }

    /// Number of distinct cached geometries
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Drop all cached geometry; call on scene teardown
    pub fn clear(&mut self) {
        self.boxes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_dimensions_share_geometry() {
        let mut cache = GeometryCache::new();
        let dims = BoxDimensions::from_meters(12.192, 2.438, 2.591).unwrap();
        let a = cache.box_geometry(dims);
        let b = cache.box_geometry(dims);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_dimensions_get_distinct_geometry() {
        let mut cache = GeometryCache::new();
        let forty = BoxDimensions::from_meters(12.192, 2.438, 2.591).unwrap();
        let twenty = BoxDimensions::from_meters(6.058, 2.438, 2.591).unwrap();
        cache.box_geometry(forty);
        cache.box_geometry(twenty);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(BoxDimensions::from_meters(0.0, 2.0, 2.0).is_none());
        assert!(BoxDimensions::from_meters(12.0, f64::NAN, 2.0).is_none());
        assert!(BoxDimensions::from_meters(-1.0, 2.0, 2.0).is_none());
    }

    #[test]
    fn test_box_geometry_shape() {
        let dims = BoxDimensions::from_meters(12.0, 2.4, 2.6).unwrap();
        let geo = BoxGeometry::build(dims);
        assert_eq!(geo.vertices.len(), 8);
        assert_eq!(geo.indices.len(), 36);
        // Base sits on the ground plane, top at the box height.
        assert!(geo.vertices.iter().all(|v| v.y >= 0.0));
        assert!(geo.vertices.iter().any(|v| (v.y - 2.6).abs() < 1e-6));
    }

    #[test]
    fn test_clear_empties_cache() {
        let mut cache = GeometryCache::new();
        cache.box_geometry(BoxDimensions::from_meters(6.0, 2.4, 2.6).unwrap());
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
