//! Shared constants for the yard grid and scene building

/// Number of yard zones (A through E)
pub const ZONE_COUNT: usize = 5;

/// Rows per zone
pub const ROW_COUNT: u8 = 10;

/// Bays per row
pub const BAY_COUNT: u8 = 10;

/// Stacking tiers per bay
pub const TIER_COUNT: u8 = 4;

/// Total addressable slots in the yard grid
pub const GRID_CAPACITY: usize = ZONE_COUNT * ROW_COUNT as usize * BAY_COUNT as usize * TIER_COUNT as usize;

/// Hardware texture ceiling for label canvases (px per side)
pub const MAX_LABEL_TEXTURE_PX: u32 = 4096;

/// Relative tolerance for survey/world round-trip comparisons
pub const COORD_EPSILON: f64 = 1e-6;

/// Default tessellation segments for a bulge arc
pub const BULGE_ARC_SEGMENTS: usize = 16;

/// Default tessellation segments for an ellipse
pub const ELLIPSE_SEGMENTS: usize = 64;

/// Minimum sample count for spline interpolation
pub const SPLINE_MIN_SAMPLES: usize = 50;

/// Maximum nesting depth for block-insert expansion
pub const MAX_INSERT_DEPTH: usize = 8;
