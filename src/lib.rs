//! # YardKit
//!
//! A container-terminal yard toolkit: converts a CAD site survey into a
//! navigable 3D coordinate system and scene graph, and manages container
//! placements on the yard's slot grid (zone/row/bay/tier).
//!
//! ## Architecture
//!
//! YardKit is organized as a workspace with multiple crates:
//!
//! 1. **yardkit-core** - Core types, units, constants, error taxonomy
//! 2. **yardkit-geometry** - Pure tessellation and measurement primitives
//! 3. **yardkit-survey** - Survey document model and coordinate transforms
//! 4. **yardkit-scene** - Layer-partitioned scene building
//! 5. **yardkit-placement** - Slot grid, stacking rules, suggestions
//! 6. **yardkit** - Main binary that integrates all crates

pub use yardkit_geometry as geometry;
pub use yardkit_placement as placement;
pub use yardkit_scene as scene;
pub use yardkit_survey as survey;

pub use yardkit_core::{
    Error, PlacementError, Point2, Point3, Result, SceneError, SurveyError, SurveyUnit,
};

pub use yardkit_placement::{
    list_available, propose_assign, propose_move, propose_remove, suggest, validate_placement,
    OccupancyView, Placement, PlacementCheck, PlacementOp, RuleViolation, Slot, SlotFilter,
    SlotMap, Suggestion, SubSlot, Zone,
};

pub use yardkit_scene::{LabelSprite, SceneBuilder, SceneGraph, SceneOptions, SceneStats};

pub use yardkit_survey::{CoordinateSystem, SurveyDocument, WorldPoint};

/// Initialize logging with the default configuration
///
/// Sets up structured logging with console output, honoring the
/// `RUST_LOG` environment variable and defaulting to INFO.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

/// Build date baked in at compile time
pub fn build_date() -> &'static str {
    env!("BUILD_DATE")
}
