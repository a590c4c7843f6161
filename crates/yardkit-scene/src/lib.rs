//! # YardKit Scene
//!
//! Turns a parsed survey document plus its coordinate system into a
//! layer-partitioned scene graph: merged line batches per layer, filled
//! shapes for hatches and solids, billboard label sprites for text, and
//! block-instance expansion for inserts. Rendering itself is external;
//! the scene graph is the product.

pub mod builder;
pub mod cache;
pub mod labels;

pub use builder::{
    FilledShape, LayerGroup, LineBatch, SceneBuilder, SceneGraph, SceneOptions, SceneStats,
};
pub use cache::{BoxDimensions, BoxGeometry, GeometryCache, MarkerInstance};
pub use labels::{label_canvas_size, strip_mtext_codes, LabelSprite};
