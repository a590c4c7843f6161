//! # YardKit Survey
//!
//! Data model for the parsed CAD site survey (entities, blocks, layers,
//! header) and the coordinate system derived from it. The document arrives
//! pre-parsed as JSON from the external CAD collaborator; this crate never
//! reads raw DXF.

pub mod coords;
pub mod entity;

pub use coords::{CoordinateSystem, SurveyBounds, WorldPoint};
pub use entity::{
    Block, Entity, EntityKind, HatchEdge, LayerInfo, PolylineVertex, SurveyDocument, SurveyHeader,
};
