//! Survey document data model
//!
//! Entities are a closed tagged union over the survey primitive kinds the
//! pipeline understands. The external parser exports the document as JSON
//! with a lowercase `type` tag per entity; unknown tags collapse to
//! [`EntityKind::Unsupported`] so one exotic entity never rejects the
//! whole document.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use yardkit_core::{Point2, Point3, SurveyError};

/// One polyline vertex with an optional bulge toward the next vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolylineVertex {
    /// Vertex position in the survey plane
    pub point: Point2,
    /// Arc bulge factor toward the next vertex (0 = straight)
    #[serde(default)]
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self {
            point: Point2::new(x, y),
            bulge,
        }
    }
}

/// One edge of a hatch boundary path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HatchEdge {
    /// Polyline sub-path (bulges honored)
    Polyline { vertices: Vec<PolylineVertex> },
    /// Straight sub-path
    Line { start: Point2, end: Point2 },
    /// Circular-arc sub-path, angles in degrees
    Arc {
        center: Point2,
        radius: f64,
        start_angle_deg: f64,
        end_angle_deg: f64,
    },
}

/// The drawable primitive kinds carried by a survey document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityKind {
    /// Straight line segment
    Line { start: Point3, end: Point3 },

    /// Polyline with per-vertex bulges
    Polyline {
        vertices: Vec<PolylineVertex>,
        #[serde(default)]
        closed: bool,
    },

    /// Full circle
    Circle { center: Point2, radius: f64 },

    /// Circular arc, angles in degrees
    Arc {
        center: Point2,
        radius: f64,
        start_angle_deg: f64,
        end_angle_deg: f64,
    },

    /// Parametric ellipse; rotation implied by the major-axis vector
    Ellipse {
        center: Point2,
        major_axis_end: Point2,
        axis_ratio: f64,
        #[serde(default)]
        start_param: f64,
        #[serde(default = "full_turn")]
        end_param: f64,
    },

    /// Block reference
    Insert {
        block: String,
        position: Point3,
        #[serde(default)]
        rotation_deg: f64,
        #[serde(default = "unit_scale")]
        scale: [f64; 3],
    },

    /// Single-line text label
    Text {
        value: String,
        position: Point3,
        height: f64,
        #[serde(default)]
        rotation_deg: f64,
    },

    /// Multi-line formatted text label (control codes still embedded)
    MText {
        value: String,
        position: Point3,
        height: f64,
        #[serde(default)]
        rotation_deg: f64,
    },

    /// Filled region bounded by one or more edge paths
    Hatch { paths: Vec<Vec<HatchEdge>> },

    /// Smooth curve; fit points lie on the curve, control points approximate it
    Spline {
        #[serde(default = "cubic")]
        degree: u32,
        #[serde(default)]
        control_points: Vec<Point2>,
        #[serde(default)]
        fit_points: Vec<Point2>,
    },

    /// 3- or 4-point filled patch
    Solid { points: Vec<Point2> },

    /// Any entity kind the pipeline does not draw (dimensions, wipeouts,
    /// vendor extensions). Kept so one exotic entity never rejects the
    /// whole document; the scene builder skips and counts these.
    #[serde(other)]
    Unsupported,
}

fn full_turn() -> f64 {
    std::f64::consts::TAU
}

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn cubic() -> u32 {
    3
}

/// One survey primitive plus its layer assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(flatten)]
    pub kind: EntityKind,
    /// Layer name; a name absent from the layer table is still valid
    #[serde(default)]
    pub layer: String,
    /// AutoCAD color index, when the entity overrides its layer color
    #[serde(default)]
    pub color_index: Option<u8>,
}

/// Named, reusable entity group referenced by Insert entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    /// Local origin the insert position maps onto
    #[serde(default)]
    pub base_point: Point3,
    pub entities: Vec<Entity>,
}

/// Layer table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub name: String,
    #[serde(default)]
    pub color_index: Option<u8>,
    #[serde(default)]
    pub frozen: bool,
}

/// Survey header variables the pipeline consumes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurveyHeader {
    /// `$EXTMIN` drawing extent, when present
    #[serde(default)]
    pub ext_min: Option<Point3>,
    /// `$EXTMAX` drawing extent, when present
    #[serde(default)]
    pub ext_max: Option<Point3>,
    /// `$INSUNITS` unit code
    #[serde(default)]
    pub units_code: u32,
}

/// A parsed site survey: header, entities, block table, layer table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyDocument {
    #[serde(default)]
    pub header: SurveyHeader,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub blocks: HashMap<String, Block>,
    #[serde(default)]
    pub layers: HashMap<String, LayerInfo>,
}

impl SurveyDocument {
    /// Deserialize a document from the external parser's JSON export
    pub fn from_json_str(json: &str) -> Result<Self, SurveyError> {
        serde_json::from_str(json).map_err(|e| SurveyError::MalformedDocument {
            reason: e.to_string(),
        })
    }

    /// Load a document from a JSON file on disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| SurveyError::FileRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Look up a block by name
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }
}
