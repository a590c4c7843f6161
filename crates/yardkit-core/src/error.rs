//! Error handling for YardKit
//!
//! Provides error types for each layer of the pipeline:
//! - Survey errors (document loading / coordinate-system derivation)
//! - Scene errors (scene-graph assembly)
//! - Placement errors (yard-grid domain rules)
//!
//! All error types use `thiserror`. Geometry primitives and coordinate
//! transforms deliberately do NOT use these: they signal bad input with
//! `None`/empty results so batch conversion degrades entity-by-entity.

use thiserror::Error;

/// Survey document error type
///
/// Represents failures loading or interpreting the parsed survey document.
#[derive(Error, Debug)]
pub enum SurveyError {
    /// Document JSON could not be parsed
    #[error("Malformed survey document: {reason}")]
    MalformedDocument {
        /// Why deserialization failed.
        reason: String,
    },

    /// Document file could not be read
    #[error("Failed to read survey file {path}: {reason}")]
    FileRead {
        /// Path that failed to open.
        path: String,
        /// The underlying I/O failure.
        reason: String,
    },
}

/// Scene building error type
#[derive(Error, Debug)]
pub enum SceneError {
    /// No coordinate system could be derived for the document
    #[error("No coordinate system available: {reason}")]
    NoCoordinateSystem {
        /// Why derivation failed.
        reason: String,
    },

    /// Fill tessellation failed for a boundary path
    #[error("Fill tessellation failed on layer {layer}: {reason}")]
    Tessellation {
        /// Layer the failing shape belongs to.
        layer: String,
        /// The tessellator's failure message.
        reason: String,
    },
}

/// Yard placement error type
///
/// Domain rule violations and grid-level outcomes. These are expected,
/// recoverable conditions reported to the caller, not defects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// Every slot in the grid is occupied or unsupported
    #[error("No positions available in the yard grid")]
    NoPositions,

    /// The requested slot already holds a container
    #[error("Position {slot} is already occupied")]
    PositionOccupied {
        /// Canonical slot string.
        slot: String,
    },

    /// A tier above 1 has no occupied slot directly below it
    #[error("Position {slot} has no support at the tier below")]
    NoSupport {
        /// Canonical slot string.
        slot: String,
    },

    /// Tier outside the valid [1, 4] range
    #[error("Tier {tier} is outside the valid range 1..={max}")]
    MaxTier {
        /// The offending tier value.
        tier: u8,
        /// The highest legal tier.
        max: u8,
    },

    /// Row or bay outside the valid [1, 10] range
    #[error("{field} {value} is outside the valid range 1..={max}")]
    CoordinateRange {
        /// Which coordinate was out of range ("row" or "bay").
        field: &'static str,
        /// The offending value.
        value: u8,
        /// The highest legal value.
        max: u8,
    },

    /// The occupant already has an active placement
    #[error("Occupant {occupant_id} is already placed at {slot}")]
    AlreadyPlaced {
        /// The container identifier.
        occupant_id: String,
        /// Where it currently sits.
        slot: String,
    },

    /// A slot string did not match the canonical format
    #[error("Unparseable slot reference: {input}")]
    InvalidSlot {
        /// The rejected input.
        input: String,
    },
}

/// Main error type for YardKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Survey document error
    #[error(transparent)]
    Survey(#[from] SurveyError),

    /// Scene building error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Yard placement error
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a survey document error
    pub fn is_survey_error(&self) -> bool {
        matches!(self, Error::Survey(_))
    }

    /// Check if this is a placement rule error
    pub fn is_placement_error(&self) -> bool {
        matches!(self, Error::Placement(_))
    }

    /// Check if this reports grid exhaustion
    pub fn is_grid_exhausted(&self) -> bool {
        matches!(self, Error::Placement(PlacementError::NoPositions))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_error_messages() {
        let err = PlacementError::PositionOccupied {
            slot: "A-R01-B01-T1".to_string(),
        };
        assert_eq!(err.to_string(), "Position A-R01-B01-T1 is already occupied");

        let err = PlacementError::MaxTier { tier: 5, max: 4 };
        assert_eq!(err.to_string(), "Tier 5 is outside the valid range 1..=4");
    }

    #[test]
    fn test_tessellation_error_names_the_layer() {
        let err = SceneError::Tessellation {
            layer: "HATCH_PAVING".to_string(),
            reason: "boundary produced no triangles".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Fill tessellation failed on layer HATCH_PAVING: boundary produced no triangles"
        );
    }

    #[test]
    fn test_unified_error_predicates() {
        let err: Error = PlacementError::NoPositions.into();
        assert!(err.is_placement_error());
        assert!(err.is_grid_exhausted());
        assert!(!err.is_survey_error());
    }
}
