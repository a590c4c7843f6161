//! # YardKit Core
//!
//! Core types, units, and error handling for YardKit.
//! Provides the fundamental value types (survey points, unit codes,
//! yard-grid constants) shared by every other crate in the workspace.

pub mod constants;
pub mod error;
pub mod types;
pub mod units;

pub use error::{Error, PlacementError, Result, SceneError, SurveyError};
pub use types::{Point2, Point3};
pub use units::SurveyUnit;
