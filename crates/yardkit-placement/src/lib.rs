//! # YardKit Placement
//!
//! The yard placement engine: slot addressing (zone/row/bay/tier plus
//! optional sub-slot), stacking-rule validation, available-slot search,
//! and the deterministic greedy suggestion scan.
//!
//! The engine owns no state. Every function takes a read-only
//! [`OccupancyView`] snapshot supplied by the caller (the persistence
//! layer) and returns proposed mutations for the caller to apply
//! transactionally. Occupancy is never cached across calls.

pub mod occupancy;
pub mod ops;
pub mod rules;
pub mod slot;
pub mod suggest;

pub use occupancy::{OccupancyView, SlotMap};
pub use ops::{Placement, PlacementOp, propose_assign, propose_move, propose_remove};
pub use rules::{validate_placement, validate_placement_with, ExtraRule, PlacementCheck, RuleViolation};
pub use slot::{Slot, SlotFilter, SubSlot, Zone};
pub use suggest::{list_available, suggest, Suggestion};
