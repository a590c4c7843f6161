//! Placement lifecycle operations
//!
//! Pure proposal functions: each validates against the supplied occupancy
//! snapshot and returns a [`PlacementOp`] describing the mutation for the
//! caller to apply transactionally. Nothing here writes anywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use yardkit_core::PlacementError;

use crate::occupancy::OccupancyView;
use crate::rules::{validate_placement, RuleViolation};
use crate::slot::{Slot, Zone};
use crate::suggest::suggest;

/// An active assignment of a container to a slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: Uuid,
    pub slot: Slot,
    pub occupant_id: String,
    /// True when the slot came from the suggestion scan rather than a
    /// dispatcher's explicit choice
    pub auto_assigned: bool,
    pub placed_at: DateTime<Utc>,
}

impl Placement {
    pub fn new(slot: Slot, occupant_id: impl Into<String>, auto_assigned: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            slot,
            occupant_id: occupant_id.into(),
            auto_assigned,
            placed_at: Utc::now(),
        }
    }
}

/// A proposed occupancy mutation, applied transactionally by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PlacementOp {
    /// Create a new placement
    Assign { placement: Placement },
    /// Move an existing placement to a new slot
    Move {
        placement_id: Uuid,
        from: Slot,
        to: Slot,
    },
    /// Remove a placement (container exits the yard)
    Remove { placement_id: Uuid, slot: Slot },
}

fn check_rules(slot: &Slot, occupancy: &dyn OccupancyView) -> Result<(), PlacementError> {
    let check = validate_placement(slot, occupancy);
    // First violation wins as the error; callers wanting the full list
    // run validate_placement directly.
    if let Some(violation) = check.violations.into_iter().next() {
        return Err(match violation {
            RuleViolation::PositionOccupied => PlacementError::PositionOccupied {
                slot: slot.to_string(),
            },
            RuleViolation::NoSupport => PlacementError::NoSupport {
                slot: slot.to_string(),
            },
            RuleViolation::MaxTier => PlacementError::MaxTier {
                tier: slot.tier,
                max: yardkit_core::constants::TIER_COUNT,
            },
            RuleViolation::OutOfGrid => {
                if slot.row < 1 || slot.row > yardkit_core::constants::ROW_COUNT {
                    PlacementError::CoordinateRange {
                        field: "row",
                        value: slot.row,
                        max: yardkit_core::constants::ROW_COUNT,
                    }
                } else {
                    PlacementError::CoordinateRange {
                        field: "bay",
                        value: slot.bay,
                        max: yardkit_core::constants::BAY_COUNT,
                    }
                }
            }
            RuleViolation::AlreadyPlaced => PlacementError::AlreadyPlaced {
                occupant_id: String::new(),
                slot: slot.to_string(),
            },
            RuleViolation::NoPositions => PlacementError::NoPositions,
            RuleViolation::Custom(code) => PlacementError::InvalidSlot { input: code },
        });
    }
    Ok(())
}

/// Propose assigning an occupant to a slot.
///
/// With `slot = None` the suggestion scan picks one (marked
/// `auto_assigned`). An occupant that already has an active placement is
/// rejected with `ALREADY_PLACED` — exits must be recorded first.
pub fn propose_assign(
    occupant_id: &str,
    slot: Option<Slot>,
    zone_preference: Option<Zone>,
    occupancy: &dyn OccupancyView,
) -> Result<PlacementOp, PlacementError> {
    if let Some(existing) = occupancy.slot_of(occupant_id) {
        return Err(PlacementError::AlreadyPlaced {
            occupant_id: occupant_id.to_string(),
            slot: existing.to_string(),
        });
    }

    let (target, auto_assigned) = match slot {
        Some(slot) => {
            check_rules(&slot, occupancy)?;
            (slot, false)
        }
        None => (suggest(zone_preference, occupancy)?.slot, true),
    };

    debug!(occupant = occupant_id, slot = %target, auto_assigned, "proposing assignment");
    Ok(PlacementOp::Assign {
        placement: Placement::new(target, occupant_id, auto_assigned),
    })
}

/// Propose moving an existing placement to a target slot.
///
/// The target is validated against the snapshot as-is; moving a container
/// onto its own support stack is the caller's modelling problem (it must
/// remove before re-validating if the origin slot matters).
pub fn propose_move(
    placement: &Placement,
    target: Slot,
    occupancy: &dyn OccupancyView,
) -> Result<PlacementOp, PlacementError> {
    if target == placement.slot {
        return Err(PlacementError::PositionOccupied {
            slot: target.to_string(),
        });
    }
    check_rules(&target, occupancy)?;
    Ok(PlacementOp::Move {
        placement_id: placement.id,
        from: placement.slot,
        to: target,
    })
}

/// Propose removing a placement (yard exit).
pub fn propose_remove(placement: &Placement) -> PlacementOp {
    PlacementOp::Remove {
        placement_id: placement.id,
        slot: placement.slot,
    }
}
