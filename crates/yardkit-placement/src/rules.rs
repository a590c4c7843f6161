//! Stacking-rule validation
//!
//! Validates a candidate placement against the physical rules of the
//! yard. Violations are collected into one list rather than failing fast,
//! so a rejected placement surfaces every broken rule at once.

use serde::{Deserialize, Serialize};
use tracing::trace;
use yardkit_core::constants::{BAY_COUNT, ROW_COUNT, TIER_COUNT};

use crate::occupancy::OccupancyView;
use crate::slot::Slot;

/// A named rule violation, wire-coded for the API layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleViolation {
    /// The exact slot already holds a container
    PositionOccupied,
    /// Tier above 1 with nothing occupied directly below
    NoSupport,
    /// Tier outside the legal range
    MaxTier,
    /// Row or bay outside the fixed yard grid
    OutOfGrid,
    /// The occupant already has an active placement elsewhere
    AlreadyPlaced,
    /// The whole grid is exhausted (reported by suggestion, not validation)
    NoPositions,
    /// A caller-supplied extension rule fired
    Custom(String),
}

impl RuleViolation {
    /// Wire code as transmitted to the API layer
    pub fn code(&self) -> &str {
        match self {
            RuleViolation::PositionOccupied => "POSITION_OCCUPIED",
            RuleViolation::NoSupport => "NO_SUPPORT",
            RuleViolation::MaxTier => "MAX_TIER",
            RuleViolation::OutOfGrid => "OUT_OF_GRID",
            RuleViolation::AlreadyPlaced => "ALREADY_PLACED",
            RuleViolation::NoPositions => "NO_POSITIONS",
            RuleViolation::Custom(code) => code,
        }
    }
}

/// Outcome of validating one candidate slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementCheck {
    pub valid: bool,
    pub violations: Vec<RuleViolation>,
}

impl PlacementCheck {
    fn from_violations(violations: Vec<RuleViolation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }
}

/// Extension rule: weight/size/hazmat/company policies the API layer may
/// layer on without changing the validation interface. Returns a violation
/// when the rule rejects the candidate.
pub type ExtraRule<'a> = dyn Fn(&Slot, &dyn OccupancyView) -> Option<RuleViolation> + 'a;

/// Validate a candidate slot against the core stacking rules.
///
/// Tier 1 is always supportable; tier > 1 requires an occupied footprint
/// at tier-1 (`NO_SUPPORT`). The exact slot must be free
/// (`POSITION_OCCUPIED`). Violations accumulate; the check is valid only
/// when the list is empty.
pub fn validate_placement(candidate: &Slot, occupancy: &dyn OccupancyView) -> PlacementCheck {
    validate_placement_with(candidate, occupancy, &[])
}

/// [`validate_placement`] plus caller-supplied extension rules.
pub fn validate_placement_with(
    candidate: &Slot,
    occupancy: &dyn OccupancyView,
    extra_rules: &[&ExtraRule<'_>],
) -> PlacementCheck {
    let mut violations = Vec::new();

    if candidate.tier < 1 || candidate.tier > TIER_COUNT {
        violations.push(RuleViolation::MaxTier);
    }

    // Wire references beyond the grid parse but never place.
    if candidate.row < 1
        || candidate.row > ROW_COUNT
        || candidate.bay < 1
        || candidate.bay > BAY_COUNT
    {
        violations.push(RuleViolation::OutOfGrid);
    }

    if occupancy.is_occupied(candidate) {
        violations.push(RuleViolation::PositionOccupied);
    }

    if let Some(below) = candidate.below() {
        if !occupancy.is_footprint_occupied(&below) {
            violations.push(RuleViolation::NoSupport);
        }
    }

    for rule in extra_rules {
        if let Some(violation) = rule(candidate, occupancy) {
            violations.push(violation);
        }
    }

    trace!(slot = %candidate, violations = violations.len(), "validated placement");
    PlacementCheck::from_violations(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::SlotMap;
    use crate::slot::Zone;

    fn slot(s: &str) -> Slot {
        Slot::parse(s).unwrap()
    }

    #[test]
    fn test_ground_tier_on_empty_yard_is_valid() {
        let map = SlotMap::new();
        let check = validate_placement(&slot("A-R01-B01-T1"), &map);
        assert!(check.valid);
        assert!(check.violations.is_empty());
    }

    #[test]
    fn test_supported_tier_is_valid() {
        let mut map = SlotMap::new();
        map.place(slot("A-R01-B01-T1"), "ONE");
        let check = validate_placement(&slot("A-R01-B01-T2"), &map);
        assert!(check.valid);
    }

    #[test]
    fn test_unsupported_tier_reports_no_support() {
        let mut map = SlotMap::new();
        map.place(slot("A-R01-B01-T1"), "ONE");
        let check = validate_placement(&slot("B-R01-B01-T2"), &map);
        assert!(!check.valid);
        assert_eq!(check.violations, vec![RuleViolation::NoSupport]);
    }

    #[test]
    fn test_occupied_slot_reports_position_occupied() {
        let mut map = SlotMap::new();
        map.place(slot("C-R05-B05-T1"), "ONE");
        let check = validate_placement(&slot("C-R05-B05-T1"), &map);
        assert_eq!(check.violations, vec![RuleViolation::PositionOccupied]);
    }

    #[test]
    fn test_multiple_violations_collected_together() {
        let mut map = SlotMap::new();
        // Occupied AND floating: tier 2 occupied with nothing below it.
        map.place(slot("D-R02-B02-T2"), "GHOST");
        let check = validate_placement(&slot("D-R02-B02-T2"), &map);
        assert!(!check.valid);
        assert!(check.violations.contains(&RuleViolation::PositionOccupied));
        assert!(check.violations.contains(&RuleViolation::NoSupport));
        assert_eq!(check.violations.len(), 2);
    }

    #[test]
    fn test_half_slot_supports_tier_above() {
        let mut map = SlotMap::new();
        map.place(slot("A-R01-B01-T1-A"), "HALF");
        let check = validate_placement(&slot("A-R01-B01-T2"), &map);
        assert!(check.valid);
    }

    #[test]
    fn test_out_of_grid_slot_is_rejected() {
        let map = SlotMap::new();
        let check = validate_placement(&slot("A-R03-B15-T1"), &map);
        assert!(!check.valid);
        assert!(check.violations.contains(&RuleViolation::OutOfGrid));
        assert_eq!(RuleViolation::OutOfGrid.code(), "OUT_OF_GRID");
    }

    #[test]
    fn test_extra_rule_adds_named_violation() {
        let map = SlotMap::new();
        let no_zone_e = |candidate: &Slot, _: &dyn OccupancyView| {
            (candidate.zone == Zone::E).then(|| RuleViolation::Custom("HAZMAT_ZONE".into()))
        };
        let check = validate_placement_with(&slot("E-R01-B01-T1"), &map, &[&no_zone_e]);
        assert!(!check.valid);
        assert_eq!(check.violations[0].code(), "HAZMAT_ZONE");
    }

    #[test]
    fn test_violation_wire_codes() {
        assert_eq!(RuleViolation::PositionOccupied.code(), "POSITION_OCCUPIED");
        assert_eq!(RuleViolation::NoSupport.code(), "NO_SUPPORT");
        assert_eq!(
            serde_json::to_string(&RuleViolation::NoSupport).unwrap(),
            "\"NO_SUPPORT\""
        );
    }
}
