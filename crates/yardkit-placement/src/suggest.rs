//! Available-slot search and greedy suggestion
//!
//! Both operations scan the fixed 5x10x10x4 grid in canonical nested
//! order (zone, row, bay, tier ascending). The scan order IS the
//! tie-break rule: given the same occupancy snapshot the first legal slot
//! is always the same, so suggestions are deterministic and reproducible.

use serde::{Deserialize, Serialize};
use tracing::debug;
use yardkit_core::constants::{BAY_COUNT, ROW_COUNT, TIER_COUNT};
use yardkit_core::PlacementError;

use crate::occupancy::OccupancyView;
use crate::rules::validate_placement;
use crate::slot::{Slot, SlotFilter, Zone};

/// How many ranked alternatives accompany the primary suggestion
const ALTERNATIVE_COUNT: usize = 3;

/// A placement suggestion: the primary slot plus ranked fallbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// First legal slot in scan order
    pub slot: Slot,
    /// Up to 3 next-best legal slots, in the same scan order
    pub alternatives: Vec<Slot>,
}

/// Iterate the whole grid in canonical order, preferred zone first.
fn grid_scan(zone_preference: Option<Zone>) -> impl Iterator<Item = Slot> {
    let mut zones: Vec<Zone> = Vec::with_capacity(Zone::ALL.len());
    if let Some(preferred) = zone_preference {
        zones.push(preferred);
    }
    zones.extend(Zone::ALL.iter().copied().filter(|z| Some(*z) != zone_preference));

    zones.into_iter().flat_map(|zone| {
        (1..=ROW_COUNT).flat_map(move |row| {
            (1..=BAY_COUNT).flat_map(move |bay| {
                (1..=TIER_COUNT).map(move |tier| Slot {
                    zone,
                    row,
                    bay,
                    tier,
                    sub_slot: None,
                })
            })
        })
    })
}

/// Enumerate every slot that is unoccupied and either on the ground tier
/// or supported from below, optionally narrowed by zone and/or tier.
///
/// The occupancy view is a per-call snapshot; results are stale the
/// moment the yard changes.
pub fn list_available(filter: &SlotFilter, occupancy: &dyn OccupancyView) -> Vec<Slot> {
    grid_scan(None)
        .filter(|slot| filter.zone.map_or(true, |z| slot.zone == z))
        .filter(|slot| filter.tier.map_or(true, |t| slot.tier == t))
        .filter(|slot| validate_placement(slot, occupancy).valid)
        .collect()
}

/// Greedy placement suggestion.
///
/// Scans the preferred zone first (then the remaining zones A..E), rows,
/// bays, and tiers ascending, and returns the first slot that is
/// unoccupied and satisfies the support rule, with up to 3 ranked
/// alternatives found by continuing the same scan. Stateless: concurrent
/// callers given the same snapshot receive the same answer — reservation
/// is the persistence layer's problem, not this function's.
///
/// Returns [`PlacementError::NoPositions`] when the grid is exhausted.
pub fn suggest(
    zone_preference: Option<Zone>,
    occupancy: &dyn OccupancyView,
) -> Result<Suggestion, PlacementError> {
    let mut legal = grid_scan(zone_preference)
        .filter(|slot| validate_placement(slot, occupancy).valid)
        .take(1 + ALTERNATIVE_COUNT);

    let primary = legal.next().ok_or(PlacementError::NoPositions)?;
    let alternatives: Vec<Slot> = legal.collect();
    debug!(slot = %primary, alternatives = alternatives.len(), "suggested placement");
    Ok(Suggestion {
        slot: primary,
        alternatives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::SlotMap;

    fn slot(s: &str) -> Slot {
        Slot::parse(s).unwrap()
    }

    #[test]
    fn test_empty_yard_suggests_first_slot() {
        let map = SlotMap::new();
        let suggestion = suggest(None, &map).unwrap();
        assert_eq!(suggestion.slot, slot("A-R01-B01-T1"));
    }

    #[test]
    fn test_zone_preference_scans_that_zone_first() {
        let map = SlotMap::new();
        let suggestion = suggest(Some(Zone::C), &map).unwrap();
        assert_eq!(suggestion.slot, slot("C-R01-B01-T1"));
    }

    #[test]
    fn test_occupied_ground_slot_offers_tier_above() {
        let mut map = SlotMap::new();
        map.place(slot("A-R01-B01-T1"), "ONE");
        let suggestion = suggest(None, &map).unwrap();
        // Tier 2 of the same bay comes before bay 2 in scan order and is
        // supported by the container below.
        assert_eq!(suggestion.slot, slot("A-R01-B01-T2"));
    }

    #[test]
    fn test_alternatives_follow_scan_order() {
        let map = SlotMap::new();
        let suggestion = suggest(None, &map).unwrap();
        assert_eq!(
            suggestion.alternatives,
            vec![slot("A-R01-B02-T1"), slot("A-R01-B03-T1"), slot("A-R01-B04-T1")]
        );
    }

    #[test]
    fn test_determinism() {
        let mut map = SlotMap::new();
        map.place(slot("A-R01-B01-T1"), "ONE");
        map.place(slot("A-R01-B01-T2"), "TWO");
        let a = suggest(Some(Zone::A), &map).unwrap();
        let b = suggest(Some(Zone::A), &map).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_grid_reports_no_positions() {
        let mut map = SlotMap::new();
        for s in grid_scan(None) {
            map.place(s, "FULL");
        }
        assert_eq!(map.len(), yardkit_core::constants::GRID_CAPACITY);
        assert_eq!(suggest(None, &map), Err(PlacementError::NoPositions));
    }

    #[test]
    fn test_single_remaining_slot_found_by_full_scan() {
        let mut map = SlotMap::new();
        let last = slot("E-R10-B10-T1");
        for s in grid_scan(None) {
            if s != last {
                map.place(s, "FULL");
            }
        }
        let suggestion = suggest(None, &map).unwrap();
        assert_eq!(suggestion.slot, last);
        assert!(suggestion.alternatives.is_empty());
    }

    #[test]
    fn test_list_available_respects_filter() {
        let map = SlotMap::new();
        let filter = SlotFilter {
            zone: Some(Zone::B),
            tier: Some(1),
        };
        let available = list_available(&filter, &map);
        // 10 rows x 10 bays on the ground tier of one zone.
        assert_eq!(available.len(), 100);
        assert!(available.iter().all(|s| s.zone == Zone::B && s.tier == 1));
    }

    #[test]
    fn test_list_available_excludes_unsupported_tiers() {
        let map = SlotMap::new();
        let filter = SlotFilter::default();
        let available = list_available(&filter, &map);
        // Empty yard: only ground-tier slots are placeable.
        assert_eq!(available.len(), 500);
        assert!(available.iter().all(|s| s.tier == 1));
    }

    #[test]
    fn test_suggestions_are_legal() {
        let mut map = SlotMap::new();
        map.place(slot("A-R01-B01-T1"), "ONE");
        map.place(slot("A-R01-B02-T1"), "TWO");
        let suggestion = suggest(None, &map).unwrap();
        assert!(validate_placement(&suggestion.slot, &map).valid);
        for alt in &suggestion.alternatives {
            assert!(validate_placement(alt, &map).valid);
        }
    }
}
