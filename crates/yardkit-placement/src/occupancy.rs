//! Occupancy view boundary
//!
//! The engine never touches persistence. Callers hand every function a
//! read-only [`OccupancyView`] snapshot; uniqueness of occupants per slot
//! is the persistence layer's constraint, this crate only promises never
//! to deliberately propose a slot occupied in the snapshot it was given.

use std::collections::HashMap;

use crate::slot::{Slot, SubSlot};

/// Read-only snapshot of which slots hold containers
pub trait OccupancyView {
    /// Is this exact slot (including sub-slot) occupied?
    fn is_occupied(&self, slot: &Slot) -> bool;

    /// Occupant identifier at this exact slot, if any
    fn occupant(&self, slot: &Slot) -> Option<&str>;

    /// The active placement of an occupant, if it has one
    fn slot_of(&self, occupant_id: &str) -> Option<Slot>;

    /// Is any part of the slot's footprint occupied (the whole slot or
    /// either half)? Used for the support rule: a tier is supportable
    /// when something sits in the footprint directly below it.
    fn is_footprint_occupied(&self, slot: &Slot) -> bool {
        let base = slot.footprint();
        self.is_occupied(&base)
            || self.is_occupied(&Slot {
                sub_slot: Some(SubSlot::A),
                ..base
            })
            || self.is_occupied(&Slot {
                sub_slot: Some(SubSlot::B),
                ..base
            })
    }
}

/// In-memory occupancy map keyed by canonical slot string
///
/// The test double and the binary's demo store. Production callers adapt
/// their persistence layer to [`OccupancyView`] instead.
#[derive(Debug, Clone, Default)]
pub struct SlotMap {
    by_slot: HashMap<String, String>,
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an occupant at a slot, replacing any previous occupant there
    pub fn place(&mut self, slot: Slot, occupant_id: impl Into<String>) {
        self.by_slot.insert(slot.to_string(), occupant_id.into());
    }

    /// Clear a slot
    pub fn remove(&mut self, slot: &Slot) -> Option<String> {
        self.by_slot.remove(&slot.to_string())
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }
}

impl OccupancyView for SlotMap {
    fn is_occupied(&self, slot: &Slot) -> bool {
        self.by_slot.contains_key(&slot.to_string())
    }

    fn occupant(&self, slot: &Slot) -> Option<&str> {
        self.by_slot.get(&slot.to_string()).map(String::as_str)
    }

    fn slot_of(&self, occupant_id: &str) -> Option<Slot> {
        self.by_slot
            .iter()
            .find(|(_, id)| id.as_str() == occupant_id)
            .and_then(|(key, _)| Slot::parse(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::Zone;

    #[test]
    fn test_slot_map_basics() {
        let mut map = SlotMap::new();
        let slot = Slot::new(Zone::A, 1, 1, 1, None).unwrap();
        assert!(!map.is_occupied(&slot));

        map.place(slot, "MSKU1234567");
        assert!(map.is_occupied(&slot));
        assert_eq!(map.occupant(&slot), Some("MSKU1234567"));
        assert_eq!(map.slot_of("MSKU1234567"), Some(slot));

        assert_eq!(map.remove(&slot), Some("MSKU1234567".to_string()));
        assert!(!map.is_occupied(&slot));
    }

    #[test]
    fn test_footprint_occupancy_sees_sub_slots() {
        let mut map = SlotMap::new();
        let half = Slot::new(Zone::B, 2, 3, 1, Some(SubSlot::B)).unwrap();
        map.place(half, "TCLU7654321");

        let whole = Slot::new(Zone::B, 2, 3, 1, None).unwrap();
        assert!(!map.is_occupied(&whole));
        assert!(map.is_footprint_occupied(&whole));
    }
}
