//! Slot addressing
//!
//! A slot is one addressable physical yard position. Its canonical string
//! form `"{zone}-R{row:02}-B{bay:02}-T{tier}[-{sub}]"` is the one
//! bit-exact wire format shared with the persistence and API layers;
//! parsing is total (any non-matching string is `None`) and formatting is
//! total on valid slots, and the two are exact inverses.
//!
//! The codec is total over the pattern itself: an out-of-grid reference
//! (say bay 15 in a 10-bay yard) survives the wire and is rejected by
//! placement validation, not silently dropped at the parse boundary.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use yardkit_core::constants::{BAY_COUNT, ROW_COUNT, TIER_COUNT, ZONE_COUNT};
use yardkit_core::PlacementError;

/// Yard zone letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    A,
    B,
    C,
    D,
    E,
}

impl Zone {
    /// All zones in canonical scan order
    pub const ALL: [Zone; ZONE_COUNT] = [Zone::A, Zone::B, Zone::C, Zone::D, Zone::E];

    fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Zone::A),
            'B' => Some(Zone::B),
            'C' => Some(Zone::C),
            'D' => Some(Zone::D),
            'E' => Some(Zone::E),
            _ => None,
        }
    }

    fn as_char(&self) -> char {
        match self {
            Zone::A => 'A',
            Zone::B => 'B',
            Zone::C => 'C',
            Zone::D => 'D',
            Zone::E => 'E',
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Half-slot marker for 20ft containers sharing a 40ft ground slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubSlot {
    A,
    B,
}

impl fmt::Display for SubSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubSlot::A => write!(f, "A"),
            SubSlot::B => write!(f, "B"),
        }
    }
}

/// One addressable yard position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub zone: Zone,
    pub row: u8,
    pub bay: u8,
    pub tier: u8,
    pub sub_slot: Option<SubSlot>,
}

impl Slot {
    /// Construct a slot, validating coordinate ranges.
    pub fn new(
        zone: Zone,
        row: u8,
        bay: u8,
        tier: u8,
        sub_slot: Option<SubSlot>,
    ) -> Result<Self, PlacementError> {
        if row < 1 || row > ROW_COUNT {
            return Err(PlacementError::CoordinateRange {
                field: "row",
                value: row,
                max: ROW_COUNT,
            });
        }
        if bay < 1 || bay > BAY_COUNT {
            return Err(PlacementError::CoordinateRange {
                field: "bay",
                value: bay,
                max: BAY_COUNT,
            });
        }
        if tier < 1 || tier > TIER_COUNT {
            return Err(PlacementError::MaxTier {
                tier,
                max: TIER_COUNT,
            });
        }
        Ok(Self {
            zone,
            row,
            bay,
            tier,
            sub_slot,
        })
    }

    /// Parse a canonical slot string. Total over the pattern: any
    /// non-match is `None`, never a partially-filled slot. Grid
    /// membership is not checked here — an out-of-grid reference parses
    /// and fails placement validation instead (see [`Slot::in_grid`]).
    pub fn parse(input: &str) -> Option<Self> {
        static SLOT_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = SLOT_REGEX.get_or_init(|| {
            Regex::new(r"^([A-E])-R(\d{2})-B(\d{2})-T(\d)(?:-([AB]))?$")
                .expect("invalid slot pattern")
        });

        let caps = re.captures(input)?;
        let zone = Zone::from_char(caps.get(1)?.as_str().chars().next()?)?;
        let row: u8 = caps.get(2)?.as_str().parse().ok()?;
        let bay: u8 = caps.get(3)?.as_str().parse().ok()?;
        let tier: u8 = caps.get(4)?.as_str().parse().ok()?;
        // Coordinates are 1-based; a zero is malformed, not out-of-grid.
        if row < 1 || bay < 1 || tier < 1 {
            return None;
        }
        let sub_slot = caps.get(5).map(|m| match m.as_str() {
            "A" => SubSlot::A,
            _ => SubSlot::B,
        });
        Some(Self {
            zone,
            row,
            bay,
            tier,
            sub_slot,
        })
    }

    /// Whether this slot lies inside the fixed yard grid.
    pub fn in_grid(&self) -> bool {
        (1..=ROW_COUNT).contains(&self.row)
            && (1..=BAY_COUNT).contains(&self.bay)
            && (1..=TIER_COUNT).contains(&self.tier)
    }

    /// The slot directly below this one, if any (same zone/row/bay,
    /// tier-1, sub-slot dropped — support is a whole-footprint property).
    pub fn below(&self) -> Option<Slot> {
        if self.tier <= 1 {
            return None;
        }
        Some(Slot {
            zone: self.zone,
            row: self.row,
            bay: self.bay,
            tier: self.tier - 1,
            sub_slot: None,
        })
    }

    /// The same position with the sub-slot marker dropped.
    pub fn footprint(&self) -> Slot {
        Slot {
            sub_slot: None,
            ..*self
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-R{:02}-B{:02}-T{}",
            self.zone, self.row, self.bay, self.tier
        )?;
        if let Some(sub) = self.sub_slot {
            write!(f, "-{}", sub)?;
        }
        Ok(())
    }
}

/// Optional narrowing for available-slot enumeration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SlotFilter {
    pub zone: Option<Zone>,
    pub tier: Option<u8>,
}
