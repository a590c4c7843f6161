//! Survey unit handling
//!
//! Maps the survey header's `$INSUNITS` numeric code to a meters
//! multiplier. Unknown codes fall back to `Unitless` (multiplier 1.0) so a
//! sloppy export still produces a usable, if unscaled, coordinate system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Drawing unit declared in the survey header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyUnit {
    /// No unit declared (code 0)
    Unitless,
    /// Inches (code 1)
    Inches,
    /// Feet (code 2)
    Feet,
    /// Millimeters (code 4)
    Millimeters,
    /// Centimeters (code 5)
    Centimeters,
    /// Meters (code 6)
    Meters,
    /// Kilometers (code 7)
    Kilometers,
    /// Yards (code 10)
    Yards,
    /// Decimeters (code 13)
    Decimeters,
    /// Decameters (code 14)
    Decameters,
    /// Hectometers (code 15)
    Hectometers,
}

impl Default for SurveyUnit {
    fn default() -> Self {
        Self::Unitless
    }
}

impl SurveyUnit {
    /// Resolve a header `$INSUNITS` code; unknown codes map to `Unitless`
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Inches,
            2 => Self::Feet,
            4 => Self::Millimeters,
            5 => Self::Centimeters,
            6 => Self::Meters,
            7 => Self::Kilometers,
            10 => Self::Yards,
            13 => Self::Decimeters,
            14 => Self::Decameters,
            15 => Self::Hectometers,
            _ => Self::Unitless,
        }
    }

    /// Multiplier converting one drawing unit into meters
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            Self::Unitless => 1.0,
            Self::Inches => 0.0254,
            Self::Feet => 0.3048,
            Self::Millimeters => 0.001,
            Self::Centimeters => 0.01,
            Self::Meters => 1.0,
            Self::Kilometers => 1000.0,
            Self::Yards => 0.9144,
            Self::Decimeters => 0.1,
            Self::Decameters => 10.0,
            Self::Hectometers => 100.0,
        }
    }
}

impl fmt::Display for SurveyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unitless => "unitless",
            Self::Inches => "in",
            Self::Feet => "ft",
            Self::Millimeters => "mm",
            Self::Centimeters => "cm",
            Self::Meters => "m",
            Self::Kilometers => "km",
            Self::Yards => "yd",
            Self::Decimeters => "dm",
            Self::Decameters => "dam",
            Self::Hectometers => "hm",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for SurveyUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unitless" | "none" => Ok(Self::Unitless),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            "ft" | "feet" => Ok(Self::Feet),
            "mm" | "millimeters" => Ok(Self::Millimeters),
            "cm" | "centimeters" => Ok(Self::Centimeters),
            "m" | "meters" => Ok(Self::Meters),
            "km" | "kilometers" => Ok(Self::Kilometers),
            "yd" | "yards" => Ok(Self::Yards),
            "dm" | "decimeters" => Ok(Self::Decimeters),
            "dam" | "decameters" => Ok(Self::Decameters),
            "hm" | "hectometers" => Ok(Self::Hectometers),
            _ => Err(format!("Unknown survey unit: {}", s)),
        }
    }
}
