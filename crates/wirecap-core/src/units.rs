//! Length units accepted in structure files.

use std::fmt;
use std::str::FromStr;

use crate::error::StructureError;

/// Inches per meter, as used for all imperial conversions.
pub const INCHES_PER_METER: f64 = 39.37;

/// A recognized length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Millimeter,
    Micrometer,
    Centimeter,
    Meter,
    Kilometer,
    /// Thousandth of an inch.
    Mil,
    Inch,
    Foot,
}

impl LengthUnit {
    /// Every recognized unit, in structure-file tag order.
    pub const ALL: [LengthUnit; 8] = [
        LengthUnit::Millimeter,
        LengthUnit::Micrometer,
        LengthUnit::Centimeter,
        LengthUnit::Meter,
        LengthUnit::Kilometer,
        LengthUnit::Mil,
        LengthUnit::Inch,
        LengthUnit::Foot,
    ];

    /// Scale factor converting a value in this unit to meters.
    pub fn meters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 1e-3,
            LengthUnit::Micrometer => 1e-6,
            LengthUnit::Centimeter => 1e-2,
            LengthUnit::Meter => 1.0,
            LengthUnit::Kilometer => 1e3,
            LengthUnit::Mil => 1e-3 / INCHES_PER_METER,
            LengthUnit::Inch => 1.0 / INCHES_PER_METER,
            LengthUnit::Foot => 12.0 / INCHES_PER_METER,
        }
    }

    /// The tag used for this unit in structure files.
    pub fn tag(self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Micrometer => "um",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
            LengthUnit::Kilometer => "km",
            LengthUnit::Mil => "mil",
            LengthUnit::Inch => "in",
            LengthUnit::Foot => "ft",
        }
    }

    /// Convert a length in this unit to meters.
    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }
}

impl FromStr for LengthUnit {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LengthUnit::ALL
            .into_iter()
            .find(|unit| unit.tag() == s)
            .ok_or_else(|| StructureError::UnknownUnit {
                unit: s.to_string(),
            })
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
