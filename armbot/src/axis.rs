//! # Axis model
//!
//! The arm has three rotational axes and a gripper. Each one is an [`Axis`] record which owns the
//! actuator driving it, so writing a position to an axis can only ever reach that axis's
//! hardware.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use util::maths;

use crate::servo_ctrl::Actuator;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of independently positioned axes (three joints plus the gripper).
pub const NUM_AXES: usize = 4;

/// Lowest angle any servo may be commanded to.
///
/// Units: degrees
pub const MIN_ANGLE_DEG: u8 = 0;

/// Highest angle any servo may be commanded to.
///
/// Units: degrees
pub const MAX_ANGLE_DEG: u8 = 180;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Identifies one of the arm's axes.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum AxisId {
    Axis1,
    Axis2,
    Axis3,
    Gripper,
}

/// Error returned when an axis name can't be parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("Unknown axis \"{0}\", expected one of axis1, axis2, axis3 or gripper")]
pub struct ParseAxisError(pub String);

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Inclusive range of angles an axis is allowed to reach.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct AngleRange {
    pub min_deg: u8,
    pub max_deg: u8,
}

/// A single axis of the arm.
pub struct Axis<A> {
    pub(crate) id: AxisId,

    /// Hardware channel the actuator is attached to.
    pub(crate) pin: u8,

    pub(crate) range: AngleRange,

    /// Last angle written to the actuator, or `None` if no position has been recorded yet.
    pub(crate) position_deg: Option<u8>,

    pub(crate) actuator: A,
}

/// Snapshot of an axis, used for reporting.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct AxisStatus {
    pub id: AxisId,
    pub pin: u8,
    pub range: AngleRange,
    pub position_deg: Option<u8>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AxisId {
    /// All axes, in the order they are attached and indexed.
    pub const ALL: [AxisId; NUM_AXES] = [
        AxisId::Axis1,
        AxisId::Axis2,
        AxisId::Axis3,
        AxisId::Gripper,
    ];

    /// Position of this axis in [`AxisId::ALL`].
    pub fn index(self) -> usize {
        match self {
            AxisId::Axis1 => 0,
            AxisId::Axis2 => 1,
            AxisId::Axis3 => 2,
            AxisId::Gripper => 3,
        }
    }

    /// Human readable name, as printed on the serial line.
    pub fn name(self) -> &'static str {
        match self {
            AxisId::Axis1 => "Axis 1",
            AxisId::Axis2 => "Axis 2",
            AxisId::Axis3 => "Axis 3",
            AxisId::Gripper => "Gripper",
        }
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AxisId {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "a1" | "axis1" | "axis_1" | "base" => Ok(AxisId::Axis1),
            "2" | "a2" | "axis2" | "axis_2" => Ok(AxisId::Axis2),
            "3" | "a3" | "axis3" | "axis_3" => Ok(AxisId::Axis3),
            "4" | "g" | "gripper" => Ok(AxisId::Gripper),
            _ => Err(ParseAxisError(s.to_string())),
        }
    }
}

impl AngleRange {
    /// The full servo travel, 0 to 180 degrees.
    pub const FULL: AngleRange = AngleRange {
        min_deg: MIN_ANGLE_DEG,
        max_deg: MAX_ANGLE_DEG,
    };

    /// Build a range, limiting both ends to the servo travel.
    ///
    /// Returns `None` if `min_deg > max_deg` once limited.
    pub fn new(min_deg: u8, max_deg: u8) -> Option<Self> {
        let min_deg = min_deg.min(MAX_ANGLE_DEG);
        let max_deg = max_deg.min(MAX_ANGLE_DEG);

        if min_deg > max_deg {
            return None;
        }

        Some(Self { min_deg, max_deg })
    }

    /// Force a requested angle into this range.
    pub fn clamp(&self, angle_deg: i32) -> u8 {
        maths::clamp(angle_deg, self.min_deg as i32, self.max_deg as i32) as u8
    }

    /// Check whether a requested angle lies in this range.
    pub fn contains(&self, angle_deg: i32) -> bool {
        maths::in_range(angle_deg, self.min_deg as i32, self.max_deg as i32)
    }
}

impl Default for AngleRange {
    fn default() -> Self {
        Self::FULL
    }
}

impl<A> Axis<A>
where
    A: Actuator,
{
    pub(crate) fn new(
        id: AxisId,
        pin: u8,
        range: AngleRange,
        position_deg: Option<u8>,
        actuator: A,
    ) -> Self {
        Self {
            id,
            pin,
            range,
            // Never keep a starting position outside the allowed range
            position_deg: position_deg.map(|p| range.clamp(p as i32)),
            actuator,
        }
    }

    pub fn id(&self) -> AxisId {
        self.id
    }

    pub fn position_deg(&self) -> Option<u8> {
        self.position_deg
    }

    pub fn range(&self) -> AngleRange {
        self.range
    }

    /// Write an angle to the actuator and record it as the axis position.
    pub(crate) fn write(&mut self, angle_deg: u8) {
        self.actuator.write(angle_deg);
        self.position_deg = Some(angle_deg);
    }

    pub fn status(&self) -> AxisStatus {
        AxisStatus {
            id: self.id,
            pin: self.pin,
            range: self.range,
            position_deg: self.position_deg,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_axis_from_str() {
        assert_eq!("axis1".parse::<AxisId>(), Ok(AxisId::Axis1));
        assert_eq!("A2".parse::<AxisId>(), Ok(AxisId::Axis2));
        assert_eq!("3".parse::<AxisId>(), Ok(AxisId::Axis3));
        assert_eq!("Gripper".parse::<AxisId>(), Ok(AxisId::Gripper));
        assert!("elbow".parse::<AxisId>().is_err());
    }

    #[test]
    fn test_index_matches_all() {
        for (i, id) in AxisId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_range_clamp() {
        let full = AngleRange::FULL;
        assert_eq!(full.clamp(-1000), 0);
        assert_eq!(full.clamp(1000), 180);
        assert_eq!(full.clamp(i32::MAX), 180);
        assert_eq!(full.clamp(i32::MIN), 0);
        assert_eq!(full.clamp(77), 77);

        let gripper = AngleRange::new(20, 110).unwrap();
        assert_eq!(gripper.clamp(0), 20);
        assert_eq!(gripper.clamp(150), 110);
        assert!(gripper.contains(20));
        assert!(!gripper.contains(111));
    }

    #[test]
    fn test_range_new() {
        assert_eq!(AngleRange::new(0, 250), Some(AngleRange::FULL));
        assert_eq!(AngleRange::new(120, 60), None);
    }
}
