//! # Platform pin assignments
//!
//! Which hardware channels the servos and buzzer are wired to depends on the board the arm is
//! built on.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{axis::AxisId, servo_ctrl::PulseRange};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Pin of every actuator and of the buzzer.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct PinMap {
    pub axis1: u8,
    pub axis2: u8,
    pub axis3: u8,
    pub gripper: u8,
    pub buzzer: u8,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Board the arm is built on.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Esp32,
    Esp8266,

    /// Any other board, pins must be given in the parameters.
    Custom,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PinMap {
    pub const ESP32: PinMap = PinMap {
        axis1: 25,
        axis2: 26,
        axis3: 27,
        gripper: 32,
        buzzer: 33,
    };

    pub const ESP8266: PinMap = PinMap {
        axis1: 5,
        axis2: 4,
        axis3: 12,
        gripper: 13,
        buzzer: 14,
    };

    /// Pins of the first five channels of a servo driver board.
    pub const SERVO_BOARD: PinMap = PinMap {
        axis1: 0,
        axis2: 1,
        axis3: 2,
        gripper: 3,
        buzzer: 4,
    };

    pub fn axis_pin(&self, axis: AxisId) -> u8 {
        match axis {
            AxisId::Axis1 => self.axis1,
            AxisId::Axis2 => self.axis2,
            AxisId::Axis3 => self.axis3,
            AxisId::Gripper => self.gripper,
        }
    }
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Esp32 => "ESP32",
            Platform::Esp8266 => "ESP8266",
            Platform::Custom => "an unknown platform",
        }
    }

    /// Pins for this platform. `Custom` boards use `custom`, falling back to the servo driver
    /// board layout if none was given.
    pub fn pins(&self, custom: Option<&PinMap>) -> PinMap {
        match self {
            Platform::Esp32 => PinMap::ESP32,
            Platform::Esp8266 => PinMap::ESP8266,
            Platform::Custom => custom.copied().unwrap_or(PinMap::SERVO_BOARD),
        }
    }

    /// Pulse range servos are attached with, `None` to let the driver decide.
    pub fn pulse_range(&self) -> Option<PulseRange> {
        match self {
            Platform::Esp32 | Platform::Esp8266 => Some(PulseRange::WIDE),
            Platform::Custom => None,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Custom
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_platform_pins() {
        assert_eq!(Platform::Esp32.pins(None).axis_pin(AxisId::Gripper), 32);
        assert_eq!(Platform::Esp8266.pins(None).buzzer, 14);

        // Custom pins are ignored on known boards
        let custom = PinMap { axis1: 9, axis2: 10, axis3: 11, gripper: 12, buzzer: 13 };
        assert_eq!(Platform::Esp32.pins(Some(&custom)), PinMap::ESP32);
        assert_eq!(Platform::Custom.pins(Some(&custom)), custom);
        assert_eq!(Platform::Custom.pins(None), PinMap::SERVO_BOARD);
    }

    #[test]
    fn test_pulse_range() {
        assert_eq!(Platform::Esp32.pulse_range(), Some(PulseRange::WIDE));
        assert_eq!(Platform::Custom.pulse_range(), None);
    }
}
