//! # Arm commands
//!
//! Every operation of the arm as a single enum, so it can be typed on a command line, sent to the
//! worker thread or stored.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use structopt::{clap::AppSettings, StructOpt};

use crate::{arm_ctrl::DEFAULT_WAVE_COUNT, axis::AxisId};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be completed by the arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
pub enum ArmCmd {
    /// Attach the servos and move them to their last known positions.
    #[structopt(name = "begin")]
    Begin,

    /// Detach the servos.
    #[structopt(name = "end")]
    End,

    /// Move one axis.
    #[structopt(name = "axis", setting = AppSettings::AllowNegativeNumbers)]
    Axis {
        /// Axis to move: axis1, axis2, axis3 or gripper.
        axis: AxisId,

        /// Target angle in degrees, clamped to the axis range.
        #[structopt(allow_hyphen_values = true)]
        angle_deg: i32,

        /// Delay between each one degree step in milliseconds. Zero or less
        /// moves in a single write.
        #[structopt(default_value = "10", allow_hyphen_values = true)]
        step_delay_ms: i32,
    },

    /// Wave the hand.
    #[structopt(name = "wave", setting = AppSettings::AllowNegativeNumbers)]
    Wave {
        #[structopt(default_value = "3", allow_hyphen_values = true)]
        count: i32,
    },

    /// Play a tone, waiting for it to finish.
    #[structopt(name = "tone")]
    Tone {
        frequency_hz: u32,
        duration_ms: u32,
    },

    /// Start a tone without waiting.
    #[structopt(name = "tone-start")]
    ToneStart { frequency_hz: u32 },

    /// Stop the current tone.
    #[structopt(name = "tone-stop")]
    ToneStop,

    /// Play the built in melody.
    #[structopt(name = "melody")]
    Melody,

    /// Write a line of text to the serial port.
    #[structopt(name = "print")]
    Print { text: Vec<String> },

    /// Report the arm status.
    #[structopt(name = "status")]
    Status,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ArmCmd {
    /// Parse a command typed as a single line, e.g. `axis gripper 30 5`.
    pub fn parse_line(line: &str) -> Result<Self, structopt::clap::Error> {
        Self::from_iter_safe(std::iter::once("armbot").chain(line.split_whitespace()))
    }

    /// Wave command with the default number of waves.
    pub fn wave() -> Self {
        ArmCmd::Wave {
            count: DEFAULT_WAVE_COUNT,
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
    fn test_parse_line() {
        assert_eq!(
            ArmCmd::parse_line("axis gripper 30 5").unwrap(),
            ArmCmd::Axis { axis: AxisId::Gripper, angle_deg: 30, step_delay_ms: 5 }
        );
        assert_eq!(
            ArmCmd::parse_line("axis 1 -20").unwrap(),
            ArmCmd::Axis { axis: AxisId::Axis1, angle_deg: -20, step_delay_ms: 10 }
        );
        assert_eq!(
            ArmCmd::parse_line("axis 2 30 -5").unwrap(),
            ArmCmd::Axis { axis: AxisId::Axis2, angle_deg: 30, step_delay_ms: -5 }
        );
        assert_eq!(
            ArmCmd::parse_line("axis a3 -400 0").unwrap(),
            ArmCmd::Axis { axis: AxisId::Axis3, angle_deg: -400, step_delay_ms: 0 }
        );
        assert_eq!(ArmCmd::parse_line("wave").unwrap(), ArmCmd::wave());
        assert_eq!(ArmCmd::parse_line("wave -1").unwrap(), ArmCmd::Wave { count: -1 });
        assert_eq!(ArmCmd::parse_line("wave 0").unwrap(), ArmCmd::Wave { count: 0 });
        assert_eq!(ArmCmd::parse_line("wave 5").unwrap(), ArmCmd::Wave { count: 5 });
        assert_eq!(
            ArmCmd::parse_line("tone 440 200").unwrap(),
            ArmCmd::Tone { frequency_hz: 440, duration_ms: 200 }
        );
        assert_eq!(ArmCmd::parse_line("tone-stop").unwrap(), ArmCmd::ToneStop);
        assert_eq!(
            ArmCmd::parse_line("print hello arm").unwrap(),
            ArmCmd::Print { text: vec!["hello".into(), "arm".into()] }
        );
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(ArmCmd::parse_line("axis elbow 30").is_err());
        assert!(ArmCmd::parse_line("fly").is_err());
        assert!(ArmCmd::parse_line("tone 440").is_err());
    }
}
