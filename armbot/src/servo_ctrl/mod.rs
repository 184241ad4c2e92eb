//! # Servo Controller Module
//!
//! This module provides the actuator interface the arm controller writes angles to, plus a
//! generic [`Actuator`] built on top of any [`ServoDriver`] board. Boards are shared between the
//! servos plugged into them, so each [`DriverServo`] holds a handle to its board and the channel
//! it was attached to.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// [`ServoDriver`] implementation for the Adafruit PCA9685 16 channel servo driver board.
pub mod pca9685;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use util::maths;

use crate::axis::{MAX_ANGLE_DEG, MIN_ANGLE_DEG};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Refresh rate of a hobby servo signal.
///
/// Units: hertz
pub const SERVO_PWM_FREQ_HZ: u32 = 50;

/// Period of a hobby servo signal.
///
/// Units: microseconds
pub const SERVO_PERIOD_US: u32 = 1_000_000 / SERVO_PWM_FREQ_HZ;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A positional servo bound to a single hardware channel.
pub trait Actuator {
    /// Bind the actuator to a hardware channel.
    ///
    /// `pulse_range` overrides the pulse widths used for 0 and 180 degrees, `None` uses the
    /// driver's default. Returns `false` if the channel couldn't be bound.
    fn attach(&mut self, pin: u8, pulse_range: Option<PulseRange>) -> bool;

    /// Command the servo to an angle in degrees.
    fn write(&mut self, angle_deg: u8);

    /// Release the channel. The servo stops holding its position.
    fn detach(&mut self);
}

/// Trait to provide a unified API for accessing servo driver boards.
pub trait ServoDriver {

    /// The type that the underlying driver uses for channel identification
    type Channel: Copy;

    /// Map a pin number onto one of the board's channels, or `None` if the board has no such
    /// channel.
    fn channel_from_pin(pin: u8) -> Option<Self::Channel>;

    /// Set the duty cycle of a channel.
    ///
    /// ## Arguments
    /// - `channel` - The channel to set the duty cycle for
    /// - `duty_cycle` - The duty cycle to set. Must be a value between 0.0 and 1.0. Values outside
    ///   this range will be rejected.
    fn set_duty_cycle(&mut self, channel: Self::Channel, duty_cycle: f64) -> Result<(), ServoError>;

    /// Turn a channel fully off.
    fn disable_channel(&mut self, channel: Self::Channel) -> Result<(), ServoError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Pulse widths corresponding to the two ends of the servo travel.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct PulseRange {
    /// Pulse width at 0 degrees.
    ///
    /// Units: microseconds
    pub min_us: u16,

    /// Pulse width at 180 degrees.
    ///
    /// Units: microseconds
    pub max_us: u16,
}

/// A servo plugged into one channel of a shared driver board.
pub struct DriverServo<D>
where
    D: ServoDriver
{
    board: Arc<Mutex<D>>,

    channel: Option<D::Channel>,

    pulse_range: PulseRange,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum ServoError {
    #[error("An I2C error occured")]
    I2c,

    #[error("Duty cycle must be between 0.0 and 1.0")]
    InvalidDutyCycle,

    #[error("The driver board lock is poisoned")]
    BoardPoisoned,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PulseRange {
    /// Pulse range used when the caller doesn't give one, matching the usual hobby servo
    /// library defaults.
    pub const DEFAULT: PulseRange = PulseRange {
        min_us: 544,
        max_us: 2400,
    };

    /// Pulse range used for the SG90/MG90 style servos on the ESP boards.
    pub const WIDE: PulseRange = PulseRange {
        min_us: 500,
        max_us: 2500,
    };

    /// Pulse width for an angle, linearly mapped over the range.
    pub fn pulse_us(&self, angle_deg: u8) -> f64 {
        let angle_deg = angle_deg.min(MAX_ANGLE_DEG);

        maths::lin_map(
            (MIN_ANGLE_DEG as f64, MAX_ANGLE_DEG as f64),
            (self.min_us as f64, self.max_us as f64),
            angle_deg as f64,
        )
    }

    /// Duty cycle of a [`SERVO_PWM_FREQ_HZ`] signal for an angle.
    pub fn duty_cycle(&self, angle_deg: u8) -> f64 {
        self.pulse_us(angle_deg) / SERVO_PERIOD_US as f64
    }
}

impl Default for PulseRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<D> DriverServo<D>
where
    D: ServoDriver
{
    /// Create a new, unattached servo on the given board.
    pub fn new(board: Arc<Mutex<D>>) -> Self {
        Self {
            board,
            channel: None,
            pulse_range: PulseRange::DEFAULT,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.channel.is_some()
    }
}

impl<D> Actuator for DriverServo<D>
where
    D: ServoDriver
{
    fn attach(&mut self, pin: u8, pulse_range: Option<PulseRange>) -> bool {
        match D::channel_from_pin(pin) {
            Some(c) => {
                self.channel = Some(c);
                self.pulse_range = pulse_range.unwrap_or_default();
                true
            }
            None => {
                warn!("Pin {} is not a channel of the servo driver board", pin);
                false
            }
        }
    }

    fn write(&mut self, angle_deg: u8) {
        let channel = match self.channel {
            Some(c) => c,
            None => {
                trace!("Ignoring write of {} deg to a detached servo", angle_deg);
                return
            }
        };

        let result = match self.board.lock() {
            Ok(mut b) => b.set_duty_cycle(channel, self.pulse_range.duty_cycle(angle_deg)),
            Err(_) => Err(ServoError::BoardPoisoned),
        };

        if let Err(e) = result {
            warn!("Couldn't write {} deg to servo: {}", angle_deg, e);
        }
    }

    fn detach(&mut self) {
        if let Some(channel) = self.channel.take() {
            let result = match self.board.lock() {
                Ok(mut b) => b.disable_channel(channel),
                Err(_) => Err(ServoError::BoardPoisoned),
            };

            if let Err(e) = result {
                warn!("Couldn't disable servo channel: {}", e);
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Board with four channels that remembers the last duty cycle per channel.
    #[derive(Default)]
    struct FakeBoard {
        duty: [Option<f64>; 4],
    }

    impl ServoDriver for FakeBoard {
        type Channel = usize;

        fn channel_from_pin(pin: u8) -> Option<usize> {
            if pin < 4 { Some(pin as usize) } else { None }
        }

        fn set_duty_cycle(&mut self, channel: usize, duty_cycle: f64) -> Result<(), ServoError> {
            if duty_cycle < 0.0 || duty_cycle > 1.0 {
                return Err(ServoError::InvalidDutyCycle)
            }
            self.duty[channel] = Some(duty_cycle);
            Ok(())
        }

        fn disable_channel(&mut self, channel: usize) -> Result<(), ServoError> {
            self.duty[channel] = None;
            Ok(())
        }
    }

    #[test]
    fn test_pulse_range() {
        assert_eq!(PulseRange::WIDE.pulse_us(0), 500.0);
        assert_eq!(PulseRange::WIDE.pulse_us(90), 1500.0);
        assert_eq!(PulseRange::WIDE.pulse_us(180), 2500.0);
        assert_eq!(PulseRange::WIDE.pulse_us(255), 2500.0);
        assert_eq!(PulseRange::WIDE.duty_cycle(90), 0.075);
    }

    #[test]
    fn test_driver_servo() {
        let board = Arc::new(Mutex::new(FakeBoard::default()));
        let mut servo = DriverServo::new(board.clone());

        // Writes before attaching go nowhere
        servo.write(90);
        assert_eq!(board.lock().unwrap().duty[2], None);

        assert!(!servo.attach(9, None));
        assert!(servo.attach(2, Some(PulseRange::WIDE)));
        servo.write(90);
        assert_eq!(board.lock().unwrap().duty[2], Some(0.075));

        servo.detach();
        assert!(!servo.is_attached());
        assert_eq!(board.lock().unwrap().duty[2], None);
    }
}
