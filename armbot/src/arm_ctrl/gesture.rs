//! Scripted gestures built from single axis motions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use embedded_hal::blocking::delay::DelayMs;
use log::info;

use super::ArmBot;
use crate::{
    axis::AxisId,
    buzzer::ToneGenerator,
    serial::TextSink,
    servo_ctrl::Actuator,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of waves when no count is given.
pub const DEFAULT_WAVE_COUNT: i32 = 3;

/// Axis 3 angle holding the hand upright while waving.
///
/// Units: degrees
pub const WAVE_UPRIGHT_DEG: i32 = 120;

/// How far the base swings either side of its starting angle.
///
/// Units: degrees
pub const WAVE_SWING_DEG: i32 = 40;

/// Step delay of every wave motion.
///
/// Units: milliseconds
pub const WAVE_STEP_DELAY_MS: i32 = 2;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<A, T, S, D> ArmBot<A, T, S, D>
where
    A: Actuator,
    T: ToneGenerator,
    S: TextSink,
    D: DelayMs<u32>,
{
    /// Wave the hand `count` times.
    ///
    /// Axis 3 is raised upright, the base swings right then left `count`
    /// times, and both axes are returned to where they started. Targets past
    /// the end of travel are clamped, even in strict mode.
    pub fn wave_hand(&mut self, count: i32) {
        info!("Waving {} time(s)", count.max(0));

        let start_1 = self.start_position(AxisId::Axis1);
        let start_3 = self.start_position(AxisId::Axis3);

        self.drive(AxisId::Axis3, WAVE_UPRIGHT_DEG, WAVE_STEP_DELAY_MS);

        for _ in 0..count {
            self.drive(AxisId::Axis1, start_1 + WAVE_SWING_DEG, WAVE_STEP_DELAY_MS);
            self.drive(AxisId::Axis1, start_1 - WAVE_SWING_DEG, WAVE_STEP_DELAY_MS);
        }

        self.drive(AxisId::Axis1, start_1, WAVE_STEP_DELAY_MS);
        self.drive(AxisId::Axis3, start_3, WAVE_STEP_DELAY_MS);
    }

    /// Current position of an axis, or the middle of its range if it has
    /// none yet.
    fn start_position(&self, axis: AxisId) -> i32 {
        let a = &self.axes[axis.index()];

        match a.position_deg {
            Some(p) => p as i32,
            None => (a.range.min_deg as i32 + a.range.max_deg as i32) / 2,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        arm_ctrl::{ArmError, Params},
        platform::{PinMap, Platform},
        sim::sim_armbot,
    };

    const A1: u8 = PinMap::ESP32.axis1;
    const A3: u8 = PinMap::ESP32.axis3;

    fn params() -> Params {
        Params {
            platform: Platform::Esp32,
            ..Params::default()
        }
    }

    /// Split the writes to a pin into the targets of each motion, given the
    /// starting position. A new motion starts whenever the direction flips.
    fn turning_points(start: u8, writes: &[u8]) -> Vec<u8> {
        let mut points = Vec::new();
        let mut prev = start;
        let mut dir = 0i32;

        for &w in writes {
            let d = if w > prev { 1 } else { -1 };
            if dir != 0 && d != dir {
                points.push(prev);
            }
            dir = d;
            prev = w;
        }
        if !writes.is_empty() {
            points.push(prev);
        }
        points
    }

    #[test]
    fn test_wave_sequence() {
        let (mut bot, log) = sim_armbot(params(), false);
        bot.begin();
        log.clear();

        bot.wave_hand(DEFAULT_WAVE_COUNT);

        // Axis 3 goes up to 120 then back to 50
        let a3 = log.writes_to(A3);
        assert_eq!(turning_points(50, &a3), vec![120, 50]);
        assert_eq!(a3.len(), 70 * 2);

        // Base: 3 x (130, 50), then back to 90
        let a1 = log.writes_to(A1);
        assert_eq!(turning_points(90, &a1), vec![130, 50, 130, 50, 130, 50, 90]);

        // Axis 3 is fully raised before the base moves, and lowered last
        let events = log.events();
        let first_a1 = events.iter().position(|e| matches!(e, crate::sim::SimEvent::Write { pin, .. } if *pin == A1)).unwrap();
        let last_a3_up = events.iter().position(|e| matches!(e, crate::sim::SimEvent::Write { pin, angle_deg: 120 } if *pin == A3)).unwrap();
        assert!(last_a3_up < first_a1);

        assert!(log.delays().iter().all(|&d| d == WAVE_STEP_DELAY_MS as u32));
        assert_eq!(bot.position(AxisId::Axis1), Some(90));
        assert_eq!(bot.position(AxisId::Axis3), Some(50));
    }

    #[test]
    fn test_wave_zero_count_still_brackets() {
        let (mut bot, log) = sim_armbot(params(), false);
        bot.begin();
        log.clear();

        bot.wave_hand(0);
        bot.wave_hand(-2);

        assert!(log.writes_to(A1).is_empty());
        assert_eq!(turning_points(50, &log.writes_to(A3)), vec![120, 50, 120, 50]);
    }

    #[test]
    fn test_wave_near_end_of_travel_is_clamped() {
        let mut p = params();
        p.initial_pos_deg[0] = 170;
        p.strict = true;
        let (mut bot, log) = sim_armbot(p, false);
        bot.begin();
        log.clear();

        bot.wave_hand(1);

        let a1 = log.writes_to(A1);
        assert_eq!(turning_points(170, &a1), vec![180, 130, 170]);
        assert!(a1.iter().all(|&w| w <= 180));
        assert!(bot
            .take_diagnostics()
            .contains(&ArmError::AngleClamped { axis: AxisId::Axis1, requested: 210, applied: 180 }));
    }
}
