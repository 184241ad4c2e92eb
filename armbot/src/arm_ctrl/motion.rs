//! Stepped motion of a single axis

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use embedded_hal::blocking::delay::DelayMs;
use log::trace;

// Internal
use crate::{axis::{Axis, AxisId}, servo_ctrl::Actuator};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Summary of a completed motion.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Motion {
    pub axis: AxisId,

    /// Target as asked for by the caller.
    ///
    /// Units: degrees
    pub requested_deg: i32,

    /// Target actually reached, after clamping.
    ///
    /// Units: degrees
    pub applied_deg: u8,

    /// Number of one degree steps taken. Zero for a direct move.
    pub steps: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Motion {
    /// Whether the requested target had to be clamped.
    pub fn clamped(&self) -> bool {
        self.requested_deg != self.applied_deg as i32
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Move an axis to `target_deg`.
///
/// The target is clamped to the axis range. With `step_delay_ms <= 0`, or if
/// the axis has no known position, the target is written once and the call
/// returns immediately. Otherwise the axis walks one degree at a time towards
/// the target, waiting `step_delay_ms` after every step.
pub(crate) fn move_axis<A, D>(
    axis: &mut Axis<A>,
    target_deg: i32,
    step_delay_ms: i32,
    delay: &mut D,
) -> Motion
where
    A: Actuator,
    D: DelayMs<u32>,
{
    let applied_deg = axis.range.clamp(target_deg);

    let mut motion = Motion {
        axis: axis.id,
        requested_deg: target_deg,
        applied_deg,
        steps: 0,
    };

    let current = match axis.position_deg {
        Some(p) if step_delay_ms > 0 => p as i32,
        _ => {
            // Direct move: no known start, or no step delay asked for
            axis.write(applied_deg);
            return motion;
        }
    };

    let target = applied_deg as i32;
    let step: i32 = if target > current { 1 } else { -1 };
    let mut pos = current;

    while pos != target {
        pos += step;

        trace!("{} step to {} deg", axis.id, pos);
        axis.write(pos as u8);
        motion.steps += 1;

        delay.delay_ms(step_delay_ms as u32);

        if (step > 0 && pos >= target) || (step < 0 && pos <= target) {
            break;
        }
    }

    axis.position_deg = Some(applied_deg);

    motion
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        axis::AngleRange,
        sim::{EventLog, SimActuator, SimDelay, SimEvent},
    };

    const PIN: u8 = 7;

    /// An attached axis starting at `start`, with the log cleared.
    fn axis_at(start: Option<u8>, log: &EventLog) -> Axis<SimActuator> {
        let mut axis = Axis::new(
            AxisId::Axis1,
            PIN,
            AngleRange::FULL,
            start,
            SimActuator::new(log.clone()),
        );
        axis.actuator.attach(PIN, None);
        log.clear();
        axis
    }

    #[test]
    fn test_instant_move() {
        let log = EventLog::new();
        let mut delay = SimDelay::new(log.clone());

        for speed in [0, -5].iter() {
            let mut axis = axis_at(Some(90), &log);
            let m = move_axis(&mut axis, 10, *speed, &mut delay);

            assert_eq!(log.events(), vec![SimEvent::Write { pin: PIN, angle_deg: 10 }]);
            assert_eq!(axis.position_deg(), Some(10));
            assert_eq!(m.steps, 0);
        }
    }

    #[test]
    fn test_stepped_move_up() {
        let log = EventLog::new();
        let mut delay = SimDelay::new(log.clone());
        let mut axis = axis_at(Some(90), &log);

        let m = move_axis(&mut axis, 95, 15, &mut delay);

        assert_eq!(log.writes_to(PIN), vec![91, 92, 93, 94, 95]);
        assert_eq!(log.delays(), vec![15; 5]);
        assert_eq!(m.steps, 5);
        assert_eq!(axis.position_deg(), Some(95));

        // Each write is followed by its delay
        let events = log.events();
        for pair in events.chunks(2) {
            assert!(matches!(pair[0], SimEvent::Write { .. }));
            assert_eq!(pair[1], SimEvent::Delay { ms: 15 });
        }
    }

    #[test]
    fn test_stepped_move_down_clamped() {
        let log = EventLog::new();
        let mut delay = SimDelay::new(log.clone());
        let mut axis = axis_at(Some(3), &log);

        let m = move_axis(&mut axis, -40, 2, &mut delay);

        assert_eq!(log.writes_to(PIN), vec![2, 1, 0]);
        assert_eq!(log.delays(), vec![2, 2, 2]);
        assert_eq!(m.applied_deg, 0);
        assert!(m.clamped());
        assert_eq!(axis.position_deg(), Some(0));
    }

    #[test]
    fn test_move_to_current_position() {
        let log = EventLog::new();
        let mut delay = SimDelay::new(log.clone());
        let mut axis = axis_at(Some(42), &log);

        let m = move_axis(&mut axis, 42, 10, &mut delay);

        assert!(log.events().is_empty());
        assert_eq!(m.steps, 0);
        assert_eq!(axis.position_deg(), Some(42));
    }

    #[test]
    fn test_unknown_position_snaps() {
        let log = EventLog::new();
        let mut delay = SimDelay::new(log.clone());
        let mut axis = axis_at(None, &log);

        let m = move_axis(&mut axis, 300, 20, &mut delay);

        assert_eq!(log.events(), vec![SimEvent::Write { pin: PIN, angle_deg: 180 }]);
        assert_eq!(m.steps, 0);
        assert_eq!(axis.position_deg(), Some(180));
    }

    #[test]
    fn test_applied_angle_always_in_range() {
        let log = EventLog::new();
        let mut delay = SimDelay::new(log.clone());
        let mut axis = axis_at(Some(90), &log);

        for target in [i32::MIN, -181, -1, 0, 1, 179, 180, 181, 720, i32::MAX].iter() {
            let m = move_axis(&mut axis, *target, 0, &mut delay);
            assert!(m.applied_deg <= 180);
            assert_eq!(axis.position_deg(), Some(m.applied_deg));
        }
    }

    #[test]
    fn test_step_count_matches_distance() {
        let log = EventLog::new();
        let mut delay = SimDelay::new(log.clone());

        for (start, target) in [(0u8, 180i32), (180, 0), (60, 61), (120, 37)].iter() {
            let mut axis = axis_at(Some(*start), &log);
            let m = move_axis(&mut axis, *target, 1, &mut delay);

            let writes = log.writes_to(PIN);
            let distance = (*target - *start as i32).abs() as usize;
            assert_eq!(writes.len(), distance);
            assert_eq!(log.delays().len(), distance);
            assert_eq!(m.steps as usize, distance);
            assert_eq!(*writes.last().unwrap() as i32, *target);

            // Monotonic, one degree per step
            let mut prev = *start as i32;
            for w in writes {
                assert_eq!((w as i32 - prev).abs(), 1);
                prev = w as i32;
            }
        }
    }

    #[test]
    fn test_axis_range_limits_target() {
        let log = EventLog::new();
        let mut delay = SimDelay::new(log.clone());
        let mut axis = Axis::new(
            AxisId::Gripper,
            PIN,
            AngleRange::new(20, 110).unwrap(),
            Some(100),
            SimActuator::new(log.clone()),
        );
        axis.actuator.attach(PIN, None);
        log.clear();

        let m = move_axis(&mut axis, 170, 1, &mut delay);

        assert_eq!(log.writes_to(PIN), (101..=110).collect::<Vec<u8>>());
        assert_eq!(m.applied_deg, 110);
    }
}
