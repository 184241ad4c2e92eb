//! # Simulated hardware
//!
//! Stand-ins for the servos, buzzer, serial transport and delay which record everything they
//! are asked to do into a shared [`EventLog`]. Used to run the arm on a host machine and to check
//! exactly what the controller does in tests.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use embedded_hal::blocking::delay::DelayMs;
use log::{info, trace, warn};
use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::{
    arm_ctrl::{ArmBot, ArmHardware, Params},
    buzzer::ToneGenerator,
    serial::TextSink,
    servo_ctrl::{Actuator, PulseRange},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Shared, ordered record of simulated hardware events.
#[derive(Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<SimEvent>>>,

    /// Events are dropped rather than stored when not recording.
    recording: bool,
}

/// A servo which only records what it is told.
pub struct SimActuator {
    log: EventLog,
    pin: Option<u8>,
    fail_attach: bool,
}

pub struct SimTone {
    log: EventLog,
}

/// Serial sink which records lines and echoes them to the log.
pub struct SimSink {
    log: EventLog,
}

/// Delay which records its duration, and optionally really sleeps.
pub struct SimDelay {
    log: EventLog,
    real_time: bool,
}

/// Arm built entirely from simulated hardware.
pub type SimArmBot = ArmBot<SimActuator, SimTone, SimSink, SimDelay>;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum SimEvent {
    Attach { pin: u8, pulse_range: Option<PulseRange> },
    Write { pin: u8, angle_deg: u8 },
    Detach { pin: u8 },
    Tone { pin: u8, frequency_hz: u32, duration_ms: Option<u32> },
    NoTone { pin: u8 },
    Delay { ms: u32 },
    SerialBegin { baud_rate: u32 },
    Line(String),
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build an arm on simulated hardware, returning it with the log its hardware records into.
pub fn sim_armbot(params: Params, real_time: bool) -> (SimArmBot, EventLog) {
    let log = EventLog::new();

    (sim_armbot_with_log(params, real_time, log.clone()), log)
}

/// Build an arm on simulated hardware which reports into the given log.
///
/// Long running hosts pass [`EventLog::discarding`] so the log doesn't grow without bound.
pub fn sim_armbot_with_log(params: Params, real_time: bool, log: EventLog) -> SimArmBot {
    let hw = ArmHardware {
        axis1: SimActuator::new(log.clone()),
        axis2: SimActuator::new(log.clone()),
        axis3: SimActuator::new(log.clone()),
        gripper: SimActuator::new(log.clone()),
        tone: SimTone::new(log.clone()),
        sink: SimSink::new(log.clone()),
        delay: if real_time {
            SimDelay::real_time(log.clone())
        } else {
            SimDelay::new(log.clone())
        },
    };

    ArmBot::new(params, hw)
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            recording: true,
        }
    }

    /// A log which keeps nothing. The simulated hardware still logs what it does.
    pub fn discarding() -> Self {
        Self {
            recording: false,
            ..Self::new()
        }
    }

    pub fn push(&self, event: SimEvent) {
        if !self.recording {
            return;
        }

        match self.events.lock() {
            Ok(mut e) => e.push(event),
            Err(_) => warn!("Simulation event log is poisoned, dropping {:?}", event),
        }
    }

    /// Copy of every event recorded so far.
    pub fn events(&self) -> Vec<SimEvent> {
        match self.events.lock() {
            Ok(e) => e.clone(),
            Err(_) => Vec::new(),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut e) = self.events.lock() {
            e.clear();
        }
    }

    /// Angles written to the servo on `pin`, in order.
    pub fn writes_to(&self, pin: u8) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SimEvent::Write { pin: p, angle_deg } if p == pin => Some(angle_deg),
                _ => None,
            })
            .collect()
    }

    /// Every delay, in order.
    pub fn delays(&self) -> Vec<u32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SimEvent::Delay { ms } => Some(ms),
                _ => None,
            })
            .collect()
    }

    pub fn total_delay_ms(&self) -> u64 {
        self.delays().iter().map(|&d| d as u64).sum()
    }

    /// Lines written to the serial sink, in order.
    pub fn lines(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SimEvent::Line(l) => Some(l),
                _ => None,
            })
            .collect()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl SimActuator {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            pin: None,
            fail_attach: false,
        }
    }

    /// A servo whose attach always fails.
    pub fn failing(log: EventLog) -> Self {
        Self {
            log,
            pin: None,
            fail_attach: true,
        }
    }
}

impl Actuator for SimActuator {
    fn attach(&mut self, pin: u8, pulse_range: Option<PulseRange>) -> bool {
        if self.fail_attach {
            return false;
        }

        self.log.push(SimEvent::Attach { pin, pulse_range });
        self.pin = Some(pin);
        true
    }

    fn write(&mut self, angle_deg: u8) {
        match self.pin {
            Some(pin) => {
                trace!("[sim] pin {} <- {} deg", pin, angle_deg);
                self.log.push(SimEvent::Write { pin, angle_deg });
            }
            None => trace!("[sim] write of {} deg to detached servo ignored", angle_deg),
        }
    }

    fn detach(&mut self) {
        if let Some(pin) = self.pin.take() {
            self.log.push(SimEvent::Detach { pin });
        }
    }
}

impl SimTone {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl ToneGenerator for SimTone {
    fn tone(&mut self, pin: u8, frequency_hz: u32, duration_ms: Option<u32>) {
        self.log.push(SimEvent::Tone {
            pin,
            frequency_hz,
            duration_ms,
        });
    }

    fn no_tone(&mut self, pin: u8) {
        self.log.push(SimEvent::NoTone { pin });
    }
}

impl SimSink {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl TextSink for SimSink {
    fn begin(&mut self, baud_rate: u32) {
        self.log.push(SimEvent::SerialBegin { baud_rate });
    }

    fn write_line(&mut self, text: &str) {
        info!("[serial] {}", text);
        self.log.push(SimEvent::Line(text.to_string()));
    }
}

impl SimDelay {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            real_time: false,
        }
    }

    /// A delay which also sleeps the calling thread.
    pub fn real_time(log: EventLog) -> Self {
        Self {
            log,
            real_time: true,
        }
    }
}

impl DelayMs<u32> for SimDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.log.push(SimEvent::Delay { ms });

        if self.real_time {
            std::thread::sleep(util::time::millis(ms as i64));
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::axis::AxisId;

    #[test]
    fn test_recording_log() {
        let (mut bot, log) = sim_armbot(Params::default(), false);
        bot.begin();
        bot.move_axis(AxisId::Gripper, 62, 5).unwrap();

        assert_eq!(log.writes_to(3), vec![60, 61, 62]);
        assert_eq!(log.delays(), vec![5, 5]);
    }

    #[test]
    fn test_discarding_log_keeps_nothing() {
        let log = EventLog::discarding();
        let mut bot = sim_armbot_with_log(Params::default(), false, log.clone());

        bot.begin();
        bot.move_axis(AxisId::Axis1, 120, 1).unwrap();
        bot.play_melody();
        bot.serial_write("hello");

        assert!(log.events().is_empty());
        assert_eq!(bot.position(AxisId::Axis1), Some(120));
    }
}
