//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use embedded_hal::blocking::delay::DelayMs;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// Internal
use super::{motion, ArmError, Motion, Params, MAX_DIAGNOSTICS};
use crate::{
    axis::{Axis, AxisId, AxisStatus, NUM_AXES},
    buzzer::{Buzzer, ToneGenerator},
    cmd::ArmCmd,
    platform::Platform,
    serial::{SerialPort, SerialValue, TextSink},
    servo_ctrl::Actuator,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The hardware an arm is built from.
pub struct ArmHardware<A, T, S, D> {
    pub axis1: A,
    pub axis2: A,
    pub axis3: A,
    pub gripper: A,

    /// Tone generator the buzzer is connected to.
    pub tone: T,

    /// Serial transport.
    pub sink: S,

    /// Blocking delay used to pace motions and notes.
    pub delay: D,
}

/// Arm control module state
pub struct ArmBot<A, T, S, D> {
    pub(crate) params: Params,

    /// Axes, indexed by [`AxisId::index`].
    pub(crate) axes: [Axis<A>; NUM_AXES],

    pub(crate) buzzer: Buzzer<T>,

    pub(crate) serial: SerialPort<S>,

    pub(crate) delay: D,

    /// Whether the actuators are currently attached.
    pub(crate) attached: bool,

    pub(crate) diagnostics: VecDeque<ArmError>,
}

/// Status report of the arm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArmStatus {
    pub platform: Platform,
    pub attached: bool,
    pub axes: [AxisStatus; NUM_AXES],
    pub buzzer_pin: u8,
    pub baud_rate: Option<u32>,
}

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
    /// Build the arm. Nothing is written to the hardware until
    /// [`ArmBot::begin`].
    pub fn new(params: Params, hw: ArmHardware<A, T, S, D>) -> Self {
        let pins = params.platform.pins(params.custom_pins.as_ref());

        let axis = |id: AxisId, actuator: A| {
            Axis::new(
                id,
                pins.axis_pin(id),
                params.range(id),
                params.initial_position(id),
                actuator,
            )
        };

        let axes = [
            axis(AxisId::Axis1, hw.axis1),
            axis(AxisId::Axis2, hw.axis2),
            axis(AxisId::Axis3, hw.axis3),
            axis(AxisId::Gripper, hw.gripper),
        ];

        Self {
            axes,
            buzzer: Buzzer::new(pins.buzzer, hw.tone),
            serial: SerialPort::new(hw.sink),
            delay: hw.delay,
            attached: false,
            diagnostics: VecDeque::new(),
            params,
        }
    }

    /// Attach every actuator and move each axis to its last known position.
    ///
    /// A failed attach is reported on the serial line and recorded as a
    /// diagnostic, the remaining axes are still brought up.
    pub fn begin(&mut self) {
        let banner = format!("Initializing ARMBOT on {}...", self.params.platform.name());
        info!("{}", banner);
        self.serial.write(banner);

        let pulse_range = self.params.platform.pulse_range();

        for i in 0..NUM_AXES {
            let (id, pin) = (self.axes[i].id, self.axes[i].pin);

            if !self.axes[i].actuator.attach(pin, pulse_range) {
                warn!("{} servo failed to attach on pin {}", id, pin);
                self.serial.write(format!("{} Servo attach failed!", id.name()));
                self.record(ArmError::ActuatorAttachFailed(id));
            }
        }

        for axis in self.axes.iter_mut() {
            if let Some(p) = axis.position_deg {
                axis.write(p);
            }
        }

        self.attached = true;
    }

    /// Detach every actuator. Positions are kept for the next
    /// [`ArmBot::begin`].
    pub fn end(&mut self) {
        info!("Detaching ARMBOT servos");

        for axis in self.axes.iter_mut() {
            axis.actuator.detach();
        }

        self.attached = false;
    }

    // ---- AXIS MOTION ----

    /// Move an axis to `angle_deg`, pausing `step_delay_ms` between each one
    /// degree step.
    ///
    /// In strict mode an out of range angle is rejected and the axis isn't
    /// moved, otherwise it is clamped.
    pub fn move_axis(
        &mut self,
        axis: AxisId,
        angle_deg: i32,
        step_delay_ms: i32,
    ) -> Result<Motion, ArmError> {
        let range = self.axes[axis.index()].range;

        if self.params.strict && !range.contains(angle_deg) {
            return Err(ArmError::OutOfRange {
                axis,
                requested: angle_deg,
                range,
            });
        }

        Ok(self.drive(axis, angle_deg, step_delay_ms))
    }

    pub fn axis1_motion(&mut self, angle_deg: i32, speed: i32) -> Result<(), ArmError> {
        self.move_axis(AxisId::Axis1, angle_deg, speed).map(|_| ())
    }

    pub fn axis2_motion(&mut self, angle_deg: i32, speed: i32) -> Result<(), ArmError> {
        self.move_axis(AxisId::Axis2, angle_deg, speed).map(|_| ())
    }

    pub fn axis3_motion(&mut self, angle_deg: i32, speed: i32) -> Result<(), ArmError> {
        self.move_axis(AxisId::Axis3, angle_deg, speed).map(|_| ())
    }

    pub fn gripper_motion(&mut self, angle_deg: i32, speed: i32) -> Result<(), ArmError> {
        self.move_axis(AxisId::Gripper, angle_deg, speed).map(|_| ())
    }

    /// Move an axis, always clamping.
    pub(crate) fn drive(&mut self, axis: AxisId, angle_deg: i32, step_delay_ms: i32) -> Motion {
        debug!("{} to {} deg, step delay {} ms", axis, angle_deg, step_delay_ms);

        if !self.attached {
            debug!("{} is not attached, the motion won't reach the servo", axis);
        }

        let motion = motion::move_axis(
            &mut self.axes[axis.index()],
            angle_deg,
            step_delay_ms,
            &mut self.delay,
        );

        if motion.clamped() {
            let e = ArmError::AngleClamped {
                axis,
                requested: motion.requested_deg,
                applied: motion.applied_deg,
            };
            warn!("{}", e);
            self.record(e);
        }

        motion
    }

    // ---- BUZZER ----

    /// Play a tone, blocking for its duration.
    pub fn buzzer_play(&mut self, frequency_hz: u32, duration_ms: u32) {
        self.buzzer.play(frequency_hz, duration_ms, &mut self.delay);
    }

    pub fn buzzer_start(&mut self, frequency_hz: u32) {
        self.buzzer.start(frequency_hz);
    }

    pub fn buzzer_stop(&mut self) {
        self.buzzer.stop();
    }

    /// Play the built in melody, blocking until it ends.
    pub fn play_melody(&mut self) {
        self.buzzer.play_melody(&mut self.delay);
    }

    // ---- SERIAL ----

    pub fn serial_start(&mut self, baud_rate: u32) {
        self.serial.start(baud_rate);
    }

    /// Write a text, integer, float or boolean value as one line.
    pub fn serial_write<V>(&mut self, value: V)
    where
        V: Into<SerialValue>,
    {
        self.serial.write(value);
    }

    // ---- COMMANDS ----

    /// Execute a command, returning the arm status once it has completed.
    pub fn execute(&mut self, cmd: &ArmCmd) -> Result<ArmStatus, ArmError> {
        debug!("Executing ArmCmd::{:?}", cmd);

        match cmd {
            ArmCmd::Begin => self.begin(),
            ArmCmd::End => self.end(),
            ArmCmd::Axis {
                axis,
                angle_deg,
                step_delay_ms,
            } => {
                self.move_axis(*axis, *angle_deg, *step_delay_ms)?;
            }
            ArmCmd::Wave { count } => self.wave_hand(*count),
            ArmCmd::Tone {
                frequency_hz,
                duration_ms,
            } => self.buzzer_play(*frequency_hz, *duration_ms),
            ArmCmd::ToneStart { frequency_hz } => self.buzzer_start(*frequency_hz),
            ArmCmd::ToneStop => self.buzzer_stop(),
            ArmCmd::Melody => self.play_melody(),
            ArmCmd::Print { text } => self.serial_write(text.join(" ")),
            ArmCmd::Status => (),
        }

        Ok(self.status())
    }

    // ---- REPORTING ----

    pub fn status(&self) -> ArmStatus {
        ArmStatus {
            platform: self.params.platform,
            attached: self.attached,
            axes: [
                self.axes[0].status(),
                self.axes[1].status(),
                self.axes[2].status(),
                self.axes[3].status(),
            ],
            buzzer_pin: self.buzzer.pin(),
            baud_rate: self.serial.baud_rate(),
        }
    }

    pub fn axis(&self, axis: AxisId) -> &Axis<A> {
        &self.axes[axis.index()]
    }

    pub fn position(&self, axis: AxisId) -> Option<u8> {
        self.axes[axis.index()].position_deg
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Remove and return every diagnostic recorded so far, oldest first.
    pub fn take_diagnostics(&mut self) -> Vec<ArmError> {
        self.diagnostics.drain(..).collect()
    }

    fn record(&mut self, diagnostic: ArmError) {
        if self.diagnostics.len() == MAX_DIAGNOSTICS {
            self.diagnostics.pop_front();
        }
        self.diagnostics.push_back(diagnostic);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
