//! # ARMBOT
//!
//! Control library for a small servo driven arm with three rotational axes, a gripper, a buzzer
//! and a serial line.
//!
//! The arm is driven through an [`ArmBot`], built from the hardware in an [`ArmHardware`]. Every
//! piece of hardware is reached through a trait ([`Actuator`], [`ToneGenerator`], [`TextSink`]
//! and `embedded_hal`'s `DelayMs`) so the same controller runs on a servo driver board, on a
//! microcontroller HAL or against the simulation in [`sim`].

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod arm_ctrl;
pub mod axis;
pub mod buzzer;
pub mod cmd;
pub mod platform;
pub mod serial;
pub mod servo_ctrl;
pub mod sim;
pub mod worker;

// ------------------------------------------------------------------------------------------------
// REEXPORTS
// ------------------------------------------------------------------------------------------------

pub use arm_ctrl::{ArmBot, ArmError, ArmHardware, ArmStatus, Params};
pub use axis::AxisId;
pub use buzzer::ToneGenerator;
pub use cmd::ArmCmd;
pub use serial::{SerialValue, TextSink};
pub use servo_ctrl::Actuator;
pub use worker::ArmWorker;
