//! # Arm control module
//!
//! Owns the four axes of the arm and moves them one at a time, one degree per step. All calls
//! block until the motion, tone or melody they start has finished.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod gesture;
mod motion;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use gesture::*;
pub use motion::Motion;
pub use params::*;
pub use state::*;

use crate::axis::{AngleRange, AxisId};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum number of diagnostics kept before the oldest are discarded.
pub const MAX_DIAGNOSTICS: usize = 64;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Conditions reported by ArmCtrl.
///
/// `ActuatorAttachFailed` and `AngleClamped` are only ever recorded as
/// diagnostics, the arm keeps running. `OutOfRange` is returned in strict mode.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArmError {
    #[error("{0} servo attach failed")]
    ActuatorAttachFailed(AxisId),

    #[error("{axis} target of {requested} deg clamped to {applied} deg")]
    AngleClamped {
        axis: AxisId,
        requested: i32,
        applied: u8,
    },

    #[error("{axis} target of {requested} deg is outside the allowed range {}-{} deg", .range.min_deg, .range.max_deg)]
    OutOfRange {
        axis: AxisId,
        requested: i32,
        range: AngleRange,
    },

    #[error("The arm worker is not running")]
    WorkerDisconnected,
}
