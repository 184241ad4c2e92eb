//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    axis::{AngleRange, AxisId, NUM_AXES, MAX_ANGLE_DEG},
    platform::{PinMap, Platform},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Arm control.
///
/// Per-axis arrays are ordered axis 1, axis 2, axis 3, gripper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    // ---- HARDWARE ----
    /// Board the arm is built on.
    pub platform: Platform,

    /// Pin assignments, only used on a `Custom` platform.
    pub custom_pins: Option<PinMap>,

    // ---- CAPABILITIES ----
    /// Position each axis is assumed to be in at start up. A negative value
    /// means no position is known, the first motion of that axis will then
    /// jump straight to its target.
    ///
    /// Units: degrees
    pub initial_pos_deg: [i16; NUM_AXES],

    /// Lowest angle each axis may be moved to.
    ///
    /// Units: degrees
    pub min_pos_deg: [u8; NUM_AXES],

    /// Highest angle each axis may be moved to.
    ///
    /// Units: degrees
    pub max_pos_deg: [u8; NUM_AXES],

    // ---- POLICY ----
    /// Reject out of range targets instead of clamping them.
    pub strict: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Starting position of an axis, `None` if unknown.
    pub fn initial_position(&self, axis: AxisId) -> Option<u8> {
        let pos = self.initial_pos_deg[axis.index()];

        if pos < 0 {
            None
        } else {
            Some(pos.min(MAX_ANGLE_DEG as i16) as u8)
        }
    }

    /// Allowed range of an axis.
    ///
    /// An inverted range is reported and replaced by the full servo travel.
    pub fn range(&self, axis: AxisId) -> AngleRange {
        let i = axis.index();

        match AngleRange::new(self.min_pos_deg[i], self.max_pos_deg[i]) {
            Some(r) => r,
            None => {
                warn!(
                    "{} range {}-{} deg is inverted, using the full range",
                    axis, self.min_pos_deg[i], self.max_pos_deg[i]
                );
                AngleRange::FULL
            }
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            custom_pins: None,
            initial_pos_deg: [90, 90, 50, 60],
            min_pos_deg: [0; NUM_AXES],
            max_pos_deg: [MAX_ANGLE_DEG; NUM_AXES],
            strict: false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Params::default();
        assert_eq!(p.initial_position(AxisId::Axis1), Some(90));
        assert_eq!(p.initial_position(AxisId::Axis2), Some(90));
        assert_eq!(p.initial_position(AxisId::Axis3), Some(50));
        assert_eq!(p.initial_position(AxisId::Gripper), Some(60));
        assert_eq!(p.range(AxisId::Gripper), AngleRange::FULL);
    }

    #[test]
    fn test_from_toml() {
        let p: Params = util::params::from_str(
            "platform = \"esp32\"\n\
             initial_pos_deg = [90, -1, 50, 60]\n\
             min_pos_deg = [0, 0, 0, 30]\n\
             max_pos_deg = [180, 180, 180, 100]\n\
             strict = true\n",
        )
        .unwrap();

        assert_eq!(p.platform, Platform::Esp32);
        assert_eq!(p.initial_position(AxisId::Axis2), None);
        assert_eq!(p.range(AxisId::Gripper), AngleRange::new(30, 100).unwrap());
        assert!(p.strict);
    }

    #[test]
    fn test_inverted_range() {
        let mut p = Params::default();
        p.min_pos_deg[0] = 150;
        p.max_pos_deg[0] = 20;
        assert_eq!(p.range(AxisId::Axis1), AngleRange::FULL);
    }
}
