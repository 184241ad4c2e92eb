//! Parameters for the arm executable

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the arm executable.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ArmExecParams {
    /// Parameters of the arm itself.
    pub arm: armbot::Params,

    /// Baud rate the serial line is started at.
    pub baud_rate: u32,

    /// I2C address of the PCA9685 servo driver board.
    #[cfg_attr(not(target_arch = "arm"), allow(dead_code))]
    pub pca9685_address: u8,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for ArmExecParams {
    fn default() -> Self {
        Self {
            arm: armbot::Params::default(),
            baud_rate: 115200,
            pca9685_address: 0x40,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
