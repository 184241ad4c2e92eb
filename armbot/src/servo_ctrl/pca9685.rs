//! [`ServoDriver`] implementation for the PCA9685 driver

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use pwm_pca9685::{Channel, Pca9685};
use embedded_hal::blocking::i2c::{Write, WriteRead};

use super::{ServoDriver, ServoError, SERVO_PWM_FREQ_HZ};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const MAX_PWM: u16 = 4096;

/// Frequency of the PCA9685's internal oscillator.
///
/// Units: hertz
const OSC_CLOCK_HZ: u32 = 25_000_000;

const CHANNELS: [Channel; 16] = [
    Channel::C0, Channel::C1, Channel::C2, Channel::C3,
    Channel::C4, Channel::C5, Channel::C6, Channel::C7,
    Channel::C8, Channel::C9, Channel::C10, Channel::C11,
    Channel::C12, Channel::C13, Channel::C14, Channel::C15,
];

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Prescale register value giving the requested output frequency.
pub fn prescale_for(freq_hz: u32) -> u8 {
    let freq_hz = freq_hz.max(1);
    let prescale = (OSC_CLOCK_HZ as f64 / (MAX_PWM as f64 * freq_hz as f64)).round() - 1.0;

    // The chip only accepts prescale values of 3 and above
    prescale.max(3.0).min(255.0) as u8
}

/// Set the board up to drive servos at [`SERVO_PWM_FREQ_HZ`] and enable its outputs.
pub fn init_board<I2C, E>(pca: &mut Pca9685<I2C>) -> Result<(), ServoError>
where
    I2C: Write<Error = E> + WriteRead<Error = E>
{
    pca.set_prescale(prescale_for(SERVO_PWM_FREQ_HZ))
        .map_err(|_| ServoError::I2c)?;
    pca.enable()
        .map_err(|_| ServoError::I2c)
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<I2C, E> ServoDriver for Pca9685<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>
{
    type Channel = Channel;

    fn channel_from_pin(pin: u8) -> Option<Channel> {
        CHANNELS.get(pin as usize).copied()
    }

    fn set_duty_cycle(
        &mut self,
        channel: Self::Channel,
        duty_cycle: f64
    ) -> Result<(), ServoError> {

        // If the duty cycle is out of range return an error
        if duty_cycle < 0.0 || duty_cycle > 1.0 {
            return Err(ServoError::InvalidDutyCycle)
        }

        let off = ((duty_cycle*(MAX_PWM as f64)) as u16).min(MAX_PWM - 1);

        match self.set_channel_on_off(channel, 0, off) {
            Ok(_) => Ok(()),
            Err(pwm_pca9685::Error::I2C(_)) => Err(ServoError::I2c),
            Err(pwm_pca9685::Error::InvalidInputData) => Err(ServoError::InvalidDutyCycle)
        }
    }

    fn disable_channel(&mut self, channel: Self::Channel) -> Result<(), ServoError> {
        self.set_channel_full_off(channel)
            .map_err(|_| ServoError::I2c)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_prescale_for() {
        // Datasheet value for 50 Hz
        assert_eq!(prescale_for(50), 121);
        assert_eq!(prescale_for(1526), 3);
        assert_eq!(prescale_for(0), 255);
    }
}
