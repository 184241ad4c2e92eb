//! # Arm hardware
//!
//! Builds the arm on whatever hardware this executable was compiled for. On a Raspberry Pi the
//! servos are driven through a PCA9685 board on the I2C bus and the buzzer through software PWM
//! on a GPIO pin. Everywhere else the arm runs on simulated hardware, logging what it would do.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use armbot::ArmWorker;
use color_eyre::Result;

use crate::params::ArmExecParams;

#[cfg(target_arch = "arm")]
pub use pi::build;

#[cfg(not(target_arch = "arm"))]
pub use sim::build;

// ------------------------------------------------------------------------------------------------
// SIMULATED HARDWARE
// ------------------------------------------------------------------------------------------------

#[cfg(not(target_arch = "arm"))]
mod sim {
    use super::*;
    use armbot::sim::{sim_armbot_with_log, EventLog};
    use log::info;

    /// Build the arm on simulated hardware.
    ///
    /// With `real_time` motions and notes take as long as they would on the real arm.
    pub fn build(params: &ArmExecParams, real_time: bool) -> Result<ArmWorker> {
        info!("No arm hardware on this host, running in simulation");

        let mut bot = sim_armbot_with_log(params.arm.clone(), real_time, EventLog::discarding());
        bot.serial_start(params.baud_rate);

        Ok(ArmWorker::spawn(bot))
    }
}

// ------------------------------------------------------------------------------------------------
// RASPBERRY PI HARDWARE
// ------------------------------------------------------------------------------------------------

#[cfg(target_arch = "arm")]
mod pi {
    use super::*;
    use armbot::{
        servo_ctrl::{pca9685, DriverServo},
        serial::WriteSink,
        ArmBot, ArmHardware, ToneGenerator,
    };
    use color_eyre::eyre::{eyre, WrapErr};
    use log::{info, warn};
    use pwm_pca9685::{Address, Pca9685};
    use rppal::{
        gpio::{Gpio, OutputPin},
        hal::Delay,
        i2c::I2c,
    };
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicU64, Ordering},
            Arc, Mutex,
        },
        thread,
    };

    /// Duty cycle of the square wave driving the buzzer.
    const TONE_DUTY_CYCLE: f64 = 0.5;

    /// Software PWM tone output on the Pi's GPIO pins.
    pub struct GpioTone {
        gpio: Gpio,

        pins: HashMap<u8, Arc<Mutex<OutputPin>>>,

        /// Incremented on every new tone, so a timed stop only silences the tone that started it.
        generation: Arc<AtomicU64>,
    }

    impl GpioTone {
        pub fn new() -> Result<Self> {
            Ok(Self {
                gpio: Gpio::new().wrap_err("Failed to open the GPIO peripheral")?,
                pins: HashMap::new(),
                generation: Arc::new(AtomicU64::new(0)),
            })
        }

        fn pin(&mut self, pin: u8) -> Option<Arc<Mutex<OutputPin>>> {
            if let Some(p) = self.pins.get(&pin) {
                return Some(p.clone());
            }

            match self.gpio.get(pin) {
                Ok(p) => {
                    let p = Arc::new(Mutex::new(p.into_output_low()));
                    self.pins.insert(pin, p.clone());
                    Some(p)
                }
                Err(e) => {
                    warn!("Couldn't open GPIO {} for the buzzer: {}", pin, e);
                    None
                }
            }
        }
    }

    impl ToneGenerator for GpioTone {
        fn tone(&mut self, pin: u8, frequency_hz: u32, duration_ms: Option<u32>) {
            let output = match self.pin(pin) {
                Some(p) => p,
                None => return,
            };

            let this_gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

            if let Ok(mut o) = output.lock() {
                if let Err(e) = o.set_pwm_frequency(frequency_hz as f64, TONE_DUTY_CYCLE) {
                    warn!("Couldn't start a tone on GPIO {}: {}", pin, e);
                    return;
                }
            }

            if let Some(d) = duration_ms {
                let generation = self.generation.clone();

                thread::spawn(move || {
                    thread::sleep(util::time::millis(d as i64));

                    if generation.load(Ordering::SeqCst) == this_gen {
                        if let Ok(mut o) = output.lock() {
                            o.clear_pwm().ok();
                        }
                    }
                });
            }
        }

        fn no_tone(&mut self, pin: u8) {
            self.generation.fetch_add(1, Ordering::SeqCst);

            if let Some(p) = self.pins.get(&pin) {
                if let Ok(mut o) = p.lock() {
                    o.clear_pwm().ok();
                }
            }
        }
    }

    /// Build the arm on a PCA9685 servo board and the Pi's GPIO.
    pub fn build(params: &ArmExecParams, _real_time: bool) -> Result<ArmWorker> {
        let i2c = I2c::new().wrap_err("Failed to open the I2C bus")?;

        let mut pca = Pca9685::new(i2c, Address::from(params.pca9685_address))
            .map_err(|e| eyre!("Failed to create the PCA9685 driver: {:?}", e))?;
        pca9685::init_board(&mut pca).wrap_err("Failed to initialise the PCA9685 board")?;

        info!("PCA9685 initialised at address {:#04x}", params.pca9685_address);

        let board = Arc::new(Mutex::new(pca));

        let hw = ArmHardware {
            axis1: DriverServo::new(board.clone()),
            axis2: DriverServo::new(board.clone()),
            axis3: DriverServo::new(board.clone()),
            gripper: DriverServo::new(board),
            tone: GpioTone::new()?,
            sink: WriteSink::new(std::io::stdout()),
            delay: Delay::new(),
        };

        let mut bot = ArmBot::new(params.arm.clone(), hw);
        bot.serial_start(params.baud_rate);

        Ok(ArmWorker::spawn(bot))
    }
}
