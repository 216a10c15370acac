//! Dispensing motor driver (single enable line into a relay / MOSFET stage).
//!
//! On/off only; speed and stepping are handled by the motor's own driver
//! board.  Generic over any `embedded-hal` output pin, so the same code runs
//! against `esp-idf-hal` pins on the device and mock pins on the host.
//!
//! ## Safety contract
//!
//! This driver is a dumb actuator: it never times itself.  How long a feed
//! cycle lasts is decided by the hardware adapter.

use embedded_hal::digital::OutputPin;

use crate::error::{ActuatorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorOutput {
    Stopped,
    Running,
}

pub struct FeedMotor<P> {
    pin: P,
    state: MotorOutput,
    /// Lifetime count of successful starts.
    rotations: u32,
}

impl<P: OutputPin> FeedMotor<P> {
    /// Wrap `pin`.  The pin is not touched until the first start/stop.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: MotorOutput::Stopped,
            rotations: 0,
        }
    }

    pub fn start(&mut self) -> Result<()> {
        self.pin
            .set_high()
            .map_err(|_| ActuatorError::PinWriteFailed)?;
        self.state = MotorOutput::Running;
        self.rotations = self.rotations.wrapping_add(1);
        Ok(())
    }

    /// De-energise the motor.  On failure the tracked state is left as-is.
    pub fn stop(&mut self) -> Result<()> {
        self.pin
            .set_low()
            .map_err(|_| ActuatorError::PinWriteFailed)?;
        self.state = MotorOutput::Stopped;
        Ok(())
    }

    pub fn state(&self) -> MotorOutput {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == MotorOutput::Running
    }

    pub fn rotations(&self) -> u32 {
        self.rotations
    }
}
