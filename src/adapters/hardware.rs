//! Hardware adapter — bridges the feed motor to the [`ActuatorPort`].
//!
//! Realises the driver-reported busy signal as a fixed-length motor run:
//! `engage()` energises the motor and notes the start time, and
//! `is_busy()` de-energises it once `motor_run_ms` has elapsed on the
//! monotonic clock.  This is the only module that touches the motor pin.
//!
//! A failed stop still ends the cycle, but the stop is retried on every
//! later `is_busy()`/`engage()` until the pin goes low.

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::app::ports::{ActuatorPort, ClockPort};
use crate::config::FeederConfig;
use crate::drivers::motor::FeedMotor;

/// Concrete adapter: one motor, one clock, one timed cycle at a time.
pub struct HardwareAdapter<P, C> {
    motor: FeedMotor<P>,
    clock: C,
    run_ms: u64,
    /// Start of the cycle in flight.
    cycle_started_at: Option<u64>,
    /// The last stop failed; the pin may still be energised.
    stop_pending: bool,
}

impl<P: OutputPin, C: ClockPort> HardwareAdapter<P, C> {
    /// Wrap `motor` and force it off.
    pub fn new(motor: FeedMotor<P>, clock: C, config: &FeederConfig) -> Self {
        let mut adapter = Self {
            motor,
            clock,
            run_ms: u64::from(config.motor_run_ms),
            cycle_started_at: None,
            stop_pending: false,
        };
        adapter.stop_motor();
        adapter
    }

    pub fn motor(&self) -> &FeedMotor<P> {
        &self.motor
    }

    /// Whether a failed stop is still waiting to be retried.
    pub fn stop_pending(&self) -> bool {
        self.stop_pending
    }

    fn stop_motor(&mut self) {
        match self.motor.stop() {
            Ok(()) => {
                if self.stop_pending {
                    info!("Motor: stop retry succeeded");
                }
                self.stop_pending = false;
            }
            Err(e) => {
                warn!("Motor: stop failed: {}", e);
                self.stop_pending = true;
            }
        }
    }

    fn retry_stop(&mut self) {
        if self.stop_pending {
            self.stop_motor();
        }
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin, C: ClockPort> ActuatorPort for HardwareAdapter<P, C> {
    fn engage(&mut self) {
        if self.cycle_started_at.is_some() {
            return;
        }
        self.retry_stop();
        match self.motor.start() {
            Ok(()) => {
                self.cycle_started_at = Some(self.clock.now_ms());
                info!("Motor: engaged for {} ms", self.run_ms);
            }
            // Reported not-busy on the next poll: the cycle "completes" empty.
            Err(e) => warn!("Motor: engage failed: {}", e),
        }
    }

    fn is_busy(&mut self) -> bool {
        let Some(started) = self.cycle_started_at else {
            self.retry_stop();
            return false;
        };
        if self.clock.now_ms().saturating_sub(started) < self.run_ms {
            return true;
        }
        self.stop_motor();
        self.cycle_started_at = None;
        false
    }
}
