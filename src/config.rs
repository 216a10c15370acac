//! System configuration parameters
//!
//! All tunable parameters for the PetFeeder system.  Compiled-in defaults;
//! the transport may provision a replacement as JSON.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Longest control-loop period that still gives a responsive status page.
const MAX_TICK_INTERVAL_MS: u32 = 5_000;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeederConfig {
    // --- Motor ---
    /// How long one feed cycle drives the dispensing motor (milliseconds)
    pub motor_run_ms: u32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub tick_interval_ms: u32,
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            // Motor
            motor_run_ms: 2_000,

            // Timing
            tick_interval_ms: 100, // 10 Hz
        }
    }
}

impl FeederConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<()> {
        if self.motor_run_ms == 0 {
            return Err(Error::Config("motor_run_ms must be > 0"));
        }
        if !(1..=MAX_TICK_INTERVAL_MS).contains(&self.tick_interval_ms) {
            return Err(Error::Config("tick_interval_ms must be 1–5000"));
        }
        if self.tick_interval_ms >= self.motor_run_ms {
            return Err(Error::Config(
                "tick_interval_ms must be shorter than motor_run_ms",
            ));
        }
        Ok(())
    }
}
