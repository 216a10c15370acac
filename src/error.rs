//! Unified error types for the PetFeeder firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! control loop and the web adapter handle failures uniformly.  All
//! variants are `Copy` and allocation-free.
//!
//! Note that "a feed is already in progress" is **not** an error: it is
//! the [`FeedOutcome::AlreadyRunning`](crate::controller::FeedOutcome)
//! outcome of `feed_now()`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The feed motor output could not be driven.
    Actuator(ActuatorError),
    /// A request from the transport could not be decoded.
    Input(InputError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Input(e) => write!(f, "input: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO write to the motor enable pin failed.
    PinWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinWriteFailed => write!(f, "motor pin write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Input errors (transport payloads)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// A command that needs a body arrived without one.
    MissingBody,
    /// The body is not valid JSON or has the wrong shape.
    MalformedJson,
    /// A numeric field could not be parsed.
    BadNumber(&'static str),
    /// A numeric field is outside the range the adapter accepts.
    OutOfRange(&'static str),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBody => write!(f, "no data received"),
            Self::MalformedJson => write!(f, "invalid JSON"),
            Self::BadNumber(field) => write!(f, "`{field}` is not a number"),
            Self::OutOfRange(field) => write!(f, "`{field}` out of range"),
        }
    }
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
