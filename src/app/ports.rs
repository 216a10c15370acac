//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller / FeederService (domain)
//! ```
//!
//! Driven adapters (motor, clock, event sinks) implement these traits.
//! The domain consumes them via generics at call sites, so the controller
//! never touches hardware directly and can be driven by mocks with
//! synthetic time.

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single dispensing motor.
///
/// The contract is deliberately minimal: there is no stop operation and
/// no completion callback.  The controller discovers completion only by
/// polling [`is_busy`](ActuatorPort::is_busy) on each tick, and assumes
/// the motor always eventually reports not-busy.
pub trait ActuatorPort {
    /// Begin a feed cycle.  Fire-and-forget: after this returns the motor
    /// is moving or was already moving.
    fn engage(&mut self);

    /// Non-blocking poll: is the motor still completing its cycle?
    fn is_busy(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: hardware timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Never wall-clock.
pub trait ClockPort {
    /// Milliseconds since an arbitrary fixed origin (usually boot).
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`FeederEvent`](super::events::FeederEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::FeederEvent);
}
