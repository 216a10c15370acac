//! Shared mutable context threaded through every FSM handler.
//!
//! `MotorContext` is the blackboard the state handlers read from and write
//! to: the latest actuator poll, the pending engage request, and the
//! completed-feed counter.

/// The shared context passed to every state handler function.
#[derive(Debug, Default)]
pub struct MotorContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,

    // -- Actuator input --
    /// Result of the most recent `ActuatorPort::is_busy` poll.
    /// Written by the controller before each FSM tick while Running.
    pub actuator_busy: bool,

    // -- Actuator output --
    /// Set by `running_enter`; the controller consumes it and calls
    /// `ActuatorPort::engage` exactly once per feed cycle.
    engage_requested: bool,

    // -- Counters --
    /// Completed feed cycles.  Advanced only by `running_exit`.
    pub feed_count: u32,
}

impl MotorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn request_engage(&mut self) {
        self.engage_requested = true;
    }

    /// Consume the pending engage request, if any.
    pub fn take_engage_request(&mut self) -> bool {
        core::mem::take(&mut self.engage_requested)
    }
}
