//! Outbound application events.
//!
//! The [`FeederService`](super::service::FeederService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::fsm::MotorState;
use crate::timer::TimerFire;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum FeederEvent {
    /// The service has started (carries initial motor state).
    Started(MotorState),

    /// The motor state machine moved between states.
    StateChanged { from: MotorState, to: MotorState },

    /// A feed cycle was dispatched to the motor.
    FeedStarted { source: FeedSource },

    /// A feed cycle was observed to complete; `count` is the new total.
    FeedCompleted { count: u32 },

    /// A timer was armed.
    TimerArmed {
        duration_ms: u64,
        repeats: u32,
        repeat_forever: bool,
    },

    /// The armed timer expired.
    TimerFired(TimerFire),

    /// The timer was cancelled by command.
    TimerCancelled,

    /// The feed counter was zeroed; `previous` is the value it had.
    FeedCountReset { previous: u32 },
}

/// What caused a feed cycle to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    /// An explicit feed-now command.
    Manual,
    /// Timer expiry.
    Timer,
}
