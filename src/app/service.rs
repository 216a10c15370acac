//! Application service — the hexagonal core.
//!
//! [`FeederService`] owns the feed/timer [`Controller`] and the live
//! configuration.  It turns inbound [`FeederCommand`]s into controller
//! calls, answers each with a [`CommandReply`], and reports everything
//! that happened as [`FeederEvent`]s.  All I/O flows through port traits
//! injected at call sites.
//!
//! ```text
//!  FeederCommand ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                    │     FeederService      │
//!   ActuatorPort ◀── │  Controller · replies  │ ──▶ CommandReply
//!                    └────────────────────────┘
//! ```

use core::fmt;

use log::info;

use crate::config::FeederConfig;
use crate::controller::{Controller, FeedOutcome, Snapshot, TickReport};
use crate::fsm::MotorState;

use super::commands::FeederCommand;
use super::events::{FeedSource, FeederEvent};
use super::ports::{ActuatorPort, EventSink};

// ───────────────────────────────────────────────────────────────
// Command replies
// ───────────────────────────────────────────────────────────────

/// Outcome of a command, rendered as the user-facing reply text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandReply {
    FeedStarted,
    AlreadyFeeding,
    TimerSet {
        hours: f64,
        repeats: u32,
        repeat_forever: bool,
    },
    TimerCancelled,
    FeedCountReset,
}

impl From<FeedOutcome> for CommandReply {
    fn from(outcome: FeedOutcome) -> Self {
        match outcome {
            FeedOutcome::Started => Self::FeedStarted,
            FeedOutcome::AlreadyRunning => Self::AlreadyFeeding,
        }
    }
}

impl fmt::Display for CommandReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeedStarted => write!(f, "Cat is being fed!"),
            Self::AlreadyFeeding => write!(f, "Already feeding the cat!"),
            Self::TimerSet {
                hours,
                repeat_forever: true,
                ..
            } => write!(f, "Timer set for {hours} hours, repeating indefinitely"),
            Self::TimerSet { hours, repeats, .. } if *repeats > 0 => {
                write!(f, "Timer set for {hours} hours, repeating {repeats} times")
            }
            Self::TimerSet { hours, .. } => write!(f, "Timer set for {hours} hours"),
            Self::TimerCancelled => write!(f, "Timer cancelled"),
            Self::FeedCountReset => write!(f, "Feed count reset to 0"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// FeederService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct FeederService {
    controller: Controller,
    config: FeederConfig,
}

impl FeederService {
    /// Construct the service.  Call [`start`](Self::start) before ticking.
    pub fn new(config: FeederConfig) -> Self {
        Self {
            controller: Controller::new(),
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        let state = self.controller.motor_state();
        sink.emit(&FeederEvent::Started(state));
        info!("FeederService started in {:?}", state);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle at `now_ms` and emit what it observed.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> TickReport {
        let report = self.controller.tick(now_ms, hw);

        if report.feed_completed {
            sink.emit(&FeederEvent::StateChanged {
                from: MotorState::Running,
                to: MotorState::Idle,
            });
            sink.emit(&FeederEvent::FeedCompleted {
                count: self.controller.feed_count(),
            });
        }
        if let Some(fire) = report.timer_fired {
            sink.emit(&FeederEvent::TimerFired(fire));
        }
        if report.timer_feed == Some(FeedOutcome::Started) {
            Self::emit_feed_started(FeedSource::Timer, sink);
        }

        report
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command received at `now_ms`.
    pub fn handle_command(
        &mut self,
        cmd: FeederCommand,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> CommandReply {
        match cmd {
            FeederCommand::FeedNow => {
                let outcome = self.controller.feed_now(hw);
                if outcome == FeedOutcome::Started {
                    Self::emit_feed_started(FeedSource::Manual, sink);
                }
                outcome.into()
            }
            FeederCommand::ArmTimer {
                hours,
                repeats,
                repeat_forever,
            } => {
                self.controller
                    .arm_timer(hours, repeats, repeat_forever, now_ms);
                if let Some(timer) = self.controller.timer() {
                    sink.emit(&FeederEvent::TimerArmed {
                        duration_ms: timer.total_duration_ms(),
                        repeats: timer.repeats_remaining(),
                        repeat_forever,
                    });
                }
                CommandReply::TimerSet {
                    hours,
                    repeats,
                    repeat_forever,
                }
            }
            FeederCommand::CancelTimer => {
                if self.controller.cancel_timer() {
                    sink.emit(&FeederEvent::TimerCancelled);
                }
                CommandReply::TimerCancelled
            }
            FeederCommand::ResetFeedCount => {
                let previous = self.controller.reset_feed_count();
                sink.emit(&FeederEvent::FeedCountReset { previous });
                CommandReply::FeedCountReset
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Controller snapshot at `now_ms`.
    pub fn status(&self, now_ms: u64) -> Snapshot {
        self.controller.status(now_ms)
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn config(&self) -> &FeederConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn emit_feed_started(source: FeedSource, sink: &mut impl EventSink) {
        sink.emit(&FeederEvent::StateChanged {
            from: MotorState::Idle,
            to: MotorState::Running,
        });
        sink.emit(&FeederEvent::FeedStarted { source });
    }
}
