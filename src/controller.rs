//! Feed/Timer controller — the only stateful part of the feeder.
//!
//! [`Controller`] owns the motor FSM, at most one [`FeedTimer`], and the
//! completed-feed counter.  Nothing else may mutate them.  The actuator is
//! passed in at each call site, and time arrives as an explicit `now_ms`
//! argument, so the controller never blocks, never self-schedules, and can
//! be driven entirely by synthetic time in tests.
//!
//! ```text
//!  feed_now ─────┐
//!  arm_timer ────┤        ┌─────────────────────────────┐
//!  cancel_timer ─┼──────▶ │ Controller                  │ ──▶ ActuatorPort::engage
//!  reset_count ──┤        │  Fsm · FeedTimer · counter  │ ◀── ActuatorPort::is_busy
//!  tick(now) ────┘        └─────────────────────────────┘
//!                                      │
//!                                      ▼
//!                              status(now) → Snapshot
//! ```

use log::info;

use crate::app::ports::ActuatorPort;
use crate::fsm::context::MotorContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, MotorState};
use crate::timer::{FeedTimer, TimerFire, hours_to_ms};

/// Result of asking for a feed.  Neither variant is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The motor was idle and a new feed cycle was started.
    Started,
    /// A feed cycle was already in progress; nothing changed.
    AlreadyRunning,
}

/// What a single [`Controller::tick`] observed and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// A running feed cycle was observed to complete this tick.
    pub feed_completed: bool,
    /// The timer expired this tick, and how the repeat policy handled it.
    pub timer_fired: Option<TimerFire>,
    /// The feed triggered by the expiry, if the timer fired.
    pub timer_feed: Option<FeedOutcome>,
}

/// Read-only view of the controller at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub motor_state: MotorState,
    pub feed_count: u32,
    /// Whether a timer is armed (it may already be due but not yet ticked).
    pub timer_armed: bool,
    /// Countdown to the next expiry; 0 when no timer is armed.
    pub remaining_ms: u64,
    /// 0 when no timer is armed or in repeat-forever mode.
    pub repeats_remaining: u32,
    pub repeat_forever: bool,
}

/// The feed/timer controller.
pub struct Controller {
    fsm: Fsm,
    ctx: MotorContext,
    timer: Option<FeedTimer>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Idle motor, no timer, zero counter.
    pub fn new() -> Self {
        let mut ctx = MotorContext::new();
        let mut fsm = Fsm::new(build_state_table(), MotorState::Idle);
        fsm.start(&mut ctx);
        Self {
            fsm,
            ctx,
            timer: None,
        }
    }

    // ── Commands ──────────────────────────────────────────────

    /// Start a feed cycle if the motor is idle.
    ///
    /// Does not touch the feed counter; that advances only when the cycle
    /// is observed to complete in [`tick`](Self::tick).
    pub fn feed_now(&mut self, hw: &mut impl ActuatorPort) -> FeedOutcome {
        if self.fsm.current_state() == MotorState::Running {
            return FeedOutcome::AlreadyRunning;
        }
        self.fsm.force_transition(MotorState::Running, &mut self.ctx);
        self.apply_actuator(hw);
        FeedOutcome::Started
    }

    /// Arm the timer, unconditionally replacing any existing one.
    ///
    /// `hours` is not validated: zero, negative or NaN values expire on the
    /// next tick and huge values saturate to a timer that never expires.
    pub fn arm_timer(&mut self, hours: f64, repeats: u32, repeat_forever: bool, now_ms: u64) {
        let timer = FeedTimer::new(hours_to_ms(hours), repeats, repeat_forever, now_ms);
        info!(
            "Timer armed: {} ms, repeats={}, forever={}",
            timer.total_duration_ms(),
            timer.repeats_remaining(),
            timer.repeat_forever()
        );
        self.timer = Some(timer);
    }

    /// Disarm the timer.  Idempotent; returns whether a timer was armed.
    ///
    /// A feed cycle already in flight is left to complete.
    pub fn cancel_timer(&mut self) -> bool {
        let was_armed = self.timer.take().is_some();
        if was_armed {
            info!("Timer cancelled");
        }
        was_armed
    }

    /// Zero the feed counter and return its previous value.
    pub fn reset_feed_count(&mut self) -> u32 {
        let previous = core::mem::take(&mut self.ctx.feed_count);
        info!("Feed count reset (was {})", previous);
        previous
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Advance the controller to `now_ms`.
    ///
    /// 1. If Running, poll the actuator; not-busy completes the cycle and
    ///    advances the counter.
    /// 2. If the timer is due, trigger a feed and apply the repeat policy.
    ///
    /// Step 1 always runs first, so a timer expiring in the same tick a
    /// cycle completes starts a fresh cycle immediately.
    pub fn tick(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) -> TickReport {
        let mut report = TickReport::default();

        // 1. Motor completion
        if self.fsm.current_state() == MotorState::Running {
            self.ctx.actuator_busy = hw.is_busy();
        }
        let was_running = self.fsm.current_state() == MotorState::Running;
        self.fsm.tick(&mut self.ctx);
        // Running is only ever left through completion.
        report.feed_completed = was_running && self.fsm.current_state() == MotorState::Idle;

        // 2. Timer expiry
        let fire = self.timer.as_mut().and_then(|t| t.poll(now_ms));
        if let Some(fire) = fire {
            if fire == TimerFire::Final {
                self.timer = None;
            }
            info!("Timer fired ({:?})", fire);
            report.timer_fired = Some(fire);
            report.timer_feed = Some(self.feed_now(hw));
        }

        report
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of the controller as seen at `now_ms`.  No side effects.
    pub fn status(&self, now_ms: u64) -> Snapshot {
        Snapshot {
            motor_state: self.fsm.current_state(),
            feed_count: self.ctx.feed_count,
            timer_armed: self.timer.is_some(),
            remaining_ms: self.timer.map_or(0, |t| t.remaining_ms(now_ms)),
            repeats_remaining: self.timer.map_or(0, |t| t.repeats_remaining()),
            repeat_forever: self.timer.is_some_and(|t| t.repeat_forever()),
        }
    }

    pub fn motor_state(&self) -> MotorState {
        self.fsm.current_state()
    }

    pub fn feed_count(&self) -> u32 {
        self.ctx.feed_count
    }

    /// The armed timer, if any.
    pub fn timer(&self) -> Option<&FeedTimer> {
        self.timer.as_ref()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Forward a pending engage request from the FSM to the actuator.
    fn apply_actuator(&mut self, hw: &mut impl ActuatorPort) {
        if self.ctx.take_engage_request() {
            hw.engage();
        }
    }
}
