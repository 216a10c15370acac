//! Feed timer: a countdown with a repeat policy.
//!
//! The timer is pure bookkeeping over a monotonic millisecond clock.  It
//! never reads the clock itself; the controller passes `now_ms` in, which
//! keeps every expiry decision reproducible in tests.
//!
//! ```text
//!   arm(duration, repeats, forever) ──▶ counting down
//!                                           │ now - started_at >= duration
//!                                           ▼
//!              ┌──────────── poll() ──────────────┐
//!              │ forever        → Forever, re-arm │
//!              │ repeats > 0    → Repeat, re-arm  │
//!              │ repeats == 0   → Final, drop     │
//!              └──────────────────────────────────┘
//! ```

/// Milliseconds in one hour.
pub const MS_PER_HOUR: u64 = 3_600_000;

/// Convert a (possibly fractional) hour count into milliseconds.
///
/// Total over all inputs: negative and NaN values become 0 (expire on the
/// next tick) and values beyond `u64` saturate (effectively never expire),
/// because float-to-int `as` casts saturate.
pub fn hours_to_ms(hours: f64) -> u64 {
    (hours * MS_PER_HOUR as f64).round() as u64
}

/// How an expiry was handled by the repeat policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerFire {
    /// Repeat-forever timer fired and re-armed.
    Forever,
    /// Counted timer fired and re-armed; `remaining` repeats are left.
    Repeat { remaining: u32 },
    /// Last (or only) firing; the timer must be dropped.
    Final,
}

/// An armed feed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedTimer {
    total_duration_ms: u64,
    started_at_ms: u64,
    /// Ignored (kept at 0) when `repeat_forever` is set.
    repeats_remaining: u32,
    repeat_forever: bool,
}

impl FeedTimer {
    /// Arm a timer starting at `now_ms`.  `repeats` is not consulted when
    /// `repeat_forever` is true.
    pub fn new(total_duration_ms: u64, repeats: u32, repeat_forever: bool, now_ms: u64) -> Self {
        Self {
            total_duration_ms,
            started_at_ms: now_ms,
            repeats_remaining: if repeat_forever { 0 } else { repeats },
            repeat_forever,
        }
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    pub fn repeats_remaining(&self) -> u32 {
        self.repeats_remaining
    }

    pub fn repeat_forever(&self) -> bool {
        self.repeat_forever
    }

    /// Time since the timer was (re-)armed.  A clock reading earlier than
    /// `started_at` counts as zero elapsed.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }

    /// Countdown as seen at `now_ms`, clamped at zero.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.total_duration_ms.saturating_sub(self.elapsed_ms(now_ms))
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms) >= self.total_duration_ms
    }

    /// Check for expiry and apply the repeat policy.
    ///
    /// Re-arming restarts the countdown from `now_ms`, not from the old
    /// deadline, so a late poll delays every later firing by the same
    /// amount.  After [`TimerFire::Final`] the caller drops the timer.
    pub fn poll(&mut self, now_ms: u64) -> Option<TimerFire> {
        if !self.is_expired(now_ms) {
            return None;
        }

        let fire = if self.repeat_forever {
            TimerFire::Forever
        } else if self.repeats_remaining > 0 {
            self.repeats_remaining -= 1;
            TimerFire::Repeat {
                remaining: self.repeats_remaining,
            }
        } else {
            return Some(TimerFire::Final);
        };

        self.started_at_ms = now_ms;
        Some(fire)
    }
}
