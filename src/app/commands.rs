//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (the web
//! adapter today) that the [`FeederService`](super::service::FeederService)
//! interprets and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeederCommand {
    /// Start a feed cycle now (no-op outcome if one is already running).
    FeedNow,

    /// Arm the feed timer, replacing any existing one.
    ArmTimer {
        hours: f64,
        repeats: u32,
        repeat_forever: bool,
    },

    /// Disarm the feed timer.  Does not stop a feed already in progress.
    CancelTimer,

    /// Zero the completed-feed counter.
    ResetFeedCount,
}
