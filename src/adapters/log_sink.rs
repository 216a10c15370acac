//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (UART on the device).

use log::info;

use crate::app::events::{FeedSource, FeederEvent};
use crate::app::ports::EventSink;

/// Adapter that logs every [`FeederEvent`] to the serial console.
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &FeederEvent) {
        match event {
            FeederEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            FeederEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            FeederEvent::FeedStarted { source } => {
                let source = match source {
                    FeedSource::Manual => "manual",
                    FeedSource::Timer => "timer",
                };
                info!("FEED  | started ({})", source);
            }
            FeederEvent::FeedCompleted { count } => {
                info!("FEED  | completed, total={}", count);
            }
            FeederEvent::TimerArmed {
                duration_ms,
                repeats,
                repeat_forever,
            } => {
                info!(
                    "TIMER | armed {}s | repeats={} | forever={}",
                    duration_ms / 1_000,
                    repeats,
                    repeat_forever
                );
            }
            FeederEvent::TimerFired(fire) => {
                info!("TIMER | fired ({:?})", fire);
            }
            FeederEvent::TimerCancelled => {
                info!("TIMER | cancelled");
            }
            FeederEvent::FeedCountReset { previous } => {
                info!("FEED  | counter reset (was {})", previous);
            }
        }
    }
}
