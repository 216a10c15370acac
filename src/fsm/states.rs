//! Concrete state handler functions and table builder.
//!
//! ```text
//!          feed request (forced)
//!  IDLE ───────────────────────────▶ RUNNING
//!    ▲                                  │
//!    └────[actuator reports not-busy]───┘
//! ```

use super::context::MotorContext;
use super::{MotorState, StateDescriptor};
use log::info;

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; MotorState::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: MotorState::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Running
        StateDescriptor {
            id: MotorState::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: Some(running_exit),
            on_update: running_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut MotorContext) {
    info!("IDLE: ready to feed (total feeds {})", ctx.feed_count);
}

fn idle_update(_ctx: &mut MotorContext) -> Option<MotorState> {
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING state — one feed cycle in flight
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut MotorContext) {
    ctx.request_engage();
    // Until the first poll we assume the motor is moving.
    ctx.actuator_busy = true;
    info!("RUNNING: feed cycle dispatched");
}

fn running_update(ctx: &mut MotorContext) -> Option<MotorState> {
    if ctx.actuator_busy {
        return None;
    }
    Some(MotorState::Idle)
}

fn running_exit(ctx: &mut MotorContext) {
    ctx.feed_count = ctx.feed_count.saturating_add(1);
    info!(
        "RUNNING: feed cycle complete after {} ticks (count {})",
        ctx.ticks_in_state, ctx.feed_count
    );
}
