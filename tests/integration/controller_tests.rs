//! Controller scenarios driven by synthetic time.
//!
//! The motor mock runs for two seconds per cycle; the loop ticks once a
//! second, so every cycle completes well before the next hourly expiry.

use petfeeder::app::ports::ClockPort;
use petfeeder::controller::{Controller, FeedOutcome};
use petfeeder::fsm::MotorState;
use petfeeder::timer::TimerFire;

use crate::mock_hw::{HOUR_MS, ManualClock, MockMotor};

const RUN_MS: u64 = 2_000;
const STEP_MS: u64 = 1_000;

fn rig() -> (Controller, MockMotor, ManualClock) {
    let clock = ManualClock::new();
    let motor = MockMotor::new(clock.clone(), RUN_MS);
    (Controller::new(), motor, clock)
}

/// Tick every `STEP_MS` until `until_ms`, returning every timer firing.
fn run_until(
    ctrl: &mut Controller,
    motor: &mut MockMotor,
    clock: &ManualClock,
    until_ms: u64,
) -> Vec<(u64, TimerFire)> {
    let mut fired = Vec::new();
    while clock.now_ms() < until_ms {
        let now = clock.advance(STEP_MS);
        if let Some(fire) = ctrl.tick(now, motor).timer_fired {
            fired.push((now, fire));
        }
    }
    fired
}

#[test]
fn three_repeats_fire_four_times_then_clear() {
    let (mut ctrl, mut motor, clock) = rig();
    ctrl.arm_timer(1.0, 3, false, 0);

    let fired = run_until(&mut ctrl, &mut motor, &clock, HOUR_MS);
    assert_eq!(fired, vec![(HOUR_MS, TimerFire::Repeat { remaining: 2 })]);
    let timer = ctrl.timer().copied().expect("re-armed");
    assert_eq!(timer.repeats_remaining(), 2);
    assert_eq!(timer.started_at_ms(), HOUR_MS);
    assert_eq!(ctrl.motor_state(), MotorState::Running);

    let fired = run_until(&mut ctrl, &mut motor, &clock, 4 * HOUR_MS);
    assert_eq!(
        fired,
        vec![
            (2 * HOUR_MS, TimerFire::Repeat { remaining: 1 }),
            (3 * HOUR_MS, TimerFire::Repeat { remaining: 0 }),
            (4 * HOUR_MS, TimerFire::Final),
        ]
    );
    assert!(ctrl.timer().is_none());

    // The fourth cycle completes a couple of ticks later.
    run_until(&mut ctrl, &mut motor, &clock, 4 * HOUR_MS + RUN_MS);
    assert_eq!(ctrl.feed_count(), 4);
    assert_eq!(ctrl.motor_state(), MotorState::Idle);
    assert_eq!(motor.engage_calls, 4);
}

#[test]
fn two_repeats_fire_three_times() {
    let (mut ctrl, mut motor, clock) = rig();
    ctrl.arm_timer(0.5, 2, false, 0);

    let fired = run_until(&mut ctrl, &mut motor, &clock, 3 * HOUR_MS);
    assert_eq!(fired.len(), 3);
    assert_eq!(fired.last().map(|f| f.1), Some(TimerFire::Final));
    assert!(ctrl.timer().is_none());
    assert_eq!(ctrl.feed_count(), 3);
}

#[test]
fn repeat_forever_never_clears() {
    let (mut ctrl, mut motor, clock) = rig();
    ctrl.arm_timer(1.0, 7, true, 0);
    assert_eq!(ctrl.timer().map(|t| t.repeats_remaining()), Some(0));

    let fired = run_until(&mut ctrl, &mut motor, &clock, 10 * HOUR_MS);
    assert_eq!(fired.len(), 10);
    assert!(fired.iter().all(|(_, f)| *f == TimerFire::Forever));
    assert!(ctrl.timer().is_some());
    assert_eq!(ctrl.feed_count(), 9, "tenth cycle still running");

    assert!(ctrl.cancel_timer());
    assert!(!ctrl.cancel_timer());
    assert!(run_until(&mut ctrl, &mut motor, &clock, 12 * HOUR_MS).is_empty());
    assert_eq!(ctrl.feed_count(), 10);
}

#[test]
fn expiry_during_manual_feed_does_not_double_count() {
    let (mut ctrl, mut motor, clock) = rig();
    ctrl.arm_timer(0.0, 0, false, 0);
    assert_eq!(ctrl.feed_now(&mut motor), FeedOutcome::Started);

    let now = clock.advance(STEP_MS);
    let report = ctrl.tick(now, &mut motor);
    assert_eq!(report.timer_fired, Some(TimerFire::Final));
    assert_eq!(report.timer_feed, Some(FeedOutcome::AlreadyRunning));
    assert!(ctrl.timer().is_none());

    run_until(&mut ctrl, &mut motor, &clock, 10 * STEP_MS);
    assert_eq!(ctrl.feed_count(), 1);
    assert_eq!(motor.engage_calls, 1);
}

#[test]
fn completion_and_expiry_in_one_tick_starts_fresh_cycle() {
    let (mut ctrl, mut motor, clock) = rig();
    ctrl.feed_now(&mut motor);
    ctrl.arm_timer(RUN_MS as f64 / HOUR_MS as f64, 0, false, 0);

    clock.set(RUN_MS);
    let report = ctrl.tick(RUN_MS, &mut motor);
    assert!(report.feed_completed);
    assert_eq!(report.timer_feed, Some(FeedOutcome::Started));
    assert_eq!(ctrl.feed_count(), 1);
    assert_eq!(ctrl.motor_state(), MotorState::Running);
}

#[test]
fn reset_leaves_motor_and_timer_alone() {
    let (mut ctrl, mut motor, clock) = rig();
    ctrl.feed_now(&mut motor);
    run_until(&mut ctrl, &mut motor, &clock, RUN_MS);
    ctrl.feed_now(&mut motor);
    ctrl.arm_timer(2.0, 1, false, clock.now_ms());

    let before = ctrl.status(clock.now_ms());
    assert_eq!(ctrl.reset_feed_count(), 1);
    let after = ctrl.status(clock.now_ms());

    assert_eq!(after.feed_count, 0);
    assert_eq!(after.motor_state, before.motor_state);
    assert_eq!(after.remaining_ms, before.remaining_ms);
    assert_eq!(after.repeats_remaining, before.repeats_remaining);
}

#[test]
fn status_counts_down() {
    let (mut ctrl, _motor, _clock) = rig();
    ctrl.arm_timer(1.0, 0, false, 1_000);
    assert_eq!(ctrl.status(1_000).remaining_ms, HOUR_MS);
    assert_eq!(ctrl.status(1_000 + HOUR_MS / 2).remaining_ms, HOUR_MS / 2);
    assert_eq!(ctrl.status(5 * HOUR_MS).remaining_ms, 0);
    // A clock reading before the arm time counts as zero elapsed.
    assert_eq!(ctrl.status(0).remaining_ms, HOUR_MS);
}
