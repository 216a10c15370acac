//! FeederService: command replies and the event stream.

use petfeeder::app::commands::FeederCommand;
use petfeeder::app::events::{FeedSource, FeederEvent};
use petfeeder::app::service::{CommandReply, FeederService};
use petfeeder::config::FeederConfig;
use petfeeder::fsm::MotorState;
use petfeeder::timer::TimerFire;

use crate::mock_hw::{HOUR_MS, ManualClock, MockMotor, RecordingSink};

fn rig() -> (FeederService, MockMotor, ManualClock, RecordingSink) {
    let clock = ManualClock::new();
    let motor = MockMotor::new(clock.clone(), 500);
    let mut sink = RecordingSink::new();
    let mut app = FeederService::new(FeederConfig::default());
    app.start(&mut sink);
    (app, motor, clock, sink)
}

#[test]
fn start_emits_initial_state() {
    let (_app, _motor, _clock, sink) = rig();
    assert_eq!(sink.events, vec![FeederEvent::Started(MotorState::Idle)]);
}

#[test]
fn manual_feed_round_trip_events() {
    let (mut app, mut motor, clock, mut sink) = rig();
    sink.clear();

    let reply = app.handle_command(FeederCommand::FeedNow, 0, &mut motor, &mut sink);
    assert_eq!(reply, CommandReply::FeedStarted);
    assert_eq!(reply.to_string(), "Cat is being fed!");

    let again = app.handle_command(FeederCommand::FeedNow, 0, &mut motor, &mut sink);
    assert_eq!(again.to_string(), "Already feeding the cat!");

    clock.set(500);
    app.tick(500, &mut motor, &mut sink);

    assert_eq!(
        sink.events,
        vec![
            FeederEvent::StateChanged {
                from: MotorState::Idle,
                to: MotorState::Running
            },
            FeederEvent::FeedStarted {
                source: FeedSource::Manual
            },
            FeederEvent::StateChanged {
                from: MotorState::Running,
                to: MotorState::Idle
            },
            FeederEvent::FeedCompleted { count: 1 },
        ]
    );
}

#[test]
fn timer_feed_is_tagged_with_its_source() {
    let (mut app, mut motor, clock, mut sink) = rig();
    let cmd = FeederCommand::ArmTimer {
        hours: 1.0,
        repeats: 0,
        repeat_forever: false,
    };
    let reply = app.handle_command(cmd, 0, &mut motor, &mut sink);
    assert_eq!(reply.to_string(), "Timer set for 1 hours");
    assert!(sink.events.contains(&FeederEvent::TimerArmed {
        duration_ms: HOUR_MS,
        repeats: 0,
        repeat_forever: false
    }));

    clock.set(HOUR_MS);
    app.tick(HOUR_MS, &mut motor, &mut sink);
    assert!(sink.events.contains(&FeederEvent::TimerFired(TimerFire::Final)));
    assert!(sink.events.contains(&FeederEvent::FeedStarted {
        source: FeedSource::Timer
    }));
    assert_eq!(app.controller().motor_state(), MotorState::Running);
}

#[test]
fn cancel_without_timer_is_silent() {
    let (mut app, mut motor, _clock, mut sink) = rig();
    sink.clear();

    let reply = app.handle_command(FeederCommand::CancelTimer, 0, &mut motor, &mut sink);
    assert_eq!(reply.to_string(), "Timer cancelled");
    assert!(sink.events.is_empty());

    let arm = FeederCommand::ArmTimer {
        hours: 2.0,
        repeats: 0,
        repeat_forever: true,
    };
    assert_eq!(
        app.handle_command(arm, 0, &mut motor, &mut sink).to_string(),
        "Timer set for 2 hours, repeating indefinitely"
    );
    app.handle_command(FeederCommand::CancelTimer, 0, &mut motor, &mut sink);
    app.handle_command(FeederCommand::CancelTimer, 0, &mut motor, &mut sink);
    assert_eq!(sink.count(|e| *e == FeederEvent::TimerCancelled), 1);
}

#[test]
fn reset_reports_previous_count() {
    let (mut app, mut motor, clock, mut sink) = rig();
    for i in 0..3u64 {
        let t = i * 1_000;
        clock.set(t);
        app.handle_command(FeederCommand::FeedNow, t, &mut motor, &mut sink);
        clock.set(t + 500);
        app.tick(t + 500, &mut motor, &mut sink);
    }
    assert_eq!(app.controller().feed_count(), 3);

    let reply = app.handle_command(FeederCommand::ResetFeedCount, 3_000, &mut motor, &mut sink);
    assert_eq!(reply.to_string(), "Feed count reset to 0");
    assert_eq!(sink.events.last(), Some(&FeederEvent::FeedCountReset { previous: 3 }));
    assert_eq!(app.controller().feed_count(), 0);
}

