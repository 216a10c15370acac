//! End-to-end: HTTP-shaped requests through `web_api::dispatch`.

use petfeeder::adapters::web_api::{ApiRequest, ApiResponse, Method, dispatch};
use petfeeder::app::ports::ClockPort;
use petfeeder::app::service::FeederService;
use petfeeder::config::FeederConfig;

use crate::mock_hw::{HOUR_MS, ManualClock, MockMotor, RecordingSink};

struct Rig {
    app: FeederService,
    motor: MockMotor,
    clock: ManualClock,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let clock = ManualClock::new();
        Self {
            app: FeederService::new(FeederConfig::default()),
            motor: MockMotor::new(clock.clone(), 2_000),
            clock,
            sink: RecordingSink::new(),
        }
    }

    fn get(&mut self, path: &str) -> ApiResponse {
        self.send(Method::Get, path, None)
    }

    fn post(&mut self, path: &str, body: &str) -> ApiResponse {
        self.send(Method::Post, path, Some(body.as_bytes()))
    }

    fn send(&mut self, method: Method, path: &str, body: Option<&[u8]>) -> ApiResponse {
        let req = ApiRequest { method, path, body };
        let now = self.clock.now_ms();
        dispatch(&mut self.app, &req, now, &mut self.motor, &mut self.sink)
    }

    fn tick_at(&mut self, now_ms: u64) {
        self.clock.set(now_ms);
        self.app.tick(now_ms, &mut self.motor, &mut self.sink);
    }
}

#[test]
fn status_starts_ready() {
    let mut rig = Rig::new();
    let r = rig.get("/status");
    assert_eq!(r.status, 200);
    assert_eq!(r.content_type, "application/json");
    assert_eq!(r.body.as_str(), r#"{"status":"Ready to feed","feedCount":0}"#);
}

#[test]
fn feed_then_status_then_complete() {
    let mut rig = Rig::new();
    assert_eq!(rig.get("/feed").body.as_str(), "Cat is being fed!");
    assert_eq!(rig.get("/feed").body.as_str(), "Already feeding the cat!");
    assert!(rig.get("/status").body.contains("Feeding in progress"));

    rig.tick_at(2_000);
    assert_eq!(
        rig.get("/status").body.as_str(),
        r#"{"status":"Ready to feed","feedCount":1}"#
    );
}

#[test]
fn timer_lifecycle_over_http() {
    let mut rig = Rig::new();
    let r = rig.post("/setTimer", r#"{"hours":"1","repeats":"2","repeatForever":false}"#);
    assert_eq!(r.status, 200);
    assert_eq!(r.body.as_str(), "Timer set for 1 hours, repeating 2 times");

    rig.clock.set(HOUR_MS / 2);
    assert_eq!(
        rig.get("/status").body.as_str(),
        r#"{"status":"Timer running","feedCount":0,"timerSeconds":1800,"repeats":2,"repeatForever":false}"#
    );

    rig.tick_at(HOUR_MS);
    rig.tick_at(HOUR_MS + 2_000);
    let status = rig.get("/status");
    assert!(status.body.contains(r#""feedCount":1"#));
    assert!(status.body.contains(r#""repeats":1"#));

    assert_eq!(rig.get("/cancelTimer").body.as_str(), "Timer cancelled");
    assert_eq!(rig.get("/cancelTimer").body.as_str(), "Timer cancelled");
    assert_eq!(
        rig.get("/status").body.as_str(),
        r#"{"status":"Ready to feed","feedCount":1}"#
    );

    assert_eq!(rig.get("/resetFeedCount").body.as_str(), "Feed count reset to 0");
    assert!(rig.get("/status").body.contains(r#""feedCount":0"#));
}

#[test]
fn bad_requests_are_rejected_without_side_effects() {
    let mut rig = Rig::new();

    let r = rig.send(Method::Post, "/setTimer", None);
    assert_eq!((r.status, r.body.as_str()), (400, "Bad Request: No data received"));

    let r = rig.post("/setTimer", "{hours: 1");
    assert_eq!((r.status, r.body.as_str()), (400, "Invalid JSON"));

    let r = rig.get("/does-not-exist");
    assert_eq!((r.status, r.body.as_str()), (404, "Not found"));

    assert!(rig.app.controller().timer().is_none());
    assert!(rig.sink.events.is_empty());
}

#[test]
fn long_timers_are_accepted() {
    let mut rig = Rig::new();
    let r = rig.post("/setTimer", r#"{"hours":48,"repeats":0,"repeatForever":false}"#);
    assert_eq!((r.status, r.body.as_str()), (200, "Timer set for 48 hours"));

    let timer = rig.app.controller().timer().copied();
    assert_eq!(timer.map(|t| t.total_duration_ms()), Some(48 * HOUR_MS));
    assert!(rig.get("/status").body.contains(r#""timerSeconds":172800"#));
}
