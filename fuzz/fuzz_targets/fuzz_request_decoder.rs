//! Fuzz target: `web_api::decode_request`
//!
//! Drives arbitrary bodies through the `/setTimer` decoder and arbitrary
//! paths through the router, asserting that decoding never panics and
//! that every accepted timer request can be armed.
//!
//! cargo fuzz run fuzz_request_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use petfeeder::adapters::web_api::{ApiRequest, Method, Route, decode_request};
use petfeeder::app::commands::FeederCommand;
use petfeeder::controller::Controller;

fuzz_target!(|data: &[u8]| {
    let req = ApiRequest {
        method: Method::Post,
        path: "/setTimer",
        body: Some(data),
    };
    if let Ok(Some(Route::Command(FeederCommand::ArmTimer {
        hours,
        repeats,
        repeat_forever,
    }))) = decode_request(&req)
    {
        // Any accepted duration must arm without panicking.
        let mut ctrl = Controller::new();
        ctrl.arm_timer(hours, repeats, repeat_forever, 0);
        assert!(ctrl.timer().is_some());
    }

    // Same bytes as a path: unknown routes resolve to None, never panic.
    if let Ok(path) = core::str::from_utf8(data) {
        let req = ApiRequest {
            method: Method::Get,
            path,
            body: None,
        };
        let _ = decode_request(&req);
    }
});
