//! HTTP server task (ESP-IDF only).
//!
//! Registers one `EspHttpServer` handler per route.  Each handler copies
//! the request into a [`RequestMsg`], queues it on [`REQUEST_CHANNEL`] and
//! waits for the control loop to post the matching [`ResponseMsg`].  The
//! handler never touches the feeder state itself.

use core::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use esp_idf_svc::http::Method as HttpMethod;
use esp_idf_svc::http::server::{Configuration, EspHttpConnection, EspHttpServer, Request};
use esp_idf_svc::io::{Read, Write};
use log::{info, warn};

use super::channels::{BODY_CAP, REQUEST_CHANNEL, RESPONSE_CHANNEL, RequestMsg, ResponseMsg};
use super::web_api::{ApiResponse, Method};

/// How long a handler waits for the control loop before giving up.
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);
const REPLY_POLL: Duration = Duration::from_millis(10);

static NEXT_REQUEST_ID: AtomicU32 = AtomicU32::new(1);

const ROUTES: [(&str, Method); 5] = [
    ("/feed", Method::Get),
    ("/status", Method::Get),
    ("/setTimer", Method::Post),
    ("/cancelTimer", Method::Get),
    ("/resetFeedCount", Method::Get),
];

/// Start the server.  The returned handle must be kept alive.
pub fn start() -> anyhow::Result<EspHttpServer<'static>> {
    let mut server = EspHttpServer::new(&Configuration::default())?;
    for (path, method) in ROUTES {
        let http_method = match method {
            Method::Get => HttpMethod::Get,
            Method::Post => HttpMethod::Post,
        };
        server.fn_handler(path, http_method, move |req| handle(req, path, method))?;
    }
    info!("HTTP: listening ({} routes)", ROUTES.len());
    Ok(server)
}

fn handle(
    mut req: Request<&mut EspHttpConnection<'_>>,
    path: &'static str,
    method: Method,
) -> anyhow::Result<()> {
    let body = match method {
        Method::Post => Some(read_body(&mut req)?),
        Method::Get => None,
    };

    let mut msg_path = heapless::String::new();
    // Route paths are compile-time constants well under the cap.
    let _ = msg_path.push_str(path);
    let request_id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
    let msg = RequestMsg {
        request_id,
        method,
        path: msg_path,
        body,
    };

    let response = if REQUEST_CHANNEL.try_send(msg).is_err() {
        warn!("HTTP: request queue full, rejecting {}", path);
        busy()
    } else {
        await_reply(request_id).unwrap_or_else(|| {
            warn!("HTTP: no reply for #{} ({}) in time", request_id, path);
            busy()
        })
    };

    let headers = [("Content-Type", response.content_type)];
    let mut resp = req.into_response(response.status, None, &headers)?;
    resp.write_all(response.body.as_bytes())?;
    Ok(())
}

/// Read up to [`BODY_CAP`] bytes; anything past that is discarded.
fn read_body(
    req: &mut Request<&mut EspHttpConnection<'_>>,
) -> anyhow::Result<heapless::Vec<u8, BODY_CAP>> {
    let mut out = heapless::Vec::new();
    let mut buf = [0u8; 64];
    loop {
        let n = req.read(&mut buf)?;
        if n == 0 {
            break;
        }
        let room = BODY_CAP - out.len();
        // extend_from_slice only fails past capacity, which `room` rules out.
        let _ = out.extend_from_slice(&buf[..n.min(room)]);
    }
    Ok(out)
}

fn await_reply(request_id: u32) -> Option<ApiResponse> {
    let deadline = Instant::now() + REPLY_TIMEOUT;
    while Instant::now() < deadline {
        match RESPONSE_CHANNEL.try_receive() {
            Ok(ResponseMsg {
                request_id: id,
                response,
            }) if id == request_id => return Some(response),
            // Stale reply to a handler that already timed out.
            Ok(stale) => warn!("HTTP: discarding stale reply #{}", stale.request_id),
            Err(_) => std::thread::sleep(REPLY_POLL),
        }
    }
    None
}

fn busy() -> ApiResponse {
    let mut body = heapless::String::new();
    let _ = body.push_str("Busy");
    ApiResponse {
        status: 503,
        content_type: "text/plain",
        body,
    }
}
