//! HTTP-shaped request adapter.
//!
//! Maps `(method, path, body)` onto [`FeederCommand`]s and the status query,
//! and renders replies in the wire format the feeder's web page expects.
//! The socket side (listener, parsing of the HTTP framing) belongs to the
//! transport; this module only sees decoded requests.
//!
//! | Method | Path              | Maps to                     |
//! |--------|-------------------|-----------------------------|
//! | GET    | `/feed`           | `FeederCommand::FeedNow`    |
//! | GET    | `/status`         | `FeederService::status`     |
//! | POST   | `/setTimer`       | `FeederCommand::ArmTimer`   |
//! | GET    | `/cancelTimer`    | `FeederCommand::CancelTimer`|
//! | GET    | `/resetFeedCount` | `FeederCommand::ResetFeedCount` |

use core::fmt::Write as _;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::commands::FeederCommand;
use crate::app::ports::{ActuatorPort, EventSink};
use crate::app::service::FeederService;
use crate::controller::Snapshot;
use crate::error::{Error, InputError};
use crate::fsm::MotorState;

/// Capacity of a rendered response body.
pub const RESPONSE_CAP: usize = 256;

const TEXT: &str = "text/plain";
const JSON: &str = "application/json";

// ───────────────────────────────────────────────────────────────
// Requests and responses
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A decoded request as handed over by the transport.
#[derive(Debug, Clone, Copy)]
pub struct ApiRequest<'a> {
    pub method: Method,
    /// Request target; any `?query` suffix is ignored.
    pub path: &'a str,
    pub body: Option<&'a [u8]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: heapless::String<RESPONSE_CAP>,
}

impl ApiResponse {
    /// Build a response, truncating `body` at a char boundary if it does
    /// not fit.
    fn new(status: u16, content_type: &'static str, body: &str) -> Self {
        let mut out = heapless::String::new();
        for ch in body.chars() {
            if out.push(ch).is_err() {
                break;
            }
        }
        Self {
            status,
            content_type,
            body: out,
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self::new(status, TEXT, body)
    }
}

/// What a request resolves to once decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route {
    Command(FeederCommand),
    Status,
}

// ───────────────────────────────────────────────────────────────
// Status wire model
// ───────────────────────────────────────────────────────────────

/// JSON body of `GET /status`.  Timer fields are omitted when no timer
/// is armed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: &'static str,
    pub feed_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeats: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_forever: Option<bool>,
}

impl From<&Snapshot> for StatusReport {
    fn from(s: &Snapshot) -> Self {
        let armed = s.timer_armed;
        Self {
            status: status_text(s),
            feed_count: s.feed_count,
            timer_seconds: armed.then_some(s.remaining_ms / 1_000),
            repeats: armed.then_some(s.repeats_remaining),
            repeat_forever: armed.then_some(s.repeat_forever),
        }
    }
}

/// Human-readable one-liner for the status page.
pub fn status_text(s: &Snapshot) -> &'static str {
    if s.motor_state == MotorState::Running {
        "Feeding in progress"
    } else if s.timer_armed {
        "Timer running"
    } else {
        "Ready to feed"
    }
}

// ───────────────────────────────────────────────────────────────
// `/setTimer` body
// ───────────────────────────────────────────────────────────────

/// A numeric field that the page may send as a number or as the raw
/// input-field string.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum NumberField {
    Number(f64),
    Text(String),
    #[default]
    Absent,
}

impl NumberField {
    fn value(&self, field: &'static str) -> Result<f64, InputError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) if s.trim().is_empty() => Ok(0.0),
            Self::Text(s) => s.trim().parse().map_err(|_| InputError::BadNumber(field)),
            Self::Absent => Ok(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetTimerBody {
    #[serde(default)]
    hours: NumberField,
    #[serde(default)]
    repeats: NumberField,
    #[serde(default)]
    repeat_forever: bool,
}

/// Decode a `/setTimer` JSON body into an `ArmTimer` command.
///
/// Any parseable `hours` value is passed through: huge, negative or
/// non-finite durations become a never- or immediately-expiring timer in
/// the controller.
pub fn decode_set_timer(body: &[u8]) -> Result<FeederCommand, Error> {
    let parsed: SetTimerBody =
        serde_json::from_slice(body).map_err(|_| InputError::MalformedJson)?;

    let hours = parsed.hours.value("hours")?;

    let repeats = parsed.repeats.value("repeats")?;
    if !(0.0..=f64::from(u32::MAX)).contains(&repeats) || repeats.fract() != 0.0 {
        return Err(InputError::OutOfRange("repeats").into());
    }

    Ok(FeederCommand::ArmTimer {
        hours,
        repeats: repeats as u32,
        repeat_forever: parsed.repeat_forever,
    })
}

// ───────────────────────────────────────────────────────────────
// Routing
// ───────────────────────────────────────────────────────────────

/// Resolve a request to a route.  `Ok(None)` means no such route.
pub fn decode_request(req: &ApiRequest<'_>) -> Result<Option<Route>, Error> {
    let path = req.path.split('?').next().unwrap_or_default();
    let route = match (req.method, path) {
        (Method::Get, "/feed") => Route::Command(FeederCommand::FeedNow),
        (Method::Get, "/status") => Route::Status,
        (Method::Get, "/cancelTimer") => Route::Command(FeederCommand::CancelTimer),
        (Method::Get, "/resetFeedCount") => Route::Command(FeederCommand::ResetFeedCount),
        (Method::Post, "/setTimer") => {
            let body = req
                .body
                .filter(|b| !b.is_empty())
                .ok_or(InputError::MissingBody)?;
            Route::Command(decode_set_timer(body)?)
        }
        _ => return Ok(None),
    };
    Ok(Some(route))
}

/// Serve one request against the service at `now_ms`.
pub fn dispatch(
    app: &mut FeederService,
    req: &ApiRequest<'_>,
    now_ms: u64,
    hw: &mut impl ActuatorPort,
    sink: &mut impl EventSink,
) -> ApiResponse {
    let route = match decode_request(req) {
        Ok(Some(route)) => route,
        Ok(None) => return ApiResponse::text(404, "Not found"),
        Err(e) => {
            warn!("web_api: rejected {:?} {}: {}", req.method, req.path, e);
            return bad_request(e);
        }
    };

    match route {
        Route::Status => render_status(&app.status(now_ms)),
        Route::Command(cmd) => {
            let reply = app.handle_command(cmd, now_ms, hw, sink);
            let mut body = heapless::String::<RESPONSE_CAP>::new();
            // Replies are short, fixed-format sentences.
            let _ = write!(body, "{reply}");
            ApiResponse {
                status: 200,
                content_type: TEXT,
                body,
            }
        }
    }
}

/// Render a snapshot as the `/status` JSON response.
pub fn render_status(s: &Snapshot) -> ApiResponse {
    match serde_json::to_string(&StatusReport::from(s)) {
        Ok(json) => ApiResponse::new(200, JSON, &json),
        Err(_) => ApiResponse::text(500, "Status encoding failed"),
    }
}

fn bad_request(e: Error) -> ApiResponse {
    match e {
        Error::Input(InputError::MissingBody) => {
            ApiResponse::text(400, "Bad Request: No data received")
        }
        Error::Input(InputError::MalformedJson) => ApiResponse::text(400, "Invalid JSON"),
        Error::Input(other) => {
            let mut body = heapless::String::<RESPONSE_CAP>::new();
            let _ = write!(body, "Bad Request: {other}");
            ApiResponse {
                status: 400,
                content_type: TEXT,
                body,
            }
        }
        _ => ApiResponse::text(500, "Internal error"),
    }
}
