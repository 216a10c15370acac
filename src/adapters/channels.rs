//! Inter-task request channels.
//!
//! Uses `embassy-sync` bounded channels to bridge the HTTP server task
//! with the synchronous control loop.  The control loop is the only owner
//! of the [`FeederService`]; the server task never touches it directly.
//!
//! ```text
//! ┌──────────────┐  RequestMsg  ┌──────────────┐
//! │  HTTP task   │────────────▶│  Control Loop │
//! │              │◀────────────│  (sync)       │
//! └──────────────┘  ResponseMsg └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::Channel;
use heapless::{String, Vec};
use log::warn;

use super::web_api::{self, ApiRequest, ApiResponse, Method};
use crate::app::ports::{ActuatorPort, EventSink};
use crate::app::service::FeederService;

/// Longest request path carried over the channel.
pub const PATH_CAP: usize = 32;
/// Largest request body carried over the channel.
pub const BODY_CAP: usize = 256;

/// Channel depth for inbound requests.
const REQ_DEPTH: usize = 4;
/// Channel depth for outbound responses.
const RESP_DEPTH: usize = 4;

/// Inbound request from the HTTP task.
#[derive(Debug, Clone)]
pub struct RequestMsg {
    /// Opaque tag the HTTP task uses to pair the response with its socket.
    pub request_id: u32,
    pub method: Method,
    pub path: String<PATH_CAP>,
    pub body: Option<Vec<u8, BODY_CAP>>,
}

impl RequestMsg {
    /// Borrow as an [`ApiRequest`] for dispatch.
    pub fn as_request(&self) -> ApiRequest<'_> {
        ApiRequest {
            method: self.method,
            path: self.path.as_str(),
            body: self.body.as_deref(),
        }
    }
}

/// Outbound response to the HTTP task.
#[derive(Debug, Clone)]
pub struct ResponseMsg {
    pub request_id: u32,
    pub response: ApiResponse,
}

pub type RequestChannel<M> = Channel<M, RequestMsg, REQ_DEPTH>;
pub type ResponseChannel<M> = Channel<M, ResponseMsg, RESP_DEPTH>;

/// Inbound request channel: HTTP task → control loop.
pub static REQUEST_CHANNEL: RequestChannel<CriticalSectionRawMutex> = Channel::new();

/// Outbound response channel: control loop → HTTP task.
pub static RESPONSE_CHANNEL: ResponseChannel<CriticalSectionRawMutex> = Channel::new();

/// Drain every queued request, dispatching each against `app`.
///
/// Non-blocking.  Returns the number of requests served.  A response that
/// does not fit in `responses` is dropped with a warning; the HTTP task
/// times the request out.
pub fn serve_pending<M: RawMutex>(
    requests: &RequestChannel<M>,
    responses: &ResponseChannel<M>,
    app: &mut FeederService,
    now_ms: u64,
    hw: &mut impl ActuatorPort,
    sink: &mut impl EventSink,
) -> usize {
    let mut served = 0;
    while let Ok(msg) = requests.try_receive() {
        let response = web_api::dispatch(app, &msg.as_request(), now_ms, hw, sink);
        let out = ResponseMsg {
            request_id: msg.request_id,
            response,
        };
        if responses.try_send(out).is_err() {
            warn!("channels: response queue full, dropping reply to #{}", msg.request_id);
        }
        served += 1;
    }
    served
}
