//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements    | Connects to                     |
//! |---------------|---------------|---------------------------------|
//! | `hardware`    | ActuatorPort  | Feed motor GPIO + clock         |
//! | `log_sink`    | EventSink     | Serial log output               |
//! | `time`        | ClockPort     | ESP32 system timer / `Instant`  |
//! | `web_api`     | —             | HTTP-shaped request decoding    |
//! | `channels`    | —             | HTTP task ⇄ control loop queues |
//! | `http_server` | —             | ESP-IDF httpd (device only)     |

pub mod channels;
pub mod hardware;
#[cfg(all(feature = "espidf", target_os = "espidf"))]
pub mod http_server;
pub mod log_sink;
pub mod time;
pub mod web_api;
