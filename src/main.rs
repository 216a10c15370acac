//! PetFeeder Firmware — Main Entry Point
//!
//! Hexagonal architecture with a cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   MonotonicClock   HTTP task   │
//! │  (ActuatorPort)    (EventSink)    (ClockPort)      (channels)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            FeederService (pure logic)                  │    │
//! │  │  Controller · Motor FSM · FeedTimer                    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::{info, warn};

use petfeeder::adapters::channels::{REQUEST_CHANNEL, RESPONSE_CHANNEL, serve_pending};
use petfeeder::adapters::hardware::HardwareAdapter;
use petfeeder::adapters::http_server;
use petfeeder::adapters::log_sink::LogEventSink;
use petfeeder::adapters::time::MonotonicClock;
use petfeeder::app::ports::ClockPort;
use petfeeder::app::service::FeederService;
use petfeeder::config::FeederConfig;
use petfeeder::drivers::motor::FeedMotor;

/// Station credentials, baked in at build time.
const WIFI_SSID: &str = match option_env!("PETFEEDER_WIFI_SSID") {
    Some(s) => s,
    None => "",
};
const WIFI_PASS: &str = match option_env!("PETFEEDER_WIFI_PASS") {
    Some(s) => s,
    None => "",
};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PetFeeder v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = FeederConfig::default();
    config.validate()?;

    // ── 2. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // Motor enable on GPIO5, driven low until the first feed.
    let motor_pin = PinDriver::output(peripherals.pins.gpio5)?;
    let clock = MonotonicClock::new();
    let mut hw = HardwareAdapter::new(FeedMotor::new(motor_pin), clock, &config);

    // ── 3. Network ────────────────────────────────────────────
    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: WIFI_SSID
            .try_into()
            .map_err(|_| anyhow!("WiFi SSID longer than 32 bytes"))?,
        password: WIFI_PASS
            .try_into()
            .map_err(|_| anyhow!("WiFi password longer than 64 bytes"))?,
        auth_method: if WIFI_PASS.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        },
        ..Default::default()
    }))?;
    wifi.start()?;
    match wifi.connect().and_then(|_| wifi.wait_netif_up()) {
        Ok(()) => match wifi.wifi().sta_netif().get_ip_info() {
            Ok(ip) => info!("WiFi: connected, ip={}", ip.ip),
            Err(e) => warn!("WiFi: connected, ip unknown ({})", e),
        },
        // Keep feeding on timers even without a network.
        Err(e) => warn!("WiFi: connect failed ({}), running offline", e),
    }
    let _server = http_server::start()?;

    // ── 4. Application service ────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut app = FeederService::new(config.clone());
    app.start(&mut sink);

    let tick = std::time::Duration::from_millis(u64::from(config.tick_interval_ms));

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        let now = clock.now_ms();
        serve_pending(&REQUEST_CHANNEL, &RESPONSE_CHANNEL, &mut app, now, &mut hw, &mut sink);
        app.tick(now, &mut hw, &mut sink);
        std::thread::sleep(tick);
    }
}
