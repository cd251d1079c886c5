//! IR receiver firmware, main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  GPIO ISR ──▶ IR_LOG (CircularLog, lock-free SPSC)            │
//! │                  │                                           │
//! │  ─────────────── │ ── Port Trait Boundary ─────────────────  │
//! │                  ▼                                           │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │ IrService (Reader · NecDecoder · held-key tracking)    │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │      │ IrEvent                      │ DiagnosticSink         │
//! │      ▼                              ▼                        │
//! │   log output                 LogSink + DecodeStats           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use anyhow::Result;
use esp_idf_svc::hal::delay::FreeRtos;
use log::{error, info};

use irinput::adapters::ir_pin::{self, IrPin};
use irinput::adapters::log_sink::LogSink;
use irinput::adapters::time::{self, MicrosClock};
use irinput::app::events::IrEvent;
use irinput::app::ports::{DiagnosticSink, EdgeSource};
use irinput::app::service::IrService;
use irinput::diagnostics::DecodeStats;
use irinput::{CircularLog, Coarse, DecodeOutcome, Frame, NecDecoder, ReaderConfig};

// ── ISR shared state ──────────────────────────────────────────

static IR_LOG: CircularLog<Coarse> = CircularLog::new();
static IR_GPIO: AtomicI32 = AtomicI32::new(irinput::pins::IR_RECEIVER_GPIO);
static IR_ACTIVE_LOW: AtomicBool = AtomicBool::new(true);

/// Runs in ISR context on every receiver level change.
fn on_ir_edge() {
    let mark = ir_pin::level_is_mark(
        IR_GPIO.load(Ordering::Relaxed),
        IR_ACTIVE_LOW.load(Ordering::Relaxed),
    );
    IR_LOG.record_edge_on_change(mark, time::now_micros());
}

// ── Diagnostics fan-out ───────────────────────────────────────

struct Diagnostics {
    log: LogSink,
    stats: DecodeStats,
}

impl DiagnosticSink for Diagnostics {
    fn decoded(&mut self, frame: &Frame, entries: &dyn fmt::Display) {
        self.log.decoded(frame, entries);
        self.stats.decoded(frame, entries);
    }

    fn resync(&mut self, cause: &DecodeOutcome, dropped: usize, entries: &dyn fmt::Display) {
        self.log.resync(cause, dropped, entries);
        self.stats.resync(cause, dropped, entries);
    }

    fn overflow(&mut self, total: u32) {
        self.log.overflow(total);
        self.stats.overflow(total);
    }
}

/// Stats line roughly once a minute.
const STATS_INTERVAL_MS: u32 = 60_000;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  IrInput v{}                          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = ReaderConfig::default();
    config.validate()?;

    IR_GPIO.store(config.ir_gpio, Ordering::Relaxed);
    IR_ACTIVE_LOW.store(config.receiver_active_low, Ordering::Relaxed);

    // ── 3. Receiver pin ───────────────────────────────────────
    let mut pin = IrPin::new(config.receiver_active_low);
    if let Err(e) = pin.attach(config.ir_gpio, on_ir_edge) {
        error!("IR pin setup failed: {}", e);
        return Err(e.into());
    }

    // ── 4. Service ────────────────────────────────────────────
    let clock = MicrosClock::new();
    let mut service = IrService::new(&config, NecDecoder::new());
    let mut diag = Diagnostics {
        log: LogSink::new(),
        stats: DecodeStats::new(),
    };

    info!(
        "System ready. Polling every {} ms (log capacity {}).",
        config.poll_interval_ms,
        IR_LOG.capacity()
    );

    // ── 5. Poll loop ──────────────────────────────────────────
    let stats_every = (STATS_INTERVAL_MS / config.poll_interval_ms).max(1);
    let mut ticks: u32 = 0;

    loop {
        FreeRtos::delay_ms(config.poll_interval_ms);

        // Drain everything decodable this tick.
        while let Some(event) = service.poll(&IR_LOG, &clock, &mut diag) {
            match event {
                IrEvent::Pressed { code, command: Some(cmd) } => {
                    info!("Key 0x{:08X}: address=0x{:04X} command=0x{:02X}", code, cmd.address, cmd.command);
                }
                IrEvent::Pressed { code, command: None } => {
                    info!("Key 0x{:08X} (non-NEC payload)", code);
                }
                IrEvent::Repeated { code, count } => {
                    info!("Key 0x{:08X} held (repeat {})", code, count);
                }
            }
        }

        ticks = ticks.wrapping_add(1);
        if ticks % stats_every == 0 {
            info!("IR stats: {}", diag.stats.summary());
        }
    }
}
