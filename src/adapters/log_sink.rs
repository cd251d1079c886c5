//! Log-based diagnostic sink adapter.
//!
//! Implements [`DiagnosticSink`] by writing reader decisions to the `log`
//! facade (UART / USB-CDC in production, `env`-style loggers on the host).

use core::fmt;

use log::{debug, info, warn};

use crate::app::ports::DiagnosticSink;
use crate::decode::{DecodeOutcome, Frame, FrameKind};

/// Adapter that logs every decode boundary.
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for LogSink {
    fn decoded(&mut self, frame: &Frame, entries: &dyn fmt::Display) {
        match frame.kind {
            FrameKind::Data => info!("IR | code=0x{:08X} len={} | {}", frame.value, frame.consumed, entries),
            FrameKind::Repeat => debug!("IR | repeat len={} | {}", frame.consumed, entries),
        }
    }

    fn resync(&mut self, cause: &DecodeOutcome, dropped: usize, entries: &dyn fmt::Display) {
        debug!("IR | decoder said: {} | dropped {}: {}", cause, dropped, entries);
    }

    fn overflow(&mut self, total: u32) {
        warn!("IR | capture log overflow, {} entries dropped since boot", total);
    }
}
