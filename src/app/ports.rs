//! Port traits: the boundary between the decode core and the outside world.
//!
//! ```text
//!   EdgeSource ──▶ CircularLog ──▶ Reader ──▶ DiagnosticSink
//!                                    ▲
//!                                  Clock
//! ```
//!
//! Adapters in [`crate::adapters`] implement these for the ESP32 and for
//! host simulation.  The core never touches hardware directly.

use core::fmt;

use crate::decode::{DecodeOutcome, Frame};
use crate::error::EdgeError;

// ───────────────────────────────────────────────────────────────
// Edge source (driving adapter: GPIO → capture log)
// ───────────────────────────────────────────────────────────────

/// Interrupt handler registered on a pin.  Plain `fn` because ISR
/// callbacks cannot capture closures.
pub type EdgeHandler = fn();

/// A pin that reports IR receiver level changes.
pub trait EdgeSource {
    /// Register `handler` to run on every level change of `pin`.
    ///
    /// Fails with [`EdgeError::NoInterrupt`] if the pin cannot raise
    /// interrupts.
    fn attach(&mut self, pin: i32, handler: EdgeHandler) -> Result<(), EdgeError>;

    /// Remove the handler.  No-op when nothing is attached.
    fn detach(&mut self);

    /// True while the receiver sees carrier.
    fn current_level_is_mark(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Free-running microsecond timer that wraps at `u32::MAX`.
pub trait Clock {
    fn now_micros(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Diagnostic sink (driven adapter: reader → logs / counters)
// ───────────────────────────────────────────────────────────────

/// Optional observer of the reader's decisions.  Never required for
/// correctness; every hook defaults to a no-op.
pub trait DiagnosticSink {
    /// A frame was decoded; `entries` dumps the consumed durations.
    fn decoded(&mut self, _frame: &Frame, _entries: &dyn fmt::Display) {}

    /// Entries were discarded to resynchronize after `cause`.
    fn resync(&mut self, _cause: &DecodeOutcome, _dropped: usize, _entries: &dyn fmt::Display) {}

    /// The capture log has dropped `total` entries since boot.
    fn overflow(&mut self, _total: u32) {}
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {}
