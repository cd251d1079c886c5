//! Decode statistics.
//!
//! [`DecodeStats`] is a [`DiagnosticSink`] that counts what the reader did
//! and keeps the last few outcomes in a fixed-size history, for a status
//! command or a periodic log line.  No heap, so it can sit in a `static`.

use core::fmt;

use heapless::HistoryBuffer;
use serde::{Deserialize, Serialize};

use crate::app::ports::DiagnosticSink;
use crate::decode::{DecodeOutcome, Frame, FrameKind};

/// Outcomes retained by [`DecodeStats::recent`].
pub const HISTORY_LEN: usize = 8;

#[derive(Default)]
pub struct DecodeStats {
    summary: StatsSummary,
    history: HistoryBuffer<DecodeOutcome, HISTORY_LEN>,
}

/// Plain counters, serializable for transport or persistence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub data_frames: u32,
    pub repeat_frames: u32,
    /// Resyncs caused by a timing violation.
    pub parse_resyncs: u32,
    /// Resyncs caused by a frame that stalled past the timeout.
    pub timeout_resyncs: u32,
    /// Entries discarded by all resyncs.
    pub dropped_entries: u32,
    /// Capture log overflow total, as last reported.
    pub overflows: u32,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> StatsSummary {
        self.summary
    }

    /// Last outcomes, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &DecodeOutcome> {
        self.history.oldest_ordered()
    }

    pub fn last(&self) -> Option<&DecodeOutcome> {
        self.history.recent()
    }

    pub fn reset(&mut self) {
        self.summary = StatsSummary::default();
        self.history.clear();
    }
}

impl DiagnosticSink for DecodeStats {
    fn decoded(&mut self, frame: &Frame, _entries: &dyn fmt::Display) {
        match frame.kind {
            FrameKind::Data => self.summary.data_frames = self.summary.data_frames.wrapping_add(1),
            FrameKind::Repeat => self.summary.repeat_frames = self.summary.repeat_frames.wrapping_add(1),
        }
        self.history.write(DecodeOutcome::Decoded(*frame));
    }

    fn resync(&mut self, cause: &DecodeOutcome, dropped: usize, _entries: &dyn fmt::Display) {
        let s = &mut self.summary;
        match cause {
            DecodeOutcome::ParseError { .. } => s.parse_resyncs = s.parse_resyncs.wrapping_add(1),
            _ => s.timeout_resyncs = s.timeout_resyncs.wrapping_add(1),
        }
        s.dropped_entries = s.dropped_entries.wrapping_add(dropped as u32);
        self.history.write(*cause);
    }

    fn overflow(&mut self, total: u32) {
        self.summary.overflows = total;
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data={} repeat={} resync(parse={} timeout={}) dropped={} overflow={}",
            self.data_frames,
            self.repeat_frames,
            self.parse_resyncs,
            self.timeout_resyncs,
            self.dropped_entries,
            self.overflows
        )
    }
}
