//! Decode-and-resynchronize loop over the capture log.
//!
//! The reader runs in the main loop.  Each call:
//!
//! 1. Snapshots the idle time and buffered size with the ISR excluded.
//! 2. Runs the decoder on the buffered prefix.
//! 3. Consumes a decoded frame, or waits while a frame may still complete,
//!    or drops entries up to the next long space and tries again.
//!
//! Step 3 never drops data that could still finish a pending frame: an
//! incomplete frame is only discarded once the transmitter has been silent
//! for longer than the timeout.

use crate::app::ports::{Clock, DiagnosticSink};
use crate::capture::CircularLog;
use crate::decode::{DecodeOutcome, Decoder};
use crate::timing::PrecisionProfile;

/// Default silence that ends a frame.  Longer than any NEC inter-symbol gap
/// (4500 µs + 25 %), shorter than the 40 ms gap between frames.
pub const DEFAULT_TIMEOUT_MICROS: u32 = 16_000;

/// Drives a [`Decoder`] over a [`CircularLog`].
#[derive(Debug, Clone)]
pub struct Reader {
    timeout_micros: u32,
    /// Overflow count already reported to the sink.
    seen_overflows: u32,
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader {
    pub const fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_MICROS)
    }

    pub const fn with_timeout(timeout_micros: u32) -> Self {
        Self {
            timeout_micros,
            seen_overflows: 0,
        }
    }

    pub fn timeout_micros(&self) -> u32 {
        self.timeout_micros
    }

    /// Try to decode the next frame.
    ///
    /// Returns [`DecodeOutcome::Decoded`] after consuming the frame, the
    /// decoder's `InsufficientData` while a frame is still arriving, or the
    /// last outcome when nothing more can be consumed.
    pub fn read<P, D, C, S, const N: usize>(
        &mut self,
        log: &CircularLog<P, N>,
        decoder: &D,
        clock: &C,
        sink: &mut S,
    ) -> DecodeOutcome
    where
        P: PrecisionProfile,
        D: Decoder<P>,
        C: Clock + ?Sized,
        S: DiagnosticSink + ?Sized,
    {
        let (idle, mut n, overflows) = critical_section::with(|_| {
            let now = clock.now_micros();
            (log.idle_since(now), log.size(), log.overflow_count())
        });

        if overflows != self.seen_overflows {
            self.seen_overflows = overflows;
            sink.overflow(overflows);
        }

        if n == 0 {
            return DecodeOutcome::Empty;
        }

        let min_gap = P::micros_to_ticks(self.timeout_micros);

        loop {
            let outcome = decoder.decode(log, n);

            match outcome {
                DecodeOutcome::Decoded(frame) => {
                    sink.decoded(&frame, &log.entries(frame.consumed));
                    log.consume(frame.consumed);
                    return outcome;
                }
                DecodeOutcome::InsufficientData { .. } if idle < self.timeout_micros => {
                    return outcome;
                }
                _ => {}
            }

            let dropped = Self::resync_len(log, n, min_gap);
            if dropped == 0 {
                return outcome;
            }
            sink.resync(&outcome, dropped, &log.entries(dropped));
            log.consume(dropped);
            n -= dropped;
        }
    }

    /// Entries to drop so the log restarts after the next long space.
    ///
    /// Only spaces are examined, skipping the first unread entry: a mark
    /// cannot be an inter-frame gap, and a leading space is the gap the
    /// current attempt already started from.
    fn resync_len<P: PrecisionProfile, const N: usize>(
        log: &CircularLog<P, N>,
        n: usize,
        min_gap: P::Ticks,
    ) -> usize {
        let first_space = if log.next_unread_is_mark() { 1 } else { 2 };
        (first_space..n)
            .step_by(2)
            .find(|&i| log.peek(i) >= min_gap)
            .map_or(n, |i| i + 1)
    }
}
