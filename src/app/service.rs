//! Receiver service: turns decoded frames into key events.
//!
//! [`IrService`] owns the [`Reader`] and the decoder.  The main loop calls
//! [`poll`](IrService::poll) at `poll_interval_ms`; everything it needs
//! (capture log, clock, diagnostic sink) is injected at the call site so the
//! service runs unchanged against mocks on the host.
//!
//! ```text
//!  CircularLog ──▶ ┌──────────────────────┐ ──▶ IrEvent
//!        Clock ──▶ │      IrService       │
//!                  │  Reader · Decoder    │ ──▶ DiagnosticSink
//!                  └──────────────────────┘
//! ```

use log::{debug, info};

use crate::capture::CircularLog;
use crate::config::ReaderConfig;
use crate::decode::{DecodeOutcome, Decoder, FrameKind, NecCommand};
use crate::reader::Reader;
use crate::timing::PrecisionProfile;

use super::events::IrEvent;
use super::ports::{Clock, DiagnosticSink};

/// Key currently held down, tracked to attribute repeat frames.
#[derive(Debug, Clone, Copy)]
struct HeldKey {
    code: u32,
    repeats: u16,
    last_frame_at: u32,
}

pub struct IrService<D> {
    reader: Reader,
    decoder: D,
    repeat_window_micros: u32,
    held: Option<HeldKey>,
}

impl<D> IrService<D> {
    pub fn new(config: &ReaderConfig, decoder: D) -> Self {
        info!(
            "IR service: timeout={}us repeat_window={}us",
            config.timeout_micros, config.repeat_window_micros
        );
        Self {
            reader: Reader::with_timeout(config.timeout_micros),
            decoder,
            repeat_window_micros: config.repeat_window_micros,
            held: None,
        }
    }

    /// Decode whatever is buffered and report at most one key event.
    pub fn poll<P, C, S, const N: usize>(
        &mut self,
        log: &CircularLog<P, N>,
        clock: &C,
        sink: &mut S,
    ) -> Option<IrEvent>
    where
        P: PrecisionProfile,
        D: Decoder<P>,
        C: Clock + ?Sized,
        S: DiagnosticSink + ?Sized,
    {
        let DecodeOutcome::Decoded(frame) = self.reader.read(log, &self.decoder, clock, sink)
        else {
            return None;
        };
        let now = clock.now_micros();

        match frame.kind {
            FrameKind::Data => {
                self.held = Some(HeldKey {
                    code: frame.value,
                    repeats: 0,
                    last_frame_at: now,
                });
                Some(IrEvent::Pressed {
                    code: frame.value,
                    command: NecCommand::from_code(frame.value),
                })
            }
            FrameKind::Repeat => {
                let window = self.repeat_window_micros;
                if let Some(key) = self
                    .held
                    .as_mut()
                    .filter(|k| now.wrapping_sub(k.last_frame_at) <= window)
                {
                    key.repeats = key.repeats.saturating_add(1);
                    key.last_frame_at = now;
                    return Some(IrEvent::Repeated {
                        code: key.code,
                        count: key.repeats,
                    });
                }
                debug!("IR | repeat without a held key, ignored");
                self.held = None;
                None
            }
        }
    }

    /// Code of the key currently considered held, if any.
    pub fn held_code(&self) -> Option<u32> {
        self.held.map(|k| k.code)
    }

    /// Forget the held key (e.g. after the caller handled a long press).
    pub fn release(&mut self) {
        self.held = None;
    }

    pub fn reader(&self) -> &Reader {
        &self.reader
    }
}
