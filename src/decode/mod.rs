//! Protocol decoders and the outcome type they share.
//!
//! A decoder is a pure function over the unread prefix of the capture log.
//! It never mutates the log; the [`Reader`](crate::reader::Reader) decides
//! what to consume based on the returned [`DecodeOutcome`].

pub mod nec;

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::timing::PrecisionProfile;

pub use nec::{NecCommand, NecDecoder};

/// Read-only access to buffered durations, starting at the read cursor.
pub trait TimingView<P: PrecisionProfile> {
    /// Entry `i` counted from the oldest unread one.
    fn peek(&self, i: usize) -> P::Ticks;

    /// Whether entry 0 is a mark.
    fn next_unread_is_mark(&self) -> bool;
}

/// A [`TimingView`] over a plain slice, for decoding outside the live log.
#[derive(Debug, Clone, Copy)]
pub struct SliceView<'a, P: PrecisionProfile> {
    entries: &'a [P::Ticks],
    first_is_mark: bool,
}

impl<'a, P: PrecisionProfile> SliceView<'a, P> {
    pub fn new(entries: &'a [P::Ticks], first_is_mark: bool) -> Self {
        Self {
            entries,
            first_is_mark,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: PrecisionProfile> TimingView<P> for SliceView<'_, P> {
    fn peek(&self, i: usize) -> P::Ticks {
        self.entries[i]
    }

    fn next_unread_is_mark(&self) -> bool {
        self.first_is_mark
    }
}

/// A protocol decoder.
pub trait Decoder<P: PrecisionProfile> {
    /// Protocol name for diagnostics.
    const NAME: &'static str;

    /// Try to decode one frame from the first `available` entries of `view`.
    ///
    /// Must only peek at indices `< available`.
    fn decode<V: TimingView<P> + ?Sized>(&self, view: &V, available: usize) -> DecodeOutcome;
}

/// Frame classes a decoder can recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameKind {
    /// A full frame carrying a 32-bit payload.
    Data,
    /// A short "key still held" frame without payload.
    Repeat,
}

/// A successfully decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub kind: FrameKind,
    /// Entries from the read cursor that belong to this frame.
    pub consumed: usize,
    /// Payload, MSB-first as received.  Zero for repeats.
    pub value: u32,
}

/// Result of one decode attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecodeOutcome {
    /// Nothing buffered.
    #[default]
    Empty,
    /// A frame may still complete; `min_needed` entries would settle it.
    InsufficientData { min_needed: usize },
    /// Entry `at` breaks the protocol's timing rules.
    ParseError { at: usize },
    Decoded(Frame),
}

impl DecodeOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }

    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Self::Decoded(frame) => Some(frame),
            _ => None,
        }
    }

    /// Short tag for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::InsufficientData { .. } => "InsufficientData",
            Self::ParseError { .. } => "ParseError",
            Self::Decoded(Frame {
                kind: FrameKind::Data,
                ..
            }) => "Data",
            Self::Decoded(Frame {
                kind: FrameKind::Repeat,
                ..
            }) => "Repeat",
        }
    }
}

impl fmt::Display for DecodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::InsufficientData { min_needed } => {
                write!(f, "InsufficientData, need={min_needed}")
            }
            Self::ParseError { at } => write!(f, "ParseError, at={at}"),
            Self::Decoded(frame) => write!(
                f,
                "{}, length={}, value=0x{:08X}",
                self.label(),
                frame.consumed,
                frame.value
            ),
        }
    }
}
