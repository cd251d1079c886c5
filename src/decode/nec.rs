//! NEC pulse-distance decoder.
//!
//! ```text
//! Data frame:    [9000 mark][4500 space] 32 × ([562 mark][1687 | 562 space])
//! Repeat frame:  [9000 mark][2250 space]
//! ```
//!
//! Bits are accumulated MSB-first as they arrive.  The trailing stop-bit
//! mark is not part of the frame; the reader drops it on its next pass.

use super::{DecodeOutcome, Decoder, Frame, FrameKind, TimingView};
use crate::timing::PrecisionProfile;

pub const HEADER_MARK_US: u32 = 9000;
pub const HEADER_SPACE_US: u32 = 4500;
pub const REPEAT_SPACE_US: u32 = 2250;
pub const BIT_MARK_US: u32 = 562;
pub const ONE_SPACE_US: u32 = 1687;
pub const ZERO_SPACE_US: u32 = 562;

/// Payload bits in a data frame.
pub const DATA_BITS: usize = 32;

/// Entries in a data frame: header pair plus one pair per bit.
pub const DATA_FRAME_ENTRIES: usize = 2 + 2 * DATA_BITS;

/// Entries in a repeat frame.
pub const REPEAT_FRAME_ENTRIES: usize = 2;

/// Stateless NEC decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NecDecoder;

impl NecDecoder {
    pub const fn new() -> Self {
        Self
    }
}

impl<P: PrecisionProfile> Decoder<P> for NecDecoder {
    const NAME: &'static str = "NEC";

    fn decode<V: TimingView<P> + ?Sized>(&self, view: &V, available: usize) -> DecodeOutcome {
        // Frames start on a mark; skip a leading space.
        let mut at = usize::from(!view.next_unread_is_mark());

        if available <= at {
            return DecodeOutcome::InsufficientData { min_needed: at + 1 };
        }
        if !P::matches(view.peek(at), HEADER_MARK_US) {
            return DecodeOutcome::ParseError { at };
        }
        at += 1;

        if available <= at {
            return DecodeOutcome::InsufficientData { min_needed: at + 1 };
        }
        let gap = view.peek(at);
        if P::matches(gap, REPEAT_SPACE_US) {
            return DecodeOutcome::Decoded(Frame {
                kind: FrameKind::Repeat,
                consumed: at + 1,
                value: 0,
            });
        }
        if !P::matches(gap, HEADER_SPACE_US) {
            return DecodeOutcome::ParseError { at };
        }
        at += 1;

        let mut value: u32 = 0;
        for _ in 0..DATA_BITS {
            if available <= at {
                return DecodeOutcome::InsufficientData { min_needed: at + 1 };
            }
            if !P::matches(view.peek(at), BIT_MARK_US) {
                return DecodeOutcome::ParseError { at };
            }
            at += 1;

            if available <= at {
                return DecodeOutcome::InsufficientData { min_needed: at + 1 };
            }
            let space = view.peek(at);
            if P::matches(space, ONE_SPACE_US) {
                value = (value << 1) | 1;
            } else if P::matches(space, ZERO_SPACE_US) {
                value <<= 1;
            } else {
                return DecodeOutcome::ParseError { at };
            }
            at += 1;
        }

        DecodeOutcome::Decoded(Frame {
            kind: FrameKind::Data,
            consumed: at,
            value,
        })
    }
}

/// Address and command carried by an NEC code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NecCommand {
    /// 8-bit address for standard NEC, 16-bit for extended NEC.
    pub address: u16,
    pub command: u8,
}

impl NecCommand {
    /// Split a decoded code into address and command.
    ///
    /// NEC sends every byte LSB first, so the MSB-first code is
    /// bit-reversed before the bytes are picked apart.  Returns `None` when
    /// the command is not followed by its inverse.
    pub fn from_code(code: u32) -> Option<Self> {
        let [addr_lo, addr_hi, command, command_inv] = code.reverse_bits().to_le_bytes();

        if command ^ command_inv != 0xFF {
            return None;
        }

        let address = if addr_lo ^ addr_hi == 0xFF {
            u16::from(addr_lo)
        } else {
            u16::from_le_bytes([addr_lo, addr_hi])
        };

        Some(Self { address, command })
    }

    /// Inverse of [`from_code`](Self::from_code) for standard (8-bit) addresses.
    pub fn to_code(address: u8, command: u8) -> u32 {
        u32::from_le_bytes([address, !address, command, !command]).reverse_bits()
    }
}
