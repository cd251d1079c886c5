//! Tick precision profiles.
//!
//! Edge durations are quantized before they are stored in the capture log so
//! the ISR writes a single small integer per transition.  Two profiles are
//! provided:
//!
//! | Profile  | Tick type | Resolution | Range              |
//! |----------|-----------|------------|--------------------|
//! | [`Coarse`] | `u8`    | 64 µs      | saturates at 16320 µs |
//! | [`Fine`]   | `u16`   | 1 µs       | capped at 65535 µs |
//!
//! Tolerance matching accepts an observed tick within `[¾, 5⁄4]` of the
//! expected duration.  The window is always derived from the expected value,
//! which is a constant at every call site, so the bounds fold at compile time.

use core::fmt::Debug;

/// Quantization and tolerance rules for stored durations.
pub trait PrecisionProfile {
    /// Stored representation of one duration.
    type Ticks: Copy + Ord + Debug;

    /// Zero-duration value, used for placeholder entries and initial slots.
    const ZERO: Self::Ticks;

    /// Short label for diagnostics.
    const NAME: &'static str;

    fn micros_to_ticks(micros: u32) -> Self::Ticks;

    fn ticks_to_micros(ticks: Self::Ticks) -> u32;

    /// True if `observed` lies within `[expected × 0.75, expected × 1.25]`.
    fn matches(observed: Self::Ticks, expected_micros: u32) -> bool;
}

/// 8-bit ticks of 64 µs.  Halves the buffer footprint; enough for NEC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coarse;

impl Coarse {
    /// First duration that no longer fits in a `u8` tick.
    pub const SATURATION_MICROS: u32 = 16_320;

    /// Round-to-nearest quantization without the saturation clamp.
    #[inline]
    const fn quantize_unclamped(micros: u32) -> u32 {
        (micros + 32) / 64
    }
}

impl PrecisionProfile for Coarse {
    type Ticks = u8;
    const ZERO: u8 = 0;
    const NAME: &'static str = "coarse";

    #[inline]
    fn micros_to_ticks(micros: u32) -> u8 {
        if micros >= Self::SATURATION_MICROS {
            u8::MAX
        } else {
            Self::quantize_unclamped(micros) as u8
        }
    }

    #[inline]
    fn ticks_to_micros(ticks: u8) -> u32 {
        u32::from(ticks) * 64
    }

    #[inline]
    fn matches(observed: u8, expected_micros: u32) -> bool {
        let lo = Self::quantize_unclamped(expected_micros * 3 / 4);
        let hi = Self::quantize_unclamped(expected_micros * 5 / 4);
        let observed = u32::from(observed);
        lo <= observed && observed <= hi
    }
}

/// 16-bit ticks of 1 µs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fine;

impl PrecisionProfile for Fine {
    type Ticks = u16;
    const ZERO: u16 = 0;
    const NAME: &'static str = "fine";

    #[inline]
    fn micros_to_ticks(micros: u32) -> u16 {
        micros.min(u32::from(u16::MAX)) as u16
    }

    #[inline]
    fn ticks_to_micros(ticks: u16) -> u32 {
        u32::from(ticks)
    }

    #[inline]
    fn matches(observed: u16, expected_micros: u32) -> bool {
        let observed = u32::from(observed);
        expected_micros * 3 / 4 <= observed && observed <= expected_micros * 5 / 4
    }
}
