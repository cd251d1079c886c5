//! Receiver configuration parameters
//!
//! All tunable parameters for the IR receiver.  Values can be persisted as a
//! compact `postcard` blob in caller-provided storage (NVS on target).

use serde::{Deserialize, Serialize};

use crate::decode::nec;
use crate::error::{Error, Result};
use crate::pins;
use crate::reader::DEFAULT_TIMEOUT_MICROS;

/// Longest legitimate silence inside an NEC frame: the header space at its
/// upper tolerance.  A frame timeout must exceed this.
pub const LONGEST_INTRA_FRAME_GAP_MICROS: u32 = nec::HEADER_SPACE_US * 5 / 4;

/// Upper bound for a serialized [`ReaderConfig`].
pub const MAX_CONFIG_BYTES: usize = 32;

/// Core receiver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    // --- Hardware ---
    /// GPIO connected to the IR receiver output
    pub ir_gpio: i32,
    /// Receiver output is low while carrier is present (TSOP-style modules)
    pub receiver_active_low: bool,

    // --- Decoding ---
    /// Silence (µs) after which a partial frame is abandoned
    pub timeout_micros: u32,
    /// Window (µs) after a frame within which a repeat still refers to it
    pub repeat_window_micros: u32,

    // --- Timing ---
    /// Main-loop read interval (milliseconds)
    pub poll_interval_ms: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            // Hardware
            ir_gpio: pins::IR_RECEIVER_GPIO,
            receiver_active_low: true,

            // Decoding
            timeout_micros: DEFAULT_TIMEOUT_MICROS,
            repeat_window_micros: 150_000, // NEC repeats every ~108 ms

            // Timing
            poll_interval_ms: 5,
        }
    }
}

impl ReaderConfig {
    /// Reject values that would break decoding.  Invalid values are never
    /// silently clamped.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_micros <= LONGEST_INTRA_FRAME_GAP_MICROS {
            return Err(Error::Config("timeout shorter than an NEC header space"));
        }
        if self.timeout_micros > u32::from(u16::MAX) {
            return Err(Error::Config("timeout not representable in ticks"));
        }
        if self.repeat_window_micros < self.timeout_micros {
            return Err(Error::Config("repeat window shorter than timeout"));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll interval must be non-zero"));
        }
        Ok(())
    }

    /// Serialize into `buf`; returns the used prefix.
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8]> {
        postcard::to_slice(self, buf).map_err(|_| Error::Config("config does not fit buffer"))
    }

    /// Deserialize and validate a stored blob.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self =
            postcard::from_bytes(bytes).map_err(|_| Error::Config("stored config corrupted"))?;
        config.validate()?;
        Ok(config)
    }
}
