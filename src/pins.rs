//! GPIO assignments for the IR receiver board.
//!
//! Single source of truth: every adapter references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// IR receiver (TSOP38238 or similar, 38 kHz, open-collector active-low)
// ---------------------------------------------------------------------------

/// Receiver output.  Idles HIGH via pull-up, pulled LOW while carrier is seen.
pub const IR_RECEIVER_GPIO: i32 = 4;

/// Number of GPIOs on the ESP32-S3; every one of them can raise an
/// interrupt through the GPIO ISR service.
pub const GPIO_PIN_COUNT: i32 = 49;
