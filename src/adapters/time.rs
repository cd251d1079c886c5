//! Microsecond clock adapter.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` (64-bit,
//!   monotonic) truncated to the wrapping 32-bit counter the capture log
//!   expects.
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.

use crate::app::ports::Clock;

/// Clock for the ESP32-S3 platform.
pub struct MicrosClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MicrosClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MicrosClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

/// Microseconds since boot, wrapping every ~71.6 minutes.
///
/// Free function so ISR handlers can stamp edges without a clock instance.
#[cfg(target_os = "espidf")]
#[inline]
pub fn now_micros() -> u32 {
    // SAFETY: esp_timer_get_time reads a hardware counter; ISR-safe.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u32
}

impl Clock for MicrosClock {
    #[cfg(target_os = "espidf")]
    fn now_micros(&self) -> u32 {
        now_micros()
    }

    #[cfg(not(target_os = "espidf"))]
    fn now_micros(&self) -> u32 {
        self.start.elapsed().as_micros() as u32
    }
}
