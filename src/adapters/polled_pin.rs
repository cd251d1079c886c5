//! Polled IR receiver pin, for inputs without interrupt capability.
//!
//! Wraps any `embedded_hal` [`InputPin`].  Call [`PolledPin::sample`] from a
//! timer tick at least every ~100 µs; each call records a transition only
//! when the level differs from the last recorded one.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::{EdgeHandler, EdgeSource};
use crate::capture::CircularLog;
use crate::error::EdgeError;
use crate::timing::PrecisionProfile;

pub struct PolledPin<P> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> PolledPin<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }

    /// Read the line once and record it into `log` if it changed.
    pub fn sample<T: PrecisionProfile, const N: usize>(&mut self, log: &CircularLog<T, N>, now: u32) {
        let mark = self.level_is_mark();
        log.record_edge_on_poll(mark, now);
    }

    fn level_is_mark(&mut self) -> bool {
        match self.pin.is_low() {
            Ok(low) => low == self.active_low,
            // Unreadable pin reads as idle.
            Err(_) => false,
        }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> EdgeSource for PolledPin<P> {
    fn attach(&mut self, pin: i32, _handler: EdgeHandler) -> Result<(), EdgeError> {
        warn!("polled_pin: GPIO {} has no interrupt, sample it instead", pin);
        Err(EdgeError::NoInterrupt { pin })
    }

    fn detach(&mut self) {}

    fn current_level_is_mark(&mut self) -> bool {
        self.level_is_mark()
    }
}
