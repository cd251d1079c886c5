//! Interrupt-driven IR receiver pin.
//!
//! On the ESP32 the pin is configured as a pulled-up input with an
//! any-edge interrupt routed through the shared GPIO ISR service.  The
//! registered [`EdgeHandler`] runs in ISR context and is expected to call
//! [`CircularLog::record_edge_on_change`](crate::capture::CircularLog::record_edge_on_change)
//! with [`level_is_mark`] and the current timer value.
//!
//! On the host the pin is simulated: tests drive the line with
//! [`IrPin::set_level`], which invokes the handler exactly like the
//! hardware interrupt would.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
use log::{debug, info};

use crate::app::ports::{EdgeHandler, EdgeSource};
use crate::error::EdgeError;
use crate::pins;

/// Receiver input pin with a level-change interrupt.
pub struct IrPin {
    active_low: bool,
    attached: Option<(i32, EdgeHandler)>,
}

impl IrPin {
    /// `active_low` is true for demodulating receivers (TSOP38xx and the
    /// like) that pull the line low while carrier is present.
    pub fn new(active_low: bool) -> Self {
        Self {
            active_low,
            attached: None,
        }
    }

    /// GPIO the handler is attached to, if any.
    pub fn pin(&self) -> Option<i32> {
        self.attached.map(|(pin, _)| pin)
    }

    pub fn is_active_low(&self) -> bool {
        self.active_low
    }
}

impl Drop for IrPin {
    fn drop(&mut self) {
        self.detach();
    }
}

impl EdgeSource for IrPin {
    fn attach(&mut self, pin: i32, handler: EdgeHandler) -> Result<(), EdgeError> {
        if !(0..pins::GPIO_PIN_COUNT).contains(&pin) {
            return Err(EdgeError::NoInterrupt { pin });
        }
        if self.attached.is_some() {
            return Err(EdgeError::AlreadyAttached);
        }

        platform::enable(pin, handler)?;
        self.attached = Some((pin, handler));
        info!("ir_pin: GPIO {} attached (active_low={})", pin, self.active_low);
        Ok(())
    }

    fn detach(&mut self) {
        if let Some((pin, _)) = self.attached.take() {
            platform::disable(pin);
            debug!("ir_pin: GPIO {} detached", pin);
        }
    }

    fn current_level_is_mark(&mut self) -> bool {
        self.attached
            .is_some_and(|(pin, _)| level_is_mark(pin, self.active_low))
    }
}

/// True while `pin` reports carrier.
///
/// Safe to call from the edge handler.
#[inline]
pub fn level_is_mark(pin: i32, active_low: bool) -> bool {
    platform::level_is_high(pin) != active_low
}

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod platform {
    use super::*;

    /// ISR entry point; `arg` carries the registered [`EdgeHandler`].
    unsafe extern "C" fn edge_isr(arg: *mut core::ffi::c_void) {
        // SAFETY: `arg` was produced from an `EdgeHandler` in `enable()`;
        // fn pointers and data pointers share a representation on Xtensa
        // and RISC-V.
        let handler = unsafe { core::mem::transmute::<*mut core::ffi::c_void, EdgeHandler>(arg) };
        handler();
    }

    pub(super) fn enable(pin: i32, handler: EdgeHandler) -> Result<(), EdgeError> {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
        };

        // SAFETY: pin was range-checked by the caller; the ISR service is
        // idempotent and ESP_ERR_INVALID_STATE means it is already installed.
        unsafe {
            let ret = gpio_config(&cfg);
            if ret != ESP_OK as i32 {
                return Err(EdgeError::Platform(ret));
            }

            let ret = gpio_install_isr_service(0);
            if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
                return Err(EdgeError::Platform(ret));
            }

            let ret = gpio_isr_handler_add(pin, Some(edge_isr), handler as *mut core::ffi::c_void);
            if ret != ESP_OK as i32 {
                return Err(EdgeError::Platform(ret));
            }

            let ret = gpio_intr_enable(pin);
            if ret != ESP_OK as i32 {
                gpio_isr_handler_remove(pin);
                return Err(EdgeError::Platform(ret));
            }
        }
        Ok(())
    }

    pub(super) fn disable(pin: i32) {
        // SAFETY: pin had a handler registered by `enable()`.
        unsafe {
            gpio_intr_disable(pin);
            gpio_isr_handler_remove(pin);
        }
    }

    #[inline]
    pub(super) fn level_is_high(pin: i32) -> bool {
        // SAFETY: register read on a configured input; ISR-safe.
        (unsafe { gpio_get_level(pin) }) != 0
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod platform {
    use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    const PIN_COUNT: usize = pins::GPIO_PIN_COUNT as usize;

    /// Simulated line levels; idle HIGH like a pulled-up input.
    static LEVELS: [AtomicBool; PIN_COUNT] = [const { AtomicBool::new(true) }; PIN_COUNT];

    /// Registered handlers stored as raw fn addresses (0 = none).
    static HANDLERS: [AtomicUsize; PIN_COUNT] = [const { AtomicUsize::new(0) }; PIN_COUNT];

    pub(super) fn enable(pin: i32, handler: EdgeHandler) -> Result<(), EdgeError> {
        HANDLERS[pin as usize].store(handler as usize, Ordering::Release);
        Ok(())
    }

    pub(super) fn disable(pin: i32) {
        HANDLERS[pin as usize].store(0, Ordering::Release);
    }

    #[inline]
    pub(super) fn level_is_high(pin: i32) -> bool {
        usize::try_from(pin)
            .ok()
            .and_then(|i| LEVELS.get(i))
            .is_none_or(|level| level.load(Ordering::Acquire))
    }

    /// Drive the simulated line; fires the handler when the level changes.
    pub(super) fn drive(pin: i32, high: bool) {
        let i = pin as usize;
        if LEVELS[i].swap(high, Ordering::AcqRel) == high {
            return;
        }
        let raw = HANDLERS[i].load(Ordering::Acquire);
        if raw != 0 {
            // SAFETY: only `enable()` stores non-zero values, and those are
            // `EdgeHandler` addresses.
            let handler = unsafe { core::mem::transmute::<usize, EdgeHandler>(raw) };
            handler();
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl IrPin {
    /// Set the simulated electrical level of the attached pin.
    ///
    /// Runs the edge handler synchronously when the level changes.  No-op
    /// while detached.
    pub fn set_level(&self, high: bool) {
        if let Some(pin) = self.pin() {
            platform::drive(pin, high);
        }
    }

    /// Set the simulated line to carrier (`true`) or idle (`false`),
    /// honouring the receiver polarity.
    pub fn set_mark(&self, mark: bool) {
        self.set_level(mark != self.active_low);
    }
}
