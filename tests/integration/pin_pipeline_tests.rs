//! End-to-end: simulated GPIO edges through the edge handler, the static
//! capture log and the service, exactly as wired in firmware.

use std::sync::atomic::{AtomicU32, Ordering};

use irinput::adapters::ir_pin::{self, IrPin};
use irinput::app::events::IrEvent;
use irinput::app::ports::{Clock, EdgeSource, NullSink};
use irinput::app::service::IrService;
use irinput::decode::nec::{self, NecCommand};
use irinput::{CircularLog, Coarse, NecDecoder, ReaderConfig};

/// Clock backed by a static so the edge handler can read it.
struct SharedClock(&'static AtomicU32);

impl SharedClock {
    fn advance(&self, micros: u32) {
        self.0.fetch_add(micros, Ordering::Relaxed);
    }
}

impl Clock for SharedClock {
    fn now_micros(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Hold the current level for each duration, then toggle the line.
fn drive(pin: &IrPin, clock: &SharedClock, durations: &[u32]) {
    let mut mark = false;
    for &d in durations {
        clock.advance(d);
        mark = !mark;
        pin.set_mark(mark);
    }
}

fn nec_burst(value: u32) -> Vec<u32> {
    let mut d = vec![25_000, nec::HEADER_MARK_US, nec::HEADER_SPACE_US];
    for bit in (0..32).rev() {
        d.push(nec::BIT_MARK_US);
        d.push(if value >> bit & 1 == 1 { nec::ONE_SPACE_US } else { nec::ZERO_SPACE_US });
    }
    d.push(nec::BIT_MARK_US);
    d
}

// ── Interrupt-driven pin ──────────────────────────────────────

const IRQ_GPIO: i32 = 21;
static IRQ_LOG: CircularLog<Coarse> = CircularLog::new();
static IRQ_NOW: AtomicU32 = AtomicU32::new(0);

fn on_irq_edge() {
    IRQ_LOG.record_edge_on_change(ir_pin::level_is_mark(IRQ_GPIO, true), IRQ_NOW.load(Ordering::Relaxed));
}

#[test]
fn interrupt_pin_delivers_key_press_and_hold() {
    let clock = SharedClock(&IRQ_NOW);
    let config = ReaderConfig {
        ir_gpio: IRQ_GPIO,
        ..ReaderConfig::default()
    };
    let mut pin = IrPin::new(config.receiver_active_low);
    pin.attach(config.ir_gpio, on_irq_edge).unwrap();
    let mut service = IrService::new(&config, NecDecoder::new());

    let code = NecCommand::to_code(0x10, 0x2A);
    drive(&pin, &clock, &nec_burst(code));
    assert_eq!(
        service.poll(&IRQ_LOG, &clock, &mut NullSink),
        Some(IrEvent::Pressed {
            code,
            command: Some(NecCommand {
                address: 0x10,
                command: 0x2A
            }),
        })
    );

    // Repeat ~108 ms after the frame start.  The stale stop mark and the
    // gap are skipped in the same poll.
    drive(&pin, &clock, &[40_000, nec::HEADER_MARK_US, nec::REPEAT_SPACE_US, nec::BIT_MARK_US]);
    assert_eq!(
        service.poll(&IRQ_LOG, &clock, &mut NullSink),
        Some(IrEvent::Repeated { code, count: 1 })
    );
    assert_eq!(service.held_code(), Some(code));

    pin.detach();
}

// ── Polled pin ────────────────────────────────────────────────

mod polled {
    use std::cell::Cell;
    use std::convert::Infallible;

    use embedded_hal::digital::{ErrorType, InputPin};
    use irinput::adapters::polled_pin::PolledPin;

    use super::*;

    /// Active-low receiver output.
    struct Line<'a>(&'a Cell<bool>);

    impl ErrorType for Line<'_> {
        type Error = Infallible;
    }

    impl InputPin for Line<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0.get())
        }
    }

    static POLL_NOW: AtomicU32 = AtomicU32::new(0);

    #[test]
    fn polled_pin_samples_into_the_same_pipeline() {
        let log = CircularLog::<Coarse>::new();
        let clock = SharedClock(&POLL_NOW);
        let low = Cell::new(false);
        let mut pin = PolledPin::new(Line(&low), true);
        let mut service = IrService::new(&ReaderConfig::default(), NecDecoder::new());

        // Sample every 50 µs and once more right after each toggle.
        for d in nec_burst(0x00FF_A25D) {
            let mut left = d;
            while left > 0 {
                let step = left.min(50);
                clock.advance(step);
                left -= step;
                pin.sample(&log, clock.now_micros());
            }
            low.set(!low.get());
            pin.sample(&log, clock.now_micros());
        }

        match service.poll(&log, &clock, &mut NullSink) {
            Some(IrEvent::Pressed { code, .. }) => assert_eq!(code, 0x00FF_A25D),
            other => panic!("expected a key press, got {other:?}"),
        }
    }
}
