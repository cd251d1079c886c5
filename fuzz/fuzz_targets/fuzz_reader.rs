//! Fuzz target: `Reader::read`
//!
//! Interprets the input as a stream of edge timings and reads interleaved
//! with the edges.  Asserts that the reader never panics, never leaves the
//! log larger than it found it, and drains everything once the line has
//! been idle past the timeout.
//!
//! cargo fuzz run fuzz_reader

#![no_main]

use std::cell::Cell;

use irinput::app::ports::{Clock, NullSink};
use irinput::{CircularLog, Coarse, NecDecoder, Reader};
use libfuzzer_sys::fuzz_target;

struct FuzzClock(Cell<u32>);

impl Clock for FuzzClock {
    fn now_micros(&self) -> u32 {
        self.0.get()
    }
}

fuzz_target!(|data: &[u8]| {
    let log = CircularLog::<Coarse, 64>::new();
    let clock = FuzzClock(Cell::new(0));
    let mut reader = Reader::new();

    // Two bytes per edge: duration in 8 µs units, high bit of the first byte
    // asks for a read first, second-highest bit reports the level
    // explicitly (exercises missed-edge padding).
    for chunk in data.chunks_exact(2) {
        let raw = u16::from_le_bytes([chunk[0], chunk[1]]);
        if raw & 0x8000 != 0 {
            let before = log.size();
            reader.read(&log, &NecDecoder, &clock, &mut NullSink);
            assert!(log.size() <= before, "read grew the log");
        }
        let micros = u32::from(raw & 0x1FFF) * 8;
        clock.0.set(clock.0.get().wrapping_add(micros));
        let mark = if raw & 0x4000 != 0 {
            raw & 0x2000 != 0
        } else {
            !log.next_write_is_mark()
        };
        log.record_edge_on_change(mark, clock.0.get());
        assert!(log.size() < log.capacity());
    }

    clock.0.set(clock.0.get().wrapping_add(reader.timeout_micros()));
    for _ in 0..=log.capacity() {
        if log.is_empty() {
            break;
        }
        reader.read(&log, &NecDecoder, &clock, &mut NullSink);
    }
    assert!(log.is_empty(), "idle line left {} entries", log.size());
});
