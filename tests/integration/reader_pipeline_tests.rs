//! Reader integration tests: synthesized transmissions through the capture
//! log, the NEC decoder and the resync logic together.

use irinput::decode::nec::NecCommand;
use irinput::{CircularLog, Coarse, DecodeOutcome, Fine, Frame, FrameKind, NecDecoder, Reader};

use crate::mock_edge::{FakeClock, RecordingSink, SinkCall, nec_data, nec_repeat, play};

fn data(consumed: usize, value: u32) -> DecodeOutcome {
    DecodeOutcome::Decoded(Frame {
        kind: FrameKind::Data,
        consumed,
        value,
    })
}

#[test]
fn press_then_hold_decodes_data_then_repeat() {
    let log = CircularLog::<Coarse>::new();
    let clock = FakeClock::new();
    let mut reader = Reader::new();
    let mut sink = RecordingSink::new();
    let code = NecCommand::to_code(0x04, 0x08);

    play(&log, &clock, &nec_data(30_000, code));
    assert_eq!(reader.read(&log, &NecDecoder, &clock, &mut sink), data(67, code));
    // Only the stop mark is left.
    assert_eq!(log.size(), 1);

    // Stop mark cannot start a frame; it is dropped right away.
    assert_eq!(
        reader.read(&log, &NecDecoder, &clock, &mut sink),
        DecodeOutcome::InsufficientData { min_needed: 2 }
    );
    assert!(log.is_empty());

    play(&log, &clock, &nec_repeat(40_000));
    assert_eq!(
        reader.read(&log, &NecDecoder, &clock, &mut sink),
        DecodeOutcome::Decoded(Frame {
            kind: FrameKind::Repeat,
            consumed: 3,
            value: 0,
        })
    );

    assert_eq!(
        sink.calls[..2],
        [
            SinkCall::Decoded(Frame {
                kind: FrameKind::Data,
                consumed: 67,
                value: code,
            }),
            SinkCall::Resync {
                cause: DecodeOutcome::ParseError { at: 0 },
                dropped: 1,
            },
        ]
    );
}

#[test]
fn garbage_before_frame_is_skipped_in_one_read() {
    let log = CircularLog::<Coarse>::new();
    let clock = FakeClock::new();
    let mut reader = Reader::new();
    let mut sink = RecordingSink::new();

    // Space, mark, space, mark of noise, then a real transmission.
    play(&log, &clock, &[30_000, 300, 700, 1_200]);
    play(&log, &clock, &nec_data(20_000, 0x00FF_00FF));

    assert_eq!(
        reader.read(&log, &NecDecoder, &clock, &mut sink),
        data(66, 0x00FF_00FF)
    );
    assert_eq!(
        sink.calls[0],
        SinkCall::Resync {
            cause: DecodeOutcome::ParseError { at: 1 },
            dropped: 5,
        }
    );
}

#[test]
fn stalled_frame_is_dropped_after_timeout() {
    let log = CircularLog::<Coarse>::new();
    let clock = FakeClock::new();
    let mut reader = Reader::new();
    let mut sink = RecordingSink::new();

    let frame = nec_data(30_000, 0xDEAD_BEEF);
    play(&log, &clock, &frame[..20]);

    assert_eq!(
        reader.read(&log, &NecDecoder, &clock, &mut sink),
        DecodeOutcome::InsufficientData { min_needed: 21 }
    );
    assert_eq!(log.size(), 20);
    assert!(sink.calls.is_empty());

    clock.advance(20_000);
    reader.read(&log, &NecDecoder, &clock, &mut sink);
    assert!(log.is_empty());
    assert_eq!(
        sink.calls,
        [SinkCall::Resync {
            cause: DecodeOutcome::InsufficientData { min_needed: 21 },
            dropped: 20,
        }]
    );

    // A complete transmission afterwards decodes normally.
    play(&log, &clock, &nec_data(30_000, 0xDEAD_BEEF));
    assert_eq!(
        reader.read(&log, &NecDecoder, &clock, &mut sink),
        data(67, 0xDEAD_BEEF)
    );
}

#[test]
fn overflow_is_reported_once_and_recovered_from() {
    let log = CircularLog::<Coarse, 16>::new();
    let clock = FakeClock::new();
    let mut reader = Reader::new();
    let mut sink = RecordingSink::new();

    play(&log, &clock, &nec_data(30_000, 0x1234_5678));
    assert_eq!(log.size(), 15);
    assert_eq!(log.overflow_count(), 68 - 15);

    reader.read(&log, &NecDecoder, &clock, &mut sink);
    clock.advance(20_000);
    reader.read(&log, &NecDecoder, &clock, &mut sink);

    let overflows: Vec<_> = sink
        .calls
        .iter()
        .filter(|c| matches!(c, SinkCall::Overflow(_)))
        .collect();
    assert_eq!(overflows, [&SinkCall::Overflow(53)]);
    assert!(log.is_empty());
    assert_eq!(sink.dropped(), 15);
}

#[test]
fn fine_profile_dumps_microseconds() {
    let log = CircularLog::<Fine, 256>::new();
    let clock = FakeClock::starting_at(u32::MAX - 40_000);
    let mut reader = Reader::new();
    let mut sink = RecordingSink::new();

    // The timer wraps during the header space.  The lead-in gap is measured
    // from boot and saturates.
    play(&log, &clock, &nec_data(30_000, 0xA1B2_C3D4));
    assert_eq!(
        reader.read(&log, &NecDecoder, &clock, &mut sink),
        data(67, 0xA1B2_C3D4)
    );
    assert!(sink.dumps[0].starts_with("size=67 -65535 +9000 -4500 +562 -1687"));
}
