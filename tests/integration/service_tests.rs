//! IrService integration tests: key press and hold tracking on top of the
//! reader, with mock timing and the statistics sink.

use irinput::app::events::IrEvent;
use irinput::app::ports::NullSink;
use irinput::app::service::IrService;
use irinput::decode::nec::NecCommand;
use irinput::diagnostics::DecodeStats;
use irinput::{CircularLog, Coarse, NecDecoder, ReaderConfig};

use crate::mock_edge::{FakeClock, nec_data, nec_repeat, play};

type Service = IrService<NecDecoder>;

fn service() -> Service {
    IrService::new(&ReaderConfig::default(), NecDecoder::new())
}

/// Poll until the log stops producing events.
fn drain(service: &mut Service, log: &CircularLog<Coarse>, clock: &FakeClock) -> Vec<IrEvent> {
    let mut events = Vec::new();
    for _ in 0..4 {
        if let Some(e) = service.poll(log, clock, &mut NullSink) {
            events.push(e);
        }
    }
    events
}

#[test]
fn press_and_hold_counts_repeats() {
    let log = CircularLog::<Coarse>::new();
    let clock = FakeClock::new();
    let mut svc = service();
    let code = NecCommand::to_code(0x00, 0x45);

    play(&log, &clock, &nec_data(30_000, code));
    assert_eq!(
        drain(&mut svc, &log, &clock),
        [IrEvent::Pressed {
            code,
            command: Some(NecCommand {
                address: 0,
                command: 0x45
            }),
        }]
    );

    for expected in 1..=3 {
        play(&log, &clock, &nec_repeat(96_000));
        assert_eq!(
            drain(&mut svc, &log, &clock),
            [IrEvent::Repeated { code, count: expected }]
        );
    }
    assert_eq!(svc.held_code(), Some(code));
}

#[test]
fn repeat_without_a_press_is_ignored() {
    let log = CircularLog::<Coarse>::new();
    let clock = FakeClock::new();
    let mut svc = service();

    play(&log, &clock, &nec_repeat(30_000));
    assert!(drain(&mut svc, &log, &clock).is_empty());
    assert_eq!(svc.held_code(), None);
}

#[test]
fn repeat_after_the_window_releases_the_key() {
    let log = CircularLog::<Coarse>::new();
    let clock = FakeClock::new();
    let mut svc = service();
    let code = NecCommand::to_code(0x01, 0x02);

    play(&log, &clock, &nec_data(30_000, code));
    assert_eq!(drain(&mut svc, &log, &clock).len(), 1);

    // Repeat arrives long after the window closed.
    play(&log, &clock, &nec_repeat(400_000));
    assert!(drain(&mut svc, &log, &clock).is_empty());
    assert_eq!(svc.held_code(), None);

    // And the next repeat has nothing to refer to either.
    play(&log, &clock, &nec_repeat(96_000));
    assert!(drain(&mut svc, &log, &clock).is_empty());
}

#[test]
fn new_press_replaces_held_key() {
    let log = CircularLog::<Coarse>::new();
    let clock = FakeClock::new();
    let mut svc = service();
    let first = NecCommand::to_code(0x00, 0x10);
    let second = NecCommand::to_code(0x00, 0x11);

    play(&log, &clock, &nec_data(30_000, first));
    play(&log, &clock, &nec_repeat(40_000));
    let mut events = drain(&mut svc, &log, &clock);

    play(&log, &clock, &nec_data(40_000, second));
    play(&log, &clock, &nec_repeat(40_000));
    events.extend(drain(&mut svc, &log, &clock));

    assert_eq!(events.iter().map(IrEvent::code).collect::<Vec<_>>(), [first, first, second, second]);
    assert_eq!(events[3], IrEvent::Repeated { code: second, count: 1 });
    assert_eq!(svc.held_code(), Some(second));

    svc.release();
    assert_eq!(svc.held_code(), None);
}

#[test]
fn non_nec_payload_is_still_reported() {
    let log = CircularLog::<Coarse>::new();
    let clock = FakeClock::new();
    let mut svc = service();

    // Command byte not followed by its inverse.
    play(&log, &clock, &nec_data(30_000, 0x1234_5678));
    assert_eq!(
        drain(&mut svc, &log, &clock),
        [IrEvent::Pressed {
            code: 0x1234_5678,
            command: None,
        }]
    );
}

#[test]
fn stats_sink_sees_frames_and_resyncs() {
    let log = CircularLog::<Coarse>::new();
    let clock = FakeClock::new();
    let mut svc = service();
    let mut stats = DecodeStats::new();

    play(&log, &clock, &[30_000, 300, 700, 1_200]);
    play(&log, &clock, &nec_data(20_000, NecCommand::to_code(0x00, 0x16)));
    play(&log, &clock, &nec_repeat(40_000));

    let mut events = 0;
    for _ in 0..4 {
        events += usize::from(svc.poll(&log, &clock, &mut stats).is_some());
    }

    let s = stats.summary();
    assert_eq!(events, 2);
    assert_eq!(s.data_frames, 1);
    assert_eq!(s.repeat_frames, 1);
    // Noise before the frame, then each frame's stop mark.
    assert_eq!(s.parse_resyncs, 3);
    assert_eq!(s.timeout_resyncs, 0);
    assert_eq!(s.dropped_entries, 5 + 2 + 1);
    assert_eq!(svc.reader().timeout_micros(), ReaderConfig::default().timeout_micros);
}
