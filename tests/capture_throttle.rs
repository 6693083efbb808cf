//! Capture engine behavior against a synthetic hook-event stream.

use std::sync::Arc;

use macrorec::backend::MockBackend;
use macrorec::model::ActionKind;
use macrorec::{MouseButton, Recorder, RecorderEvent};

fn setup() -> (Arc<MockBackend>, Recorder) {
    let backend = Arc::new(MockBackend::new());
    let recorder = Recorder::new(backend.clone());
    (backend, recorder)
}

#[test]
fn dense_pointer_stream_is_throttled() {
    let (backend, recorder) = setup();
    backend.set_pointer_position(0, 0);
    recorder.start_recording().unwrap();

    // 1000 one-pixel moves delivered back-to-back (far faster than the
    // 10ms throttle window). Each 1px step fails the 2px distance gate
    // against the last emitted position until the offset accumulates, and
    // the time gate rejects everything after the first emission.
    for i in 1..=1000 {
        backend.emit_pointer_move(i, 0);
    }

    let count = recorder.action_count();
    assert!(count < 20, "expected a tightly bounded log, got {}", count);
    assert!(count >= 1, "the first qualifying move must be emitted");
}

#[test]
fn slow_distinct_moves_are_all_kept() {
    let (backend, recorder) = setup();
    backend.set_pointer_position(0, 0);
    recorder.start_recording().unwrap();

    for i in 1..=5 {
        backend.emit_pointer_move(i * 100, i * 100);
        std::thread::sleep(std::time::Duration::from_millis(15));
    }

    assert_eq!(recorder.action_count(), 5);
}

#[test]
fn buttons_interleaved_with_dense_moves_survive() {
    let (backend, recorder) = setup();
    backend.set_pointer_position(0, 0);
    recorder.start_recording().unwrap();

    for i in 1..=100 {
        backend.emit_pointer_move(i, 0);
    }
    backend.emit_button(MouseButton::Left, true, 100, 0);
    backend.emit_button(MouseButton::Left, false, 100, 0);
    for i in 101..=200 {
        backend.emit_pointer_move(i, 0);
    }
    backend.emit_wheel(200, 0, 120);

    let snapshot = recorder.snapshot();
    let downs = snapshot
        .actions
        .iter()
        .filter(|a| a.kind == ActionKind::MouseLeftDown)
        .count();
    let ups = snapshot
        .actions
        .iter()
        .filter(|a| a.kind == ActionKind::MouseLeftUp)
        .count();
    let wheels = snapshot
        .actions
        .iter()
        .filter(|a| a.kind == ActionKind::MouseWheel)
        .count();

    assert_eq!(downs, 1);
    assert_eq!(ups, 1);
    assert_eq!(wheels, 1);
}

#[test]
fn recorded_delays_are_never_negative() {
    let (backend, recorder) = setup();
    recorder.start_recording().unwrap();

    for _ in 0..10 {
        backend.emit_key(true, 65, 30);
        backend.emit_key(false, 65, 30);
    }

    let snapshot = recorder.snapshot();
    assert!(snapshot.actions.iter().all(|a| a.delay_ms >= 0));
    assert!(snapshot.is_valid());
}

#[test]
fn action_recorded_signal_fires_per_entry() {
    let (backend, recorder) = setup();
    let events = recorder.events();
    recorder.start_recording().unwrap();

    backend.emit_key(true, 65, 30);
    backend.emit_key(false, 65, 30);
    recorder.stop_recording();

    let mut started = 0;
    let mut recorded = 0;
    let mut stopped = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            RecorderEvent::Started => started += 1,
            RecorderEvent::ActionRecorded(_) => recorded += 1,
            RecorderEvent::Stopped => stopped += 1,
            RecorderEvent::Error(_) => panic!("unexpected error signal"),
        }
    }

    assert_eq!(started, 1);
    assert_eq!(recorded, 2);
    assert_eq!(stopped, 1);
}

#[test]
fn failed_install_reports_error_signal() {
    let (backend, recorder) = setup();
    let events = recorder.events();
    backend.fail_pointer_hook(true);

    assert!(recorder.start_recording().is_err());
    assert!(matches!(events.try_recv(), Ok(RecorderEvent::Error(_))));
    assert!(!recorder.is_recording());
}
