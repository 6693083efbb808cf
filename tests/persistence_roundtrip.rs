//! Disk round-trips of captured recordings, and the full
//! record -> save -> load -> replay pipeline.

use std::sync::Arc;
use std::time::Duration;

use macrorec::backend::MockBackend;
use macrorec::model::ActionKind;
use macrorec::persist;
use macrorec::{MouseButton, PersistError, PlaybackState, Player, Recorder};

fn wait_for_state(player: &Player, state: PlaybackState, timeout: Duration) {
    let deadline = std::time::Instant::now() + timeout;
    while player.state() != state {
        assert!(std::time::Instant::now() < deadline, "timed out");
        std::thread::sleep(Duration::from_millis(2));
    }
}

fn captured_recording() -> macrorec::Recording {
    let backend = Arc::new(MockBackend::new());
    let recorder = Recorder::new(backend.clone());
    backend.set_pointer_position(0, 0);
    recorder.start_recording().unwrap();

    backend.emit_pointer_move(120, 80);
    backend.emit_button(MouseButton::Left, true, 120, 80);
    backend.emit_button(MouseButton::Left, false, 120, 80);
    backend.emit_wheel(120, 80, -120);
    backend.emit_key(true, 0x41, 30);
    backend.emit_key(false, 0x41, 30);

    recorder.stop_recording();
    recorder.snapshot()
}

#[test]
fn snapshot_survives_a_disk_roundtrip_unchanged() {
    let recording = captured_recording();
    assert!(recording.is_valid());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    persist::save_to_file(&recording, &path).unwrap();
    let restored = persist::load_from_file(&path).unwrap();

    assert_eq!(restored, recording);
    assert_eq!(restored.total_duration_ms(), recording.total_duration_ms());
}

#[test]
fn save_creates_missing_parent_directories() {
    let recording = captured_recording();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deep").join("session.json");

    persist::save_to_file(&recording, &path).unwrap();
    assert!(path.exists());
}

#[test]
fn missing_file_is_an_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    let result = persist::load_from_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(PersistError::Io(_))));
}

#[test]
fn corrupt_file_is_a_parse_failure_not_io() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = persist::load_from_file(&path);
    assert!(matches!(result, Err(PersistError::Parse(_))));
}

#[test]
fn tampered_recording_is_an_invalid_document() {
    let mut recording = captured_recording();
    recording.actions[0].delay_ms = -50;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tampered.json");
    let json = serde_json::to_string_pretty(&recording).unwrap();
    std::fs::write(&path, json).unwrap();

    let result = persist::load_from_file(&path);
    assert!(matches!(result, Err(PersistError::Invalid)));
}

#[test]
fn loaded_recording_replays_the_captured_sequence() {
    let recording = captured_recording();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("replay.json");
    persist::save_to_file(&recording, &path).unwrap();
    let restored = persist::load_from_file(&path).unwrap();

    let backend = Arc::new(MockBackend::new());
    let player = Player::new(backend.clone());
    player.load_recording(&restored);
    player.set_speed(5.0);
    player.play().unwrap();
    wait_for_state(&player, PlaybackState::Completed, Duration::from_secs(10));

    let injected = backend.injected_actions();
    assert_eq!(injected.len(), restored.action_count());

    let kinds: Vec<ActionKind> = injected.iter().map(|a| a.kind).collect();
    let expected: Vec<ActionKind> = restored.actions.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, expected);

    // The click was captured at (120, 80); the replayed button events must
    // carry the same position.
    let down = injected
        .iter()
        .find(|a| a.kind == ActionKind::MouseLeftDown)
        .unwrap();
    assert_eq!((down.x, down.y), (120, 80));
}
