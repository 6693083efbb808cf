use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use thiserror::Error;

use crate::backend::{BackendError, HookEvent, HookHandle, InputBackend, MouseButton};
use crate::events::{RecorderEvent, SignalChannel};
use crate::model::{Action, ActionKind, Recording};

/// Pointer moves closer than this (per axis) to the last emitted move are
/// dropped.
const MIN_MOVE_DISTANCE: i32 = 2;

/// Pointer moves arriving sooner than this after the last emitted action
/// are dropped, unless the log is still empty.
const MOVE_THROTTLE_MS: i64 = 10;

/// Errors raised when a capture session cannot start.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("already recording")]
    AlreadyRecording,

    #[error("hook install failed: {0}")]
    HookInstall(#[from] BackendError),
}

/// State shared between the recorder and its hook callbacks.
struct CaptureShared {
    actions: Mutex<Vec<Action>>,
    recording: AtomicBool,
    /// Monotonic instant of the last emitted action; the delay baseline.
    last_emit: Mutex<Instant>,
    /// Screen position of the last emitted pointer move; the distance
    /// baseline.
    last_pointer: Mutex<(i32, i32)>,
    ignored_keys: Mutex<HashSet<i32>>,
    signals: SignalChannel<RecorderEvent>,
}

impl CaptureShared {
    /// Normalize one raw hook notification into zero or one log entries.
    ///
    /// Runs on the OS callback context: a panic here must never unwind
    /// into the hook machinery, so the whole body is fenced and reported
    /// as a non-fatal error signal instead.
    fn handle_event(&self, event: HookEvent) {
        if !self.recording.load(Ordering::SeqCst) {
            return;
        }

        let outcome = catch_unwind(AssertUnwindSafe(|| self.normalize(event)));
        if let Err(panic) = outcome {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic in hook callback".to_string());
            tracing::warn!("capture callback failed: {}", message);
            self.signals.emit(RecorderEvent::Error(message));
        }
    }

    fn normalize(&self, event: HookEvent) {
        let delay_ms = self.last_emit.lock().elapsed().as_millis() as i64;

        match event {
            HookEvent::PointerMove { x, y } => self.on_pointer_move(x, y, delay_ms),
            HookEvent::ButtonDown { button, x, y } => {
                self.record(Action::mouse(button_kind(button, true), x, y, delay_ms));
            }
            HookEvent::ButtonUp { button, x, y } => {
                self.record(Action::mouse(button_kind(button, false), x, y, delay_ms));
            }
            HookEvent::Wheel { x, y, delta } => {
                self.record(Action::wheel(x, y, delta, delay_ms));
            }
            HookEvent::KeyDown {
                virtual_key_code,
                scan_code,
            } => {
                if !self.is_ignored(virtual_key_code) {
                    self.record(Action::key(
                        ActionKind::KeyDown,
                        virtual_key_code,
                        scan_code,
                        delay_ms,
                    ));
                }
            }
            HookEvent::KeyUp {
                virtual_key_code,
                scan_code,
            } => {
                if !self.is_ignored(virtual_key_code) {
                    self.record(Action::key(
                        ActionKind::KeyUp,
                        virtual_key_code,
                        scan_code,
                        delay_ms,
                    ));
                }
            }
        }
    }

    /// Distance-and-time gate for pointer moves. An empty log bypasses
    /// only the time gate; the distance gate always applies.
    fn on_pointer_move(&self, x: i32, y: i32, delay_ms: i64) {
        let (last_x, last_y) = *self.last_pointer.lock();
        let dx = (x - last_x).abs();
        let dy = (y - last_y).abs();
        if dx < MIN_MOVE_DISTANCE && dy < MIN_MOVE_DISTANCE {
            return;
        }

        let log_empty = self.actions.lock().is_empty();
        if delay_ms < MOVE_THROTTLE_MS && !log_empty {
            return;
        }

        *self.last_pointer.lock() = (x, y);
        self.record(Action::mouse(ActionKind::MouseMove, x, y, delay_ms));
    }

    /// Emit a captured action and reset the delay baseline.
    fn record(&self, action: Action) {
        *self.last_emit.lock() = Instant::now();
        self.append(action);
    }

    /// Append under the log lock, then signal outside it so an observer
    /// calling back into the recorder cannot deadlock.
    fn append(&self, action: Action) {
        {
            let mut actions = self.actions.lock();
            actions.push(action.clone());
        }
        self.signals.emit(RecorderEvent::ActionRecorded(action));
    }

    fn is_ignored(&self, vk: i32) -> bool {
        self.ignored_keys.lock().contains(&vk)
    }
}

fn button_kind(button: MouseButton, down: bool) -> ActionKind {
    match (button, down) {
        (MouseButton::Left, true) => ActionKind::MouseLeftDown,
        (MouseButton::Left, false) => ActionKind::MouseLeftUp,
        (MouseButton::Right, true) => ActionKind::MouseRightDown,
        (MouseButton::Right, false) => ActionKind::MouseRightUp,
        (MouseButton::Middle, true) => ActionKind::MouseMiddleDown,
        (MouseButton::Middle, false) => ActionKind::MouseMiddleUp,
    }
}

/// Capture engine: turns live hook notifications into an ordered action
/// log while a session is active.
///
/// The in-progress log belongs to the recorder; [`Recorder::snapshot`]
/// hands out an independent copy for persistence or playback.
pub struct Recorder {
    backend: Arc<dyn InputBackend>,
    shared: Arc<CaptureShared>,
    hooks: Mutex<Vec<HookHandle>>,
}

impl Recorder {
    pub fn new(backend: Arc<dyn InputBackend>) -> Self {
        Self {
            backend,
            shared: Arc::new(CaptureShared {
                actions: Mutex::new(Vec::new()),
                recording: AtomicBool::new(false),
                last_emit: Mutex::new(Instant::now()),
                last_pointer: Mutex::new((0, 0)),
                ignored_keys: Mutex::new(HashSet::new()),
                signals: SignalChannel::new(),
            }),
            hooks: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to recorder signals.
    pub fn events(&self) -> Receiver<RecorderEvent> {
        self.shared.signals.subscribe()
    }

    /// Keys to suppress from the log (e.g. the host shell's stop-recording
    /// hotkey). Suppressed keys still reach the OS untouched.
    pub fn set_ignored_keys<I: IntoIterator<Item = i32>>(&self, keys: I) {
        *self.shared.ignored_keys.lock() = keys.into_iter().collect();
    }

    pub fn is_recording(&self) -> bool {
        self.shared.recording.load(Ordering::SeqCst)
    }

    pub fn action_count(&self) -> usize {
        self.shared.actions.lock().len()
    }

    /// Install both hook subscriptions and begin accumulating the log.
    ///
    /// Clears any prior uncommitted log. If the keyboard hook cannot be
    /// installed the pointer hook is rolled back before returning, so a
    /// failed start never leaves a partial subscription behind.
    pub fn start_recording(&self) -> Result<(), CaptureError> {
        if self.is_recording() {
            return Err(CaptureError::AlreadyRecording);
        }

        self.shared.actions.lock().clear();

        let pointer_shared = self.shared.clone();
        let pointer_hook = self
            .backend
            .install_pointer_hook(Box::new(move |event| pointer_shared.handle_event(event)))
            .map_err(|e| {
                self.shared
                    .signals
                    .emit(RecorderEvent::Error(e.to_string()));
                e
            })?;

        let keyboard_shared = self.shared.clone();
        let keyboard_hook = match self
            .backend
            .install_keyboard_hook(Box::new(move |event| keyboard_shared.handle_event(event)))
        {
            Ok(handle) => handle,
            Err(e) => {
                self.backend.uninstall(pointer_hook);
                self.shared
                    .signals
                    .emit(RecorderEvent::Error(e.to_string()));
                return Err(e.into());
            }
        };

        *self.hooks.lock() = vec![pointer_hook, keyboard_hook];

        // Baselines: delays are measured from here, and the first move's
        // distance is judged against the current pointer position.
        *self.shared.last_emit.lock() = Instant::now();
        *self.shared.last_pointer.lock() = self.backend.pointer_position();

        self.shared.recording.store(true, Ordering::SeqCst);
        self.shared.signals.emit(RecorderEvent::Started);
        tracing::info!("recording started");
        Ok(())
    }

    /// Uninstall all subscriptions and go idle. Safe to call repeatedly
    /// or when not recording.
    pub fn stop_recording(&self) {
        if !self.is_recording() {
            return;
        }

        self.shared.recording.store(false, Ordering::SeqCst);
        for handle in self.hooks.lock().drain(..) {
            self.backend.uninstall(handle);
        }

        self.shared.signals.emit(RecorderEvent::Stopped);
        tracing::info!("recording stopped ({} actions)", self.action_count());
    }

    /// Drop the accumulated log.
    pub fn clear_recording(&self) {
        self.shared.actions.lock().clear();
    }

    /// Append a manually built action (editor-driven, independent of live
    /// capture).
    pub fn add_action(&self, action: Action) {
        self.shared.append(action);
    }

    /// Remove an action by id. Returns whether anything was removed.
    pub fn remove_action(&self, id: uuid::Uuid) -> bool {
        let mut actions = self.shared.actions.lock();
        let before = actions.len();
        actions.retain(|a| a.id != id);
        actions.len() != before
    }

    /// Replace the action with the same id. Returns whether a match was
    /// found.
    pub fn update_action(&self, action: Action) -> bool {
        let mut actions = self.shared.actions.lock();
        match actions.iter_mut().find(|a| a.id == action.id) {
            Some(slot) => {
                *slot = action;
                true
            }
            None => false,
        }
    }

    /// Point-in-time copy of the log with capture metadata, suitable for
    /// persistence or for loading into a player. Never aliases the live
    /// log.
    pub fn snapshot(&self) -> Recording {
        let (width, height) = self.backend.screen_size();
        let mut recording = Recording::new();
        recording.name = Some(format!("Recording {}", Utc::now().format("%Y%m%d_%H%M%S")));
        recording.screen_width = width as i32;
        recording.screen_height = height as i32;
        recording.os_version = Some(format!(
            "{} {}",
            std::env::consts::OS,
            std::env::consts::ARCH
        ));
        recording.actions = self
            .shared
            .actions
            .lock()
            .iter()
            .map(Action::duplicate)
            .collect();
        recording
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.stop_recording();
    }
}
