use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use thiserror::Error;

use crate::backend::InputBackend;
use crate::events::{PlayerEvent, SignalChannel};
use crate::humanize;
use crate::model::{Action, Recording};
use crate::playback::control::PlaybackControl;

/// Minimum and maximum speed multipliers.
pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 5.0;

/// Pointer settle time between placing the cursor and injecting a
/// button/wheel signal.
const SETTLE_DELAY: Duration = Duration::from_millis(5);

/// Scaled delays at or below this many milliseconds are replayed without
/// humanization jitter.
const HUMANIZE_FLOOR_MS: i64 = 10;

/// Playback session states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
    Completed,
    Stopped,
    Error,
}

/// Errors raised when a playback run cannot start.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("no actions loaded")]
    EmptyList,

    #[error("a playback session is already active")]
    AlreadyActive,
}

/// One pass over the loaded list, as seen by the worker loop.
enum PassOutcome {
    Finished,
    Cancelled,
    Failed,
}

/// State shared between the player handle and its worker thread.
struct PlayerShared {
    actions: Mutex<Vec<Action>>,
    state: Mutex<PlaybackState>,
    current_index: AtomicUsize,
    current_loop: AtomicUsize,
    speed: Mutex<f64>,
    loop_enabled: AtomicBool,
    loop_count: AtomicUsize,
    humanize: AtomicBool,
    signals: SignalChannel<PlayerEvent>,
}

/// Playback engine: replays a loaded action list through the backend on a
/// dedicated worker thread, under cooperative pause and cancellation.
///
/// The player owns a private copy of whatever it is given; editing the
/// source log after loading does not affect an in-progress run. At most
/// one session is active per player.
pub struct Player {
    backend: Arc<dyn InputBackend>,
    shared: Arc<PlayerShared>,
    control: Mutex<Arc<PlaybackControl>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    pub fn new(backend: Arc<dyn InputBackend>) -> Self {
        Self {
            backend,
            shared: Arc::new(PlayerShared {
                actions: Mutex::new(Vec::new()),
                state: Mutex::new(PlaybackState::Idle),
                current_index: AtomicUsize::new(0),
                current_loop: AtomicUsize::new(0),
                speed: Mutex::new(1.0),
                loop_enabled: AtomicBool::new(false),
                loop_count: AtomicUsize::new(0),
                humanize: AtomicBool::new(false),
                signals: SignalChannel::new(),
            }),
            control: Mutex::new(Arc::new(PlaybackControl::new())),
            worker: Mutex::new(None),
        }
    }

    /// Subscribe to playback signals.
    pub fn events(&self) -> Receiver<PlayerEvent> {
        self.shared.signals.subscribe()
    }

    /// Replace the session's action list with a copy of the recording's
    /// actions. Stops any in-flight run first and resets position.
    pub fn load_recording(&self, recording: &Recording) {
        self.load_actions(recording.actions.iter().cloned());
    }

    /// Replace the session's action list. Stops any in-flight run first
    /// and resets position.
    pub fn load_actions<I: IntoIterator<Item = Action>>(&self, actions: I) {
        self.stop();
        *self.shared.actions.lock() = actions.into_iter().collect();
        self.shared.current_index.store(0, Ordering::SeqCst);
        self.shared.current_loop.store(0, Ordering::SeqCst);
    }

    /// Speed multiplier, clamped into [0.1, 5.0].
    pub fn set_speed(&self, speed: f64) {
        *self.shared.speed.lock() = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn speed(&self) -> f64 {
        *self.shared.speed.lock()
    }

    pub fn set_loop_enabled(&self, enabled: bool) {
        self.shared.loop_enabled.store(enabled, Ordering::SeqCst);
    }

    /// How many passes to run when looping; 0 means unbounded.
    pub fn set_loop_count(&self, count: usize) {
        self.shared.loop_count.store(count, Ordering::SeqCst);
    }

    pub fn set_humanize(&self, enabled: bool) {
        self.shared.humanize.store(enabled, Ordering::SeqCst);
    }

    pub fn state(&self) -> PlaybackState {
        *self.shared.state.lock()
    }

    pub fn current_index(&self) -> usize {
        self.shared.current_index.load(Ordering::SeqCst)
    }

    pub fn current_loop(&self) -> usize {
        self.shared.current_loop.load(Ordering::SeqCst)
    }

    pub fn action_count(&self) -> usize {
        self.shared.actions.lock().len()
    }

    /// Fraction of the loaded list already executed, in [0, 1].
    pub fn progress(&self) -> f64 {
        let total = self.action_count();
        if total == 0 {
            return 0.0;
        }
        self.current_index() as f64 / total as f64
    }

    /// Start playback from the beginning.
    pub fn play(&self) -> Result<(), PlaybackError> {
        self.play_from(0)
    }

    /// Start playback from `start_index` (clamped into [0, length]).
    ///
    /// Refuses an empty list without emitting any signal, and refuses to
    /// start while a session is playing or paused.
    pub fn play_from(&self, start_index: usize) -> Result<(), PlaybackError> {
        {
            let state = self.shared.state.lock();
            if matches!(*state, PlaybackState::Playing | PlaybackState::Paused) {
                return Err(PlaybackError::AlreadyActive);
            }
        }

        let total = self.shared.actions.lock().len();
        if total == 0 {
            return Err(PlaybackError::EmptyList);
        }

        // Reap a worker left over from a completed run.
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }

        let control = Arc::new(PlaybackControl::new());
        *self.control.lock() = control.clone();

        self.shared
            .current_index
            .store(start_index.min(total), Ordering::SeqCst);
        self.shared.current_loop.store(0, Ordering::SeqCst);

        *self.shared.state.lock() = PlaybackState::Playing;
        self.shared.signals.emit(PlayerEvent::Started);
        tracing::info!(
            "playback started ({} actions, speed {:.2})",
            total,
            self.speed()
        );

        let shared = self.shared.clone();
        let backend = self.backend.clone();
        let handle = std::thread::Builder::new()
            .name("macrorec-playback".to_string())
            .spawn(move || run_loop(&backend, &shared, &control))
            .expect("failed to spawn playback worker");

        *self.worker.lock() = Some(handle);
        Ok(())
    }

    /// Close the pause gate. The worker suspends before its next action.
    pub fn pause(&self) {
        let mut state = self.shared.state.lock();
        if *state == PlaybackState::Playing {
            *state = PlaybackState::Paused;
            drop(state);
            self.control.lock().pause();
            self.shared.signals.emit(PlayerEvent::Paused);
        }
    }

    /// Reopen the pause gate.
    pub fn resume(&self) {
        let mut state = self.shared.state.lock();
        if *state == PlaybackState::Paused {
            *state = PlaybackState::Playing;
            drop(state);
            self.control.lock().resume();
            self.shared.signals.emit(PlayerEvent::Resumed);
        }
    }

    /// Cancel the run cooperatively, reset position and loop counter, and
    /// settle in `Stopped`. No-op from `Idle`; idempotent otherwise.
    pub fn stop(&self) {
        if *self.shared.state.lock() == PlaybackState::Idle {
            return;
        }

        self.control.lock().cancel();
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }

        *self.shared.state.lock() = PlaybackState::Stopped;
        self.shared.current_index.store(0, Ordering::SeqCst);
        self.shared.current_loop.store(0, Ordering::SeqCst);
        self.shared.signals.emit(PlayerEvent::Stopped);
        tracing::info!("playback stopped");
    }

    /// Move the playhead; clamped into [0, length]. Safe at any time.
    pub fn seek_to(&self, index: usize) {
        let total = self.shared.actions.lock().len();
        self.shared
            .current_index
            .store(index.min(total), Ordering::SeqCst);
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Worker entry: run passes until the requested loops are done, the run
/// is cancelled, or an injection fails.
fn run_loop(backend: &Arc<dyn InputBackend>, shared: &Arc<PlayerShared>, control: &PlaybackControl) {
    loop {
        match run_single_pass(backend, shared, control) {
            PassOutcome::Cancelled => return,
            PassOutcome::Failed => return,
            PassOutcome::Finished => {}
        }

        if control.is_cancelled() {
            return;
        }

        if !shared.loop_enabled.load(Ordering::SeqCst) {
            break;
        }

        let completed_loops = shared.current_loop.fetch_add(1, Ordering::SeqCst) + 1;
        let requested = shared.loop_count.load(Ordering::SeqCst);
        if requested > 0 && completed_loops >= requested {
            break;
        }
        shared.current_index.store(0, Ordering::SeqCst);
    }

    if !control.is_cancelled() {
        *shared.state.lock() = PlaybackState::Completed;
        shared.signals.emit(PlayerEvent::Completed);
        tracing::info!("playback completed");
    }
}

fn run_single_pass(
    backend: &Arc<dyn InputBackend>,
    shared: &Arc<PlayerShared>,
    control: &PlaybackControl,
) -> PassOutcome {
    loop {
        if control.is_cancelled() {
            return PassOutcome::Cancelled;
        }

        if !control.wait_while_paused() {
            return PassOutcome::Cancelled;
        }

        let (action, total) = {
            let actions = shared.actions.lock();
            let index = shared.current_index.load(Ordering::SeqCst);
            if index >= actions.len() {
                return PassOutcome::Finished;
            }
            (actions[index].clone(), actions.len())
        };

        if let Err(e) = execute_action(backend.as_ref(), &action) {
            tracing::error!("injection failed: {}", e);
            *shared.state.lock() = PlaybackState::Error;
            shared.signals.emit(PlayerEvent::Error(e.to_string()));
            return PassOutcome::Failed;
        }

        let new_index = shared.current_index.fetch_add(1, Ordering::SeqCst) + 1;
        shared
            .signals
            .emit(PlayerEvent::CurrentActionChanged(action.clone()));
        shared
            .signals
            .emit(PlayerEvent::ProgressChanged(new_index as f64 / total as f64));

        let wait_ms = compute_wait(
            action.delay_ms,
            *shared.speed.lock(),
            shared.humanize.load(Ordering::SeqCst),
        );
        if wait_ms > 0 && new_index < total {
            if !control.sleep(Duration::from_millis(wait_ms as u64)) {
                return PassOutcome::Cancelled;
            }
        }
    }
}

/// Inject one action. Buttons and wheel are preceded by a pointer
/// placement at the recorded coordinates plus a short settle delay, so a
/// click lands where it was captured even when the preceding move was
/// coalesced away.
fn execute_action(
    backend: &dyn InputBackend,
    action: &Action,
) -> Result<(), crate::backend::BackendError> {
    if action.kind.needs_pointer_placement() {
        backend.move_pointer(action.x, action.y)?;
        std::thread::sleep(SETTLE_DELAY);
    }
    backend.inject(action)
}

/// Scale a recorded delay by the speed multiplier and, when humanization
/// is on and the scaled delay exceeds the floor, jitter it by a uniform
/// factor in [0.9, 1.1]. Never negative.
fn compute_wait(delay_ms: i64, speed: f64, humanize_on: bool) -> i64 {
    let mut adjusted = (delay_ms as f64 / speed) as i64;

    if humanize_on && adjusted > HUMANIZE_FLOOR_MS {
        let factor = humanize::next_float(0.9, 1.1);
        adjusted = (adjusted as f64 * factor) as i64;
    }

    adjusted.max(0)
}
