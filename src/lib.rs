//! macrorec - global mouse/keyboard recording and timed replay.
//!
//! Captures global input activity as an ordered, timestamped action log
//! and replays it through an abstract input backend at adjustable speed,
//! optionally looped and with human-like timing jitter.
//!
//! The OS integration (hook installation, synthetic injection) is a
//! capability the host supplies via [`backend::InputBackend`]; this crate
//! ships a [`backend::MockBackend`] for tests and headless use.

pub mod backend;
pub mod capture;
pub mod events;
pub mod humanize;
pub mod model;
pub mod persist;
pub mod playback;

pub use backend::{BackendError, HookEvent, InputBackend, MockBackend, MouseButton};
pub use capture::{CaptureError, Recorder};
pub use events::{PlayerEvent, RecorderEvent};
pub use model::{Action, ActionKind, Recording};
pub use persist::PersistError;
pub use playback::{PlaybackError, PlaybackState, Player};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing for hosts that don't bring their own subscriber.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "macrorec=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
