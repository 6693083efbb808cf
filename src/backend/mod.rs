//! Input backend capability.
//!
//! The engines never talk to the OS directly: hook installation, synthetic
//! injection and screen queries all go through [`InputBackend`]. One
//! concrete adapter exists per target OS downstream; this crate ships only
//! the [`MockBackend`] used for tests and headless runs.

pub mod mock;

use thiserror::Error;

use crate::model::Action;

pub use mock::MockBackend;

/// Errors surfaced by a backend implementation.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("hook install failed: {0}")]
    HookInstall(String),

    #[error("injection failed: {0}")]
    Injection(String),
}

/// Which hook channel an event arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A raw notification delivered by an installed hook.
///
/// Positions are absolute screen pixels as reported by the OS; key codes
/// are platform virtual keys with their hardware scan codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    PointerMove { x: i32, y: i32 },
    ButtonDown { button: MouseButton, x: i32, y: i32 },
    ButtonUp { button: MouseButton, x: i32, y: i32 },
    Wheel { x: i32, y: i32, delta: i32 },
    KeyDown { virtual_key_code: i32, scan_code: i32 },
    KeyUp { virtual_key_code: i32, scan_code: i32 },
}

/// Callback invoked for every matching system event while a hook is live.
pub type HookCallback = Box<dyn Fn(HookEvent) + Send + Sync + 'static>;

/// Opaque token identifying an installed hook subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle(pub(crate) u64);

/// OS-level input capability consumed by both engines.
///
/// Implementations must be internally synchronized: hooks deliver events
/// from the OS callback context while `inject` runs on the playback
/// worker thread.
pub trait InputBackend: Send + Sync {
    /// Subscribe to pointer notifications (moves, buttons, wheel).
    fn install_pointer_hook(&self, callback: HookCallback) -> Result<HookHandle, BackendError>;

    /// Subscribe to keyboard notifications (key down/up).
    fn install_keyboard_hook(&self, callback: HookCallback) -> Result<HookHandle, BackendError>;

    /// Remove a subscription. Unknown handles are ignored.
    fn uninstall(&self, handle: HookHandle);

    /// Move the pointer to absolute screen coordinates.
    fn move_pointer(&self, x: i32, y: i32) -> Result<(), BackendError>;

    /// Synthesize one action's worth of input. `Wait` and `Special`
    /// actions are no-ops; their delays are handled by the scheduler.
    fn inject(&self, action: &Action) -> Result<(), BackendError>;

    /// Current absolute pointer position.
    fn pointer_position(&self) -> (i32, i32);

    /// Primary screen dimensions in pixels.
    fn screen_size(&self) -> (u32, u32);
}
