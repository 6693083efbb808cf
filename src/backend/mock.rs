//! Simulated input backend.
//!
//! Stands in for an OS adapter in tests and headless runs: hook events are
//! fed in programmatically with the `emit_*` methods and every injection
//! is kept in an inspectable ledger. Hook installation can be made to fail
//! to exercise the capture engine's rollback path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{
    BackendError, HookCallback, HookEvent, HookHandle, InputBackend, MouseButton,
};
use crate::model::Action;

/// One entry in the injection ledger, in the order the backend saw it.
#[derive(Debug, Clone)]
pub enum InjectedOp {
    /// An explicit pointer placement via `move_pointer`.
    PointerMoved { x: i32, y: i32 },
    /// A full action handed to `inject`.
    Action(Action),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HookChannel {
    Pointer,
    Keyboard,
}

/// In-memory [`InputBackend`] with scripted event delivery.
pub struct MockBackend {
    next_handle: AtomicU64,
    hooks: Mutex<HashMap<HookHandle, (HookChannel, Arc<HookCallback>)>>,
    injected: Mutex<Vec<InjectedOp>>,
    pointer: Mutex<(i32, i32)>,
    screen: (u32, u32),
    fail_pointer_hook: AtomicBool,
    fail_keyboard_hook: AtomicBool,
    fail_injection: AtomicBool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            hooks: Mutex::new(HashMap::new()),
            injected: Mutex::new(Vec::new()),
            pointer: Mutex::new((0, 0)),
            screen: (1920, 1080),
            fail_pointer_hook: AtomicBool::new(false),
            fail_keyboard_hook: AtomicBool::new(false),
            fail_injection: AtomicBool::new(false),
        }
    }

    /// Make the next pointer-hook install fail (privilege-style error).
    pub fn fail_pointer_hook(&self, fail: bool) {
        self.fail_pointer_hook.store(fail, Ordering::SeqCst);
    }

    /// Make the next keyboard-hook install fail.
    pub fn fail_keyboard_hook(&self, fail: bool) {
        self.fail_keyboard_hook.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `inject` fail.
    pub fn fail_injection(&self, fail: bool) {
        self.fail_injection.store(fail, Ordering::SeqCst);
    }

    /// Number of live hook subscriptions.
    pub fn hook_count(&self) -> usize {
        self.hooks.lock().len()
    }

    /// Snapshot of the injection ledger.
    pub fn injected(&self) -> Vec<InjectedOp> {
        self.injected.lock().clone()
    }

    /// Injected full actions only, placement moves filtered out.
    pub fn injected_actions(&self) -> Vec<Action> {
        self.injected
            .lock()
            .iter()
            .filter_map(|op| match op {
                InjectedOp::Action(a) => Some(a.clone()),
                InjectedOp::PointerMoved { .. } => None,
            })
            .collect()
    }

    pub fn clear_injected(&self) {
        self.injected.lock().clear();
    }

    pub fn set_pointer_position(&self, x: i32, y: i32) {
        *self.pointer.lock() = (x, y);
    }

    /// Deliver a pointer-move notification to every pointer hook.
    pub fn emit_pointer_move(&self, x: i32, y: i32) {
        *self.pointer.lock() = (x, y);
        self.dispatch(HookChannel::Pointer, HookEvent::PointerMove { x, y });
    }

    /// Deliver a button notification.
    pub fn emit_button(&self, button: MouseButton, down: bool, x: i32, y: i32) {
        let event = if down {
            HookEvent::ButtonDown { button, x, y }
        } else {
            HookEvent::ButtonUp { button, x, y }
        };
        self.dispatch(HookChannel::Pointer, event);
    }

    /// Deliver a wheel notification.
    pub fn emit_wheel(&self, x: i32, y: i32, delta: i32) {
        self.dispatch(HookChannel::Pointer, HookEvent::Wheel { x, y, delta });
    }

    /// Deliver a keyboard notification.
    pub fn emit_key(&self, down: bool, virtual_key_code: i32, scan_code: i32) {
        let event = if down {
            HookEvent::KeyDown {
                virtual_key_code,
                scan_code,
            }
        } else {
            HookEvent::KeyUp {
                virtual_key_code,
                scan_code,
            }
        };
        self.dispatch(HookChannel::Keyboard, event);
    }

    fn dispatch(&self, channel: HookChannel, event: HookEvent) {
        // Clone the callbacks out before invoking them so a callback that
        // installs or removes hooks cannot deadlock against the map lock.
        let targets: Vec<Arc<HookCallback>> = self
            .hooks
            .lock()
            .values()
            .filter(|(c, _)| *c == channel)
            .map(|(_, cb)| cb.clone())
            .collect();

        for callback in targets {
            callback(event);
        }
    }

    fn install(
        &self,
        channel: HookChannel,
        callback: HookCallback,
        fail: &AtomicBool,
        label: &str,
    ) -> Result<HookHandle, BackendError> {
        if fail.load(Ordering::SeqCst) {
            return Err(BackendError::HookInstall(format!(
                "{} hook rejected by backend",
                label
            )));
        }

        let handle = HookHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.hooks
            .lock()
            .insert(handle, (channel, Arc::new(callback)));
        Ok(handle)
    }
}

impl InputBackend for MockBackend {
    fn install_pointer_hook(&self, callback: HookCallback) -> Result<HookHandle, BackendError> {
        self.install(
            HookChannel::Pointer,
            callback,
            &self.fail_pointer_hook,
            "pointer",
        )
    }

    fn install_keyboard_hook(&self, callback: HookCallback) -> Result<HookHandle, BackendError> {
        self.install(
            HookChannel::Keyboard,
            callback,
            &self.fail_keyboard_hook,
            "keyboard",
        )
    }

    fn uninstall(&self, handle: HookHandle) {
        self.hooks.lock().remove(&handle);
    }

    fn move_pointer(&self, x: i32, y: i32) -> Result<(), BackendError> {
        *self.pointer.lock() = (x, y);
        self.injected.lock().push(InjectedOp::PointerMoved { x, y });
        Ok(())
    }

    fn inject(&self, action: &Action) -> Result<(), BackendError> {
        if self.fail_injection.load(Ordering::SeqCst) {
            return Err(BackendError::Injection(
                "injection rejected by backend".to_string(),
            ));
        }

        self.injected
            .lock()
            .push(InjectedOp::Action(action.clone()));
        Ok(())
    }

    fn pointer_position(&self) -> (i32, i32) {
        *self.pointer.lock()
    }

    fn screen_size(&self) -> (u32, u32) {
        self.screen
    }
}
