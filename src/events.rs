//! Observable signals emitted by the capture and playback engines.
//!
//! Signals travel over an unbounded channel so emission never blocks a
//! hook callback or the playback worker. Each engine hands out a receiver
//! via its `events()` accessor; the stream is intended for a single
//! consumer (the host shell).

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::model::Action;

/// Signals emitted by the capture engine.
#[derive(Debug, Clone)]
pub enum RecorderEvent {
    Started,
    Stopped,
    ActionRecorded(Action),
    Error(String),
}

/// Signals emitted by the playback engine.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Started,
    Paused,
    Resumed,
    Stopped,
    Completed,
    CurrentActionChanged(Action),
    /// Fraction of the loaded list already executed, in [0, 1].
    ProgressChanged(f64),
    Error(String),
}

/// An engine-side signal outlet paired with its subscriber handle.
pub(crate) struct SignalChannel<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> SignalChannel<T> {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Send, ignoring the error when no subscriber is left alive.
    pub(crate) fn emit(&self, event: T) {
        let _ = self.sender.send(event);
    }

    pub(crate) fn subscribe(&self) -> Receiver<T> {
        self.receiver.clone()
    }
}
