//! Capture engine.
//!
//! Subscribes to OS-level pointer and keyboard hooks through the input
//! backend and turns the raw notification stream into an ordered,
//! throttled action log.

pub mod recorder;

pub use recorder::{CaptureError, Recorder};
