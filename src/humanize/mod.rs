//! Timing and position humanization utilities.
//!
//! Pure helpers over one shared thread-safe RNG: uniform draws, delay and
//! position jitter, and Bézier pointer-path synthesis.

pub mod path;
pub mod rng;

pub use path::{bezier_control_points, bezier_point, mouse_path, Point};
pub use rng::{
    humanized_delay, humanized_position, next_bool, next_float, next_int, shuffle, thinking_delay,
};
