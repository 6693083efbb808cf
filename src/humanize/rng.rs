//! Shared randomness source and timing/position jitter helpers.
//!
//! All draws go through one process-wide RNG behind a mutex, so the
//! capture and playback engines can call these concurrently.

use std::sync::OnceLock;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

static RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

fn with_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    let rng = RNG.get_or_init(|| Mutex::new(StdRng::from_entropy()));
    f(&mut rng.lock())
}

/// Uniform integer in `[min, max]` (inclusive).
pub fn next_int(min: i32, max: i32) -> i32 {
    if min >= max {
        return min;
    }
    with_rng(|rng| rng.gen_range(min..=max))
}

/// Uniform float in `[min, max)`.
pub fn next_float(min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    with_rng(|rng| rng.gen_range(min..max))
}

/// Bernoulli draw: `true` with the given probability (clamped to [0, 1]).
pub fn next_bool(probability: f64) -> bool {
    with_rng(|rng| rng.gen::<f64>() < probability)
}

/// A delay with symmetric random variance around `base_ms`.
///
/// `variance_percent` of 10.0 yields a result in roughly ±10% of the
/// base. Non-positive bases come back as zero; the result is never
/// negative.
pub fn humanized_delay(base_ms: i64, variance_percent: f64) -> i64 {
    if base_ms <= 0 {
        return 0;
    }

    let variance = base_ms as f64 * (variance_percent / 100.0);
    let offset = with_rng(|rng| rng.gen::<f64>() * 2.0 - 1.0) * variance;
    ((base_ms as f64 + offset) as i64).max(0)
}

/// A screen position within `max_offset` pixels of the base on each axis.
pub fn humanized_position(base_x: i32, base_y: i32, max_offset: i32) -> (i32, i32) {
    let offset = max_offset.abs();
    (
        base_x + next_int(-offset, offset),
        base_y + next_int(-offset, offset),
    )
}

/// A random pause in `[min_ms, max_ms]`, for simulated think time.
pub fn thinking_delay(min_ms: i64, max_ms: i64) -> i64 {
    if min_ms >= max_ms {
        return min_ms.max(0);
    }
    with_rng(|rng| rng.gen_range(min_ms..=max_ms)).max(0)
}

/// In-place Fisher–Yates shuffle.
pub fn shuffle<T>(items: &mut [T]) {
    if items.len() <= 1 {
        return;
    }

    with_rng(|rng| {
        for i in (1..items.len()).rev() {
            let j = rng.gen_range(0..=i);
            items.swap(i, j);
        }
    });
}
