//! Wall-clock timing of a single call.

use std::hint::black_box;
use std::time::{Duration, Instant};

/// Run `f` once and return how long it took together with its result.
///
/// The result passes through [`black_box`] before the clock stops, so the
/// call cannot be hoisted out of the measured region or discarded.
#[inline]
pub fn time<R>(f: impl FnOnce() -> R) -> (Duration, R) {
    let start = Instant::now();
    let result = black_box(f());
    (start.elapsed(), result)
}
