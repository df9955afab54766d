//! Batched evaluation: four terms per kernel step.

use crate::constants::BATCH_LANES;
use crate::kernel::{ShiftAddKernel, State};
use crate::word::Word;

/// Index of the first term produced by the first kernel step.
pub const START_BASE: u64 = 4;

/// `[F(3), F(2), F(1), F(0)]`: the state at base 4.
#[must_use]
pub fn start_state<W: Word>() -> State<W> {
    [W::from_u64_wrapping(2), W::one(), W::one(), W::zero()]
}

/// F(index) mod 2^w: advance `index / 4` steps, then read lane `3 - index % 4`.
#[must_use]
pub fn fib<W: Word>(kernel: &ShiftAddKernel<W>, index: u64) -> W {
    let lanes = BATCH_LANES as u64;
    let mut state = start_state::<W>();
    for _ in 0..index / lanes {
        state = kernel.step(state);
    }
    // index % 4 < 4, the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation)]
    let lane = BATCH_LANES - 1 - (index % lanes) as usize;
    state[lane]
}
