//! Lazy Fibonacci sequence driven by the batched kernel.

use crate::batched::{start_state, START_BASE};
use crate::constants::BATCH_LANES;
use crate::kernel::{ShiftAddKernel, State};
use crate::word::Word;

/// Lazy iterator over F(0), F(1), ... mod 2^w.
///
/// Yields `(index, F(index))` pairs. Values are produced four at a time:
/// each kernel step fills a block, which is then drained in index order.
///
/// # Example
/// ```
/// use fibbench_core::iterator::BatchedSequence;
/// use fibbench_core::kernel::ShiftAddKernel;
///
/// let kernel = ShiftAddKernel::<u64>::derive().unwrap();
/// let fibs: Vec<u64> = BatchedSequence::new(kernel).take(7).map(|(_, v)| v).collect();
/// assert_eq!(fibs, [0, 1, 1, 2, 3, 5, 8]);
/// ```
#[derive(Debug, Clone)]
pub struct BatchedSequence<W: Word> {
    kernel: ShiftAddKernel<W>,
    /// State at `base`: lane `j` is F(base - 1 - j).
    state: State<W>,
    base: u64,
    index: u64,
}

impl<W: Word> BatchedSequence<W> {
    #[must_use]
    pub fn new(kernel: ShiftAddKernel<W>) -> Self {
        Self {
            kernel,
            state: start_state(),
            base: START_BASE,
            index: 0,
        }
    }
}

impl<W: Word> Iterator for BatchedSequence<W> {
    type Item = (u64, W);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index == self.base {
            self.state = self.kernel.step(self.state);
            self.base = self.base.checked_add(BATCH_LANES as u64)?;
        }
        // base - 4 <= index < base, so the lane is in 0..4.
        #[allow(clippy::cast_possible_truncation)]
        let lane = (self.base - 1 - self.index) as usize;
        let idx = self.index;
        self.index += 1;
        Some((idx, self.state[lane]))
    }
}
