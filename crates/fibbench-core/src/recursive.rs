//! Naive two-way recursion.
//!
//! Runs in time proportional to F(n), which is why the algorithm carries a
//! domain limit and the harness never calls it past that limit.

use crate::word::Word;

/// F(n) mod 2^w by direct recursion on the recurrence.
#[must_use]
pub fn fib<W: Word>(n: u64) -> W {
    if n < 2 {
        return W::from_u64_wrapping(n);
    }
    fib::<W>(n - 1).wrapping_add(&fib::<W>(n - 2))
}
