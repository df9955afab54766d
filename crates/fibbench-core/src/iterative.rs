//! Linear iteration with two rolling registers.

use crate::word::Word;

/// F(n) mod 2^w in `n` wrapping additions.
#[must_use]
pub fn fib<W: Word>(n: u64) -> W {
    let mut a = W::zero();
    let mut b = W::one();
    for _ in 0..n {
        let next = a.wrapping_add(&b);
        a = std::mem::replace(&mut b, next);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FIB_TABLE;

    #[test]
    fn zero_and_one() {
        assert_eq!(fib::<u64>(0), 0);
        assert_eq!(fib::<u64>(1), 1);
    }

    #[test]
    fn ten_is_fifty_five() {
        assert_eq!(fib::<u64>(10), 55);
        assert_eq!(fib::<u32>(10), 55);
    }

    #[test]
    fn exact_range() {
        for (n, &expected) in FIB_TABLE.iter().enumerate() {
            assert_eq!(fib::<u64>(n as u64), expected);
        }
    }

    #[test]
    fn wraps_past_u32() {
        // F(48) = 4807526976 = 2^32 + 512559680.
        assert_eq!(fib::<u32>(48), 512_559_680);
    }
}
