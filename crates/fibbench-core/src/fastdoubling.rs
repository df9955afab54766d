//! Fast doubling in a single machine word.
//!
//! Uses the doubling identities:
//!   F(2k)   = F(k) * (2*F(k+1) - F(k))
//!   F(2k+1) = F(k+1)^2 + F(k)^2
//!
//! Iterates from MSB to LSB of the index. Every operation wraps, and the
//! identities hold modulo 2^w, so results stay exact in the ring even after
//! the true values overflow.

use crate::word::Word;

/// F(n) mod 2^w in O(log n) word operations.
#[must_use]
pub fn fib<W: Word>(n: u64) -> W {
    let num_bits = 64 - n.leading_zeros();
    let mut fk = W::zero();
    let mut fk1 = W::one();

    for i in (0..num_bits).rev() {
        // t = 2*F(k+1) - F(k)
        let t = fk1.wrapping_add(&fk1).wrapping_sub(&fk);
        let f2k = fk.wrapping_mul(&t);
        let f2k1 = fk1.wrapping_mul(&fk1).wrapping_add(&fk.wrapping_mul(&fk));

        if (n >> i) & 1 == 1 {
            // Advance by one: (F(2k+1), F(2k+2)).
            fk = f2k1;
            fk1 = f2k.wrapping_add(&f2k1);
        } else {
            fk = f2k;
            fk1 = f2k1;
        }
    }

    fk
}
