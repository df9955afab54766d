//! Matrix baseline: repeated multiplication by the Fibonacci Q matrix.
//!
//! `Q^n = [[F(n+1), F(n)], [F(n), F(n-1)]]`. The product is accumulated one
//! factor at a time starting from the identity, so the cost is O(n) matrix
//! multiplications. There is intentionally no square-and-multiply here; that
//! is what [`crate::fastdoubling`] is for.

use std::ops::Mul;

use crate::word::Word;

/// 2x2 matrix of machine words, multiplied with wrapping arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matrix2<W> {
    pub a: W, // [0][0]
    pub b: W, // [0][1]
    pub c: W, // [1][0]
    pub d: W, // [1][1]
}

impl<W: Word> Matrix2<W> {
    /// Create the identity matrix.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            a: W::one(),
            b: W::zero(),
            c: W::zero(),
            d: W::one(),
        }
    }

    /// Create the Fibonacci Q matrix [[1,1],[1,0]].
    #[must_use]
    pub fn fibonacci_q() -> Self {
        Self {
            a: W::one(),
            b: W::one(),
            c: W::one(),
            d: W::zero(),
        }
    }
}

impl<W: Word> Mul for Matrix2<W> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let dot = |x: W, y: W, z: W, w: W| x.wrapping_mul(&y).wrapping_add(&z.wrapping_mul(&w));
        Self {
            a: dot(self.a, rhs.a, self.b, rhs.c),
            b: dot(self.a, rhs.b, self.b, rhs.d),
            c: dot(self.c, rhs.a, self.d, rhs.c),
            d: dot(self.c, rhs.b, self.d, rhs.d),
        }
    }
}

/// F(n) mod 2^w, read from the off-diagonal of `Q^n`.
#[must_use]
pub fn fib<W: Word>(n: u64) -> W {
    let q = Matrix2::fibonacci_q();
    let mut power = Matrix2::identity();
    for _ in 0..n {
        power = power * q;
    }
    power.b
}
