//! Portable fixed-width vector of machine words.
//!
//! Offers the handful of lane operations the batched kernel needs
//! (broadcast, per-lane shift, mask, add) on a plain array.
//! Every operation is a fixed-length loop over `N` lanes with no branches,
//! so the SLP vectorizer can fuse the lanes into one register. Per-lane
//! variable shifts only exist from AVX2 on x86_64 (NEON is baseline on
//! aarch64); without them the loops stay scalar. See
//! [`crate::kernel::VECTOR_UNIT_ENABLED`].

use std::ops::{Add, BitAnd};

use crate::word::Word;

/// `N` lanes of `W`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Lanes<W, const N: usize>([W; N]);

impl<W: Word, const N: usize> Lanes<W, N> {
    /// All lanes zero.
    #[inline(always)]
    #[must_use]
    pub fn zero() -> Self {
        Self([W::zero(); N])
    }

    /// Broadcast one value to every lane.
    #[inline(always)]
    #[must_use]
    pub fn splat(value: W) -> Self {
        Self([value; N])
    }

    #[inline(always)]
    #[must_use]
    pub fn from_array(lanes: [W; N]) -> Self {
        Self(lanes)
    }

    #[inline(always)]
    #[must_use]
    pub fn to_array(self) -> [W; N] {
        self.0
    }

    /// Shift each lane left by its own amount, wrapping out high bits.
    ///
    /// Amounts must be below `W::BITS`; the kernel guarantees this.
    #[inline(always)]
    #[must_use]
    pub fn shl_lanes(self, amounts: [u32; N]) -> Self {
        let mut out = self.0;
        for (lane, amount) in out.iter_mut().zip(amounts) {
            *lane = lane.wrapping_shl(amount);
        }
        Self(out)
    }
}

impl<W: Word, const N: usize> Add for Lanes<W, N> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (lane, other) in out.iter_mut().zip(rhs.0) {
            *lane = lane.wrapping_add(&other);
        }
        Self(out)
    }
}

impl<W: Word, const N: usize> BitAnd for Lanes<W, N> {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (lane, other) in out.iter_mut().zip(rhs.0) {
            *lane = *lane & other;
        }
        Self(out)
    }
}
