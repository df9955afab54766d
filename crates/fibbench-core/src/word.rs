//! Machine words and the runtime width selector.
//!
//! Every evaluator and the oracle are generic over [`Word`], which is only
//! implemented for `u32` and `u64`. All arithmetic goes through the wrapping
//! operations, so overflow is the defined modular behaviour rather than a
//! panic in debug builds.

use std::fmt;

use num_traits::{PrimInt, Unsigned, WrappingAdd, WrappingMul, WrappingShl, WrappingSub};
use serde::{Deserialize, Serialize};

/// An unsigned machine word usable for wraparound Fibonacci arithmetic.
pub trait Word:
    PrimInt
    + Unsigned
    + WrappingAdd
    + WrappingSub
    + WrappingMul
    + WrappingShl
    + Into<u64>
    + fmt::Debug
    + fmt::Display
    + Default
    + Send
    + Sync
    + 'static
{
    /// Width in bits.
    const BITS: u32;

    /// The runtime selector matching this word.
    const WIDTH: Width;

    /// Reduce a `u64` modulo `2^BITS`.
    fn from_u64_wrapping(value: u64) -> Self;

    /// Widen to `u64` for reporting.
    fn widen(self) -> u64 {
        self.into()
    }
}

impl Word for u32 {
    const BITS: u32 = u32::BITS;
    const WIDTH: Width = Width::W32;

    #[allow(clippy::cast_possible_truncation)]
    fn from_u64_wrapping(value: u64) -> Self {
        value as u32
    }
}

impl Word for u64 {
    const BITS: u32 = u64::BITS;
    const WIDTH: Width = Width::W64;

    fn from_u64_wrapping(value: u64) -> Self {
        value
    }
}

/// Runtime choice of machine width. One run uses exactly one width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Width {
    /// 32-bit words, arithmetic modulo 2^32.
    W32,
    /// 64-bit words, arithmetic modulo 2^64.
    W64,
}

impl Width {
    /// Number of bits in the word.
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    /// Parse a bit count; only 32 and 64 are supported.
    #[must_use]
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(Self::W32),
            64 => Some(Self::W64),
            _ => None,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// `true` when `value` is zero or a power of two.
///
/// Zero counts because a coefficient walked down to zero denotes a vanished
/// term, which needs no further normalization.
#[must_use]
pub fn is_power_of_two_or_zero(value: u128) -> bool {
    value & value.wrapping_sub(1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_widths() {
        assert_eq!(<u32 as Word>::BITS, 32);
        assert_eq!(<u64 as Word>::BITS, 64);
        assert_eq!(<u32 as Word>::WIDTH, Width::W32);
        assert_eq!(<u64 as Word>::WIDTH, Width::W64);
    }

    #[test]
    fn from_u64_wraps_for_u32() {
        assert_eq!(u32::from_u64_wrapping(u64::from(u32::MAX) + 6), 5);
        assert_eq!(u64::from_u64_wrapping(u64::MAX), u64::MAX);
    }

    #[test]
    fn widen_preserves_value() {
        assert_eq!(7u32.widen(), 7);
        assert_eq!(u64::MAX.widen(), u64::MAX);
    }

    #[test]
    fn width_from_bits() {
        assert_eq!(Width::from_bits(32), Some(Width::W32));
        assert_eq!(Width::from_bits(64), Some(Width::W64));
        assert_eq!(Width::from_bits(16), None);
        assert_eq!(Width::W64.to_string(), "64-bit");
    }

    #[test]
    fn power_of_two_includes_zero() {
        assert!(is_power_of_two_or_zero(0));
        assert!(is_power_of_two_or_zero(1));
        assert!(is_power_of_two_or_zero(2));
        assert!(is_power_of_two_or_zero(1 << 100));
        assert!(!is_power_of_two_or_zero(3));
        assert!(!is_power_of_two_or_zero(5));
        assert!(!is_power_of_two_or_zero(u128::MAX));
    }
}
