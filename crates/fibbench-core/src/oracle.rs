//! Ground-truth Fibonacci table under fixed-width wraparound arithmetic.
//!
//! The oracle models hardware overflow: past the last exactly representable
//! index the stored values are F(n) mod 2^w, not the mathematical numbers.

use serde::Serialize;

use crate::algorithm::FibError;
use crate::constants::{MAX_FIB_U32, MAX_FIB_U64};
use crate::word::{Width, Word};

/// One `(index, value)` pair of the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OracleEntry<W> {
    /// Position in the sequence.
    pub index: u64,
    /// F(index) mod 2^w.
    pub value: W,
}

/// Ordered, append-only table of F(0..count) mod 2^w.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModularOracle<W: Word> {
    values: Vec<W>,
}

impl<W: Word> ModularOracle<W> {
    /// Generate `count` values by plain wrapping addition from F(0)=0, F(1)=1.
    ///
    /// Aborts if the table does not fit in memory. User-supplied sizes go
    /// through [`ModularOracle::try_generate`].
    #[must_use]
    pub fn generate(count: usize) -> Self {
        Self::fill(Vec::with_capacity(count), count)
    }

    /// Like [`ModularOracle::generate`], but reports a table that cannot be
    /// allocated as [`FibError::InvalidConfiguration`].
    pub fn try_generate(count: usize) -> Result<Self, FibError> {
        let mut values = Vec::new();
        values.try_reserve_exact(count).map_err(|err| {
            FibError::InvalidConfiguration(format!(
                "oracle of {count} entries cannot be allocated: {err}"
            ))
        })?;
        Ok(Self::fill(values, count))
    }

    fn fill(mut values: Vec<W>, count: usize) -> Self {
        let mut a = W::zero();
        let mut b = W::one();
        for _ in 0..count {
            values.push(a);
            let next = a.wrapping_add(&b);
            a = std::mem::replace(&mut b, next);
        }
        tracing::debug!(width = %W::WIDTH, count, "generated modular oracle");
        Self { values }
    }

    /// Value at `index`, if covered.
    #[must_use]
    pub fn get(&self, index: u64) -> Option<W> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.values.get(i).copied())
    }

    /// Number of covered indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if no index is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Width the table was generated for.
    #[must_use]
    pub fn width(&self) -> Width {
        W::WIDTH
    }

    /// Raw values, indexed by position.
    #[must_use]
    pub fn values(&self) -> &[W] {
        &self.values
    }

    /// Entries in index order.
    pub fn entries(&self) -> impl Iterator<Item = OracleEntry<W>> + '_ {
        (0u64..).zip(self.values.iter()).map(|(index, &value)| OracleEntry { index, value })
    }
}

/// Largest index whose Fibonacci value is exactly representable in `W`.
#[must_use]
pub fn last_exact_index<W: Word>() -> u64 {
    match W::WIDTH {
        Width::W32 => MAX_FIB_U32,
        Width::W64 => MAX_FIB_U64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FIB_TABLE;
    use num_bigint::BigUint;

    fn exact(n: u64) -> BigUint {
        let mut a = BigUint::from(0u32);
        let mut b = BigUint::from(1u32);
        for _ in 0..n {
            let next = &a + &b;
            a = std::mem::replace(&mut b, next);
        }
        a
    }

    #[test]
    fn seeds_and_recurrence_u64() {
        let oracle = ModularOracle::<u64>::generate(200);
        assert_eq!(oracle.get(0), Some(0));
        assert_eq!(oracle.get(1), Some(1));
        let v = oracle.values();
        for i in 2..v.len() {
            assert_eq!(v[i], v[i - 1].wrapping_add(v[i - 2]), "index {i}");
        }
    }

    #[test]
    fn seeds_and_recurrence_u32() {
        let oracle = ModularOracle::<u32>::generate(200);
        let v = oracle.values();
        assert_eq!(&v[..3], &[0, 1, 1]);
        for i in 2..v.len() {
            assert_eq!(v[i], v[i - 1].wrapping_add(v[i - 2]), "index {i}");
        }
    }

    #[test]
    fn matches_exact_table_in_range() {
        let oracle = ModularOracle::<u64>::generate(94);
        assert_eq!(oracle.values(), &FIB_TABLE[..]);
    }

    #[test]
    fn wraps_after_last_exact_index_u64() {
        let oracle = ModularOracle::<u64>::generate(100);
        let modulus = BigUint::from(1u8) << 64;
        assert_eq!(BigUint::from(oracle.get(93).unwrap()), exact(93));
        assert_ne!(BigUint::from(oracle.get(94).unwrap()), exact(94));
        assert_eq!(BigUint::from(oracle.get(94).unwrap()), exact(94) % &modulus);
        assert_eq!(BigUint::from(oracle.get(99).unwrap()), exact(99) % &modulus);
    }

    #[test]
    fn wraps_after_last_exact_index_u32() {
        let oracle = ModularOracle::<u32>::generate(60);
        let modulus = BigUint::from(1u8) << 32;
        assert_eq!(BigUint::from(oracle.get(47).unwrap()), exact(47));
        assert_ne!(BigUint::from(oracle.get(48).unwrap()), exact(48));
        assert_eq!(BigUint::from(oracle.get(48).unwrap()), exact(48) % &modulus);
    }

    #[test]
    fn last_exact_index_per_width() {
        assert_eq!(last_exact_index::<u32>(), 47);
        assert_eq!(last_exact_index::<u64>(), 93);
    }

    #[test]
    fn get_out_of_range() {
        let oracle = ModularOracle::<u64>::generate(10);
        assert_eq!(oracle.get(10), None);
        assert_eq!(oracle.get(u64::MAX), None);
    }

    #[test]
    fn try_generate_matches_generate() {
        let fallible = ModularOracle::<u32>::try_generate(60).unwrap();
        assert_eq!(fallible, ModularOracle::<u32>::generate(60));
    }

    #[test]
    fn try_generate_rejects_unallocatable_table() {
        let err = ModularOracle::<u64>::try_generate(usize::MAX).unwrap_err();
        assert!(matches!(err, FibError::InvalidConfiguration(_)));
        let err = ModularOracle::<u64>::try_generate(100_000_000_000_001).unwrap_err();
        assert!(err.to_string().contains("cannot be allocated"));
    }

    #[test]
    fn empty_oracle() {
        let oracle = ModularOracle::<u64>::generate(0);
        assert!(oracle.is_empty());
        assert_eq!(oracle.entries().count(), 0);
    }

    #[test]
    fn entries_are_index_ordered() {
        let oracle = ModularOracle::<u32>::generate(8);
        let entries: Vec<_> = oracle.entries().collect();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[7], OracleEntry { index: 7, value: 13 });
        assert!(entries.windows(2).all(|w| w[0].index + 1 == w[1].index));
        assert_eq!(oracle.width(), Width::W32);
    }
}
