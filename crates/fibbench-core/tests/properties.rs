//! Property-based tests for the evaluators and the term rewriter.
//!
//! Evaluators are checked against an unbounded `BigUint` reference reduced
//! modulo 2^w, independently of the in-crate oracle.

use num_bigint::BigUint;
use proptest::prelude::*;

use fibbench_core::algorithm::{Algorithm, Evaluator};
use fibbench_core::iterator::BatchedSequence;
use fibbench_core::kernel::{KernelBackend, ShiftAddKernel};
use fibbench_core::oracle::ModularOracle;
use fibbench_core::terms::{signed_fibonacci, TermRewriter};

fn exact(n: u64) -> BigUint {
    let mut a = BigUint::from(0u32);
    let mut b = BigUint::from(1u32);
    for _ in 0..n {
        let next = &a + &b;
        a = std::mem::replace(&mut b, next);
    }
    a
}

fn reduced(n: u64, bits: u32) -> BigUint {
    exact(n) % (BigUint::from(1u8) << bits)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    /// Every unbounded evaluator agrees with F(n) mod 2^64.
    #[test]
    fn evaluators_match_reference_u64(n in 0u64..600) {
        let expected = reduced(n, 64);
        for algo in Algorithm::<u64>::all(ShiftAddKernel::derive().unwrap()) {
            if algo.domain_limit().admits(n) {
                prop_assert_eq!(BigUint::from(algo.evaluate(n)), expected.clone(), "{} at {}", algo.name(), n);
            }
        }
    }

    /// Same for 32-bit words.
    #[test]
    fn evaluators_match_reference_u32(n in 0u64..600) {
        let expected = reduced(n, 32);
        for algo in Algorithm::<u32>::all(ShiftAddKernel::derive().unwrap()) {
            if algo.domain_limit().admits(n) {
                prop_assert_eq!(BigUint::from(algo.evaluate(n)), expected.clone(), "{} at {}", algo.name(), n);
            }
        }
    }

    /// F(n) + F(n+1) == F(n+2) in the ring, even far past wraparound.
    #[test]
    fn fast_doubling_recurrence(n in 0u64..u64::MAX - 2) {
        let f = |k| Algorithm::<u64>::FastDoubling.evaluate(k);
        prop_assert_eq!(f(n).wrapping_add(f(n + 1)), f(n + 2));
    }

    /// Both kernel backends produce the same sequence.
    #[test]
    fn kernel_backends_agree(n in 0u64..2000) {
        let kernel = ShiftAddKernel::<u64>::derive().unwrap();
        let lanes = Algorithm::BatchedSimd(kernel.with_backend(KernelBackend::Lanes));
        let scalar = Algorithm::BatchedSimd(kernel.with_backend(KernelBackend::Scalar));
        prop_assert_eq!(lanes.evaluate(n), scalar.evaluate(n));
        prop_assert_eq!(lanes.evaluate(n), Algorithm::FastDoubling.evaluate(n));
    }

    /// Expansions are terminal and reproduce F(base + target).
    #[test]
    fn expansion_preserves_value(target in -4i64..120, tail in 1i64..12, base in -6i64..40) {
        let expansion = TermRewriter::new(tail).unwrap().expand(target).unwrap();
        prop_assert!(expansion.terms.is_terminal());
        prop_assert_eq!(expansion.terms.evaluate_at(base), signed_fibonacci(base + target));
    }

    /// Phase 1 strictly lowers the largest offset; phase 2 never revisits it.
    #[test]
    fn trace_offsets_are_monotone(target in 0i64..80, tail in 1i64..8) {
        let expansion = TermRewriter::new(tail).unwrap().expand(target).unwrap();
        let offsets: Vec<i64> = expansion.trace.iter().map(|s| s.offset).collect();
        let (phase1, phase2): (Vec<_>, Vec<_>) = expansion
            .trace
            .iter()
            .partition(|s| s.walk.is_none());
        prop_assert_eq!(phase1.len() as i64, target + 1);
        prop_assert!(phase1.windows(2).all(|w| w[0].offset > w[1].offset));
        prop_assert!(phase2.windows(2).all(|w| w[0].offset > w[1].offset));
        prop_assert!(offsets.iter().all(|&k| k <= target));
    }

    /// The lazy sequence matches the oracle prefix.
    #[test]
    fn sequence_matches_oracle(count in 0usize..300) {
        let oracle = ModularOracle::<u32>::generate(count);
        let values: Vec<u32> = BatchedSequence::new(ShiftAddKernel::derive().unwrap())
            .take(count)
            .map(|(_, v)| v)
            .collect();
        prop_assert_eq!(values.as_slice(), oracle.values());
    }
}
