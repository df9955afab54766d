//! # fibbench-core
//!
//! Core library for the fibbench Fibonacci evaluator benchmark.
//! Implements the modular oracle, the power-of-two term rewriter, and five
//! fixed-width evaluators, including a batched shift/add kernel derived from
//! the rewriter's output.

pub mod algorithm;
pub mod batched;
pub mod constants;
pub mod fastdoubling;
pub mod iterative;
pub mod iterator;
pub mod kernel;
pub mod lanes;
pub mod matrix;
pub mod oracle;
pub mod recursive;
pub mod registry;
pub mod terms;
pub mod word;

// Re-exports
pub use algorithm::{Algorithm, DomainLimit, Evaluator, FibError};
pub use constants::{
    exit_codes, BATCH_LANES, DEFAULT_MAX_INDEX, DEFAULT_TAIL_LIMIT, FIB_TABLE, MAX_FIB_U32,
    MAX_FIB_U64, RECURSIVE_DOMAIN_LIMIT,
};
pub use iterator::BatchedSequence;
pub use kernel::{KernelBackend, ShiftAddKernel};
pub use oracle::{last_exact_index, ModularOracle, OracleEntry};
pub use registry::{AlgorithmFactory, DefaultFactory, ALGORITHM_NAMES};
pub use terms::{Expansion, Phase, RewriteStep, TermMap, TermRewriter, Walk};
pub use word::{Width, Word};

/// Compute F(n) mod 2^w using fast doubling.
///
/// For the other evaluators, use [`Algorithm`] through [`Evaluator`].
///
/// # Example
/// ```
/// assert_eq!(fibbench_core::fibonacci::<u64>(10), 55);
/// assert_eq!(fibbench_core::fibonacci::<u32>(0), 0);
/// ```
#[must_use]
pub fn fibonacci<W: Word>(n: u64) -> W {
    fastdoubling::fib(n)
}
