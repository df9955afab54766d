//! The evaluator contract, the closed algorithm set, and the error type.
//!
//! `Evaluator` is the trait consumed by orchestration.
//! `Algorithm` is the closed set of built-in evaluators; dispatch is a
//! `match`, and the batched variant carries its kernel by value.

use std::fmt;

use serde::Serialize;

use crate::batched;
use crate::constants::RECURSIVE_DOMAIN_LIMIT;
use crate::fastdoubling;
use crate::iterative;
use crate::kernel::ShiftAddKernel;
use crate::matrix;
use crate::recursive;
use crate::word::Word;

/// Error type for evaluation, rewriting, and configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FibError {
    /// An index was outside an evaluator's domain.
    #[error("{algorithm} does not admit index {index} (limit {limit})")]
    DomainExceeded {
        algorithm: &'static str,
        index: u64,
        limit: u64,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    InvalidConfiguration(String),

    /// A rewrite coefficient left the `u128` range.
    #[error("coefficient overflow at offset {offset}")]
    CoefficientOverflow { offset: i64 },

    /// A terminal expansion cannot drive the shift/add kernel.
    #[error("kernel derivation failed: {0}")]
    Kernel(String),

    /// Unknown algorithm name.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// At least one checked cell disagreed with the oracle.
    #[error("{failures} result(s) disagree with the oracle")]
    Mismatch { failures: usize },
}

/// Range of indices an evaluator may be called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DomainLimit {
    /// Every index is admitted.
    Unbounded,
    /// Indices strictly below the limit are admitted.
    Below(u64),
}

impl DomainLimit {
    #[must_use]
    pub fn admits(self, index: u64) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Below(limit) => index < limit,
        }
    }
}

impl fmt::Display for DomainLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Below(limit) => write!(f, "< {limit}"),
        }
    }
}

/// Anything that evaluates F(index) mod 2^w.
pub trait Evaluator<W: Word>: Send + Sync {
    /// Display name.
    fn name(&self) -> &'static str;

    /// Indices this evaluator may be called with.
    fn domain_limit(&self) -> DomainLimit;

    /// F(index) mod 2^w. Callers are responsible for the domain check.
    fn evaluate(&self, index: u64) -> W;

    /// Like [`Evaluator::evaluate`], but rejects indices outside the domain.
    fn try_evaluate(&self, index: u64) -> Result<W, FibError> {
        match self.domain_limit() {
            DomainLimit::Below(limit) if index >= limit => Err(FibError::DomainExceeded {
                algorithm: self.name(),
                index,
                limit,
            }),
            _ => Ok(self.evaluate(index)),
        }
    }
}

/// The built-in evaluators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm<W: Word> {
    /// Two-way self-recursion, exponential time.
    Recursive,
    /// Two rolling registers, O(n).
    LinearIterative,
    /// Repeated multiplication by the Q matrix, O(n).
    MatrixExponent,
    /// Doubling identities over the bits of the index, O(log n).
    FastDoubling,
    /// Four terms per step through a derived shift/add kernel.
    BatchedSimd(ShiftAddKernel<W>),
}

impl<W: Word> Algorithm<W> {
    /// All five evaluators, in report column order.
    #[must_use]
    pub fn all(kernel: ShiftAddKernel<W>) -> [Self; 5] {
        [
            Self::Recursive,
            Self::LinearIterative,
            Self::MatrixExponent,
            Self::FastDoubling,
            Self::BatchedSimd(kernel),
        ]
    }
}

impl<W: Word> Evaluator<W> for Algorithm<W> {
    fn name(&self) -> &'static str {
        match self {
            Self::Recursive => "Recursive",
            Self::LinearIterative => "LinearIterative",
            Self::MatrixExponent => "MatrixExponent",
            Self::FastDoubling => "FastDoubling",
            Self::BatchedSimd(_) => "BatchedSimd",
        }
    }

    fn domain_limit(&self) -> DomainLimit {
        match self {
            Self::Recursive => DomainLimit::Below(RECURSIVE_DOMAIN_LIMIT),
            _ => DomainLimit::Unbounded,
        }
    }

    #[inline]
    fn evaluate(&self, index: u64) -> W {
        match self {
            Self::Recursive => recursive::fib(index),
            Self::LinearIterative => iterative::fib(index),
            Self::MatrixExponent => matrix::fib(index),
            Self::FastDoubling => fastdoubling::fib(index),
            Self::BatchedSimd(kernel) => batched::fib(kernel, index),
        }
    }
}
