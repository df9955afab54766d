//! Algorithm factory and registry.

use crate::algorithm::{Algorithm, FibError};
use crate::constants::DEFAULT_TAIL_LIMIT;
use crate::kernel::{KernelBackend, ShiftAddKernel};
use crate::terms::TermRewriter;
use crate::word::Word;

/// Registry names, in report column order.
pub const ALGORITHM_NAMES: [&str; 5] = ["recursive", "linear", "matrix", "fast", "batched"];

/// Factory trait for creating algorithms.
pub trait AlgorithmFactory<W: Word>: Send + Sync {
    /// Create an algorithm by registry name.
    fn get(&self, name: &str) -> Result<Algorithm<W>, FibError>;

    /// List all available algorithm names.
    fn available(&self) -> Vec<&str>;
}

/// Default factory. The batched kernel is derived once, at construction.
#[derive(Debug, Clone, Copy)]
pub struct DefaultFactory<W: Word> {
    kernel: ShiftAddKernel<W>,
}

impl<W: Word> DefaultFactory<W> {
    /// Derive the kernel with the default tail limit and the given backend.
    pub fn new(backend: KernelBackend) -> Result<Self, FibError> {
        let rewriter = TermRewriter::new(DEFAULT_TAIL_LIMIT)?;
        Ok(Self {
            kernel: ShiftAddKernel::derive_with(&rewriter, backend)?,
        })
    }

    /// Use an already derived kernel.
    #[must_use]
    pub fn with_kernel(kernel: ShiftAddKernel<W>) -> Self {
        Self { kernel }
    }

    #[must_use]
    pub fn kernel(&self) -> &ShiftAddKernel<W> {
        &self.kernel
    }
}

impl<W: Word> AlgorithmFactory<W> for DefaultFactory<W> {
    fn get(&self, name: &str) -> Result<Algorithm<W>, FibError> {
        match name {
            "recursive" => Ok(Algorithm::Recursive),
            "linear" | "iterative" => Ok(Algorithm::LinearIterative),
            "matrix" => Ok(Algorithm::MatrixExponent),
            "fast" | "fastdoubling" => Ok(Algorithm::FastDoubling),
            "batched" | "simd" => Ok(Algorithm::BatchedSimd(self.kernel)),
            _ => Err(FibError::UnknownAlgorithm(name.to_string())),
        }
    }

    fn available(&self) -> Vec<&str> {
        ALGORITHM_NAMES.to_vec()
    }
}
