//! Application configuration from CLI flags and environment.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use fibbench_core::algorithm::FibError;
use fibbench_core::constants::{DEFAULT_MAX_INDEX, DEFAULT_TAIL_LIMIT};
use fibbench_core::kernel::KernelBackend;
use fibbench_core::word::Width;

/// fibbench: Fibonacci evaluators verified against a fixed-width oracle.
#[derive(Parser, Debug)]
#[command(name = "fibbench", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Machine word width in bits (32 or 64).
    #[arg(long, default_value_t = 64, env = "FIBBENCH_WIDTH")]
    pub width: u32,

    /// Largest index to verify (inclusive).
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_INDEX, env = "FIBBENCH_MAX_INDEX")]
    pub max_index: u64,

    /// Algorithms to run: comma list of recursive, linear, matrix, fast, batched, or all.
    #[arg(long, default_value = "all")]
    pub algo: String,

    /// Check index rows in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Write the report as JSON (the derivation with --terms, the sequence with --generate).
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Quiet mode (only the verdict).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Pin the measuring thread to the first CPU core.
    #[arg(long)]
    pub pin_core: bool,

    /// Execution backend of the batched kernel.
    #[arg(long, value_enum, default_value_t = BackendChoice::Auto)]
    pub backend: BackendChoice,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,

    /// Print the power-of-two expansion of F(n + TARGET) instead of benchmarking.
    #[arg(long, allow_negative_numbers = true)]
    pub terms: Option<i64>,

    /// Tail limit for --terms.
    #[arg(long, default_value_t = DEFAULT_TAIL_LIMIT, allow_negative_numbers = true)]
    pub tail_limit: i64,

    /// Show every intermediate map of the derivation.
    #[arg(long)]
    pub trace: bool,

    /// Print the first COUNT values from the batched kernel instead of benchmarking.
    #[arg(long)]
    pub generate: Option<usize>,
}

/// `--backend` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendChoice {
    /// Detect from CPU features.
    Auto,
    Lanes,
    Scalar,
}

impl BackendChoice {
    #[must_use]
    pub fn resolve(self) -> KernelBackend {
        match self {
            Self::Auto => KernelBackend::detect(),
            Self::Lanes => KernelBackend::Lanes,
            Self::Scalar => KernelBackend::Scalar,
        }
    }
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// The selected machine width.
    pub fn word_width(&self) -> Result<Width, FibError> {
        Width::from_bits(self.width).ok_or_else(|| {
            FibError::InvalidConfiguration(format!(
                "unsupported width {}: expected 32 or 64",
                self.width
            ))
        })
    }

    /// Number of oracle entries: indices `0..=max_index`.
    pub fn oracle_len(&self) -> Result<usize, FibError> {
        self.max_index
            .checked_add(1)
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| {
                FibError::InvalidConfiguration(format!(
                    "max index {} is too large",
                    self.max_index
                ))
            })
    }
}
