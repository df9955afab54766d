//! # fibbench-orchestration
//!
//! Runs every selected evaluator at every oracle index, times each call,
//! and collects the verdicts into a report.

pub mod harness;
pub mod interfaces;
pub mod selection;
pub mod timing;

pub use harness::VerificationHarness;
pub use interfaces::{
    AlgorithmSummary, HarnessReport, IndexRow, NullProgressReporter, Outcome, ProgressReporter,
    Record, ResultPresenter, Verdict,
};
pub use selection::select_algorithms;
pub use timing::time;
