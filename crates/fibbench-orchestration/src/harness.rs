//! Verification harness: every algorithm at every oracle index.
//!
//! An index outside an algorithm's domain is recorded as
//! [`Outcome::NotApplicable`] and the evaluator is never called for it.
//! Mismatches are recorded and logged; they never abort the run.

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use fibbench_core::algorithm::Evaluator;
use fibbench_core::oracle::ModularOracle;
use fibbench_core::word::Word;

use crate::interfaces::{HarnessReport, IndexRow, Outcome, ProgressReporter, Verdict};
use crate::timing::time;

/// Cross-checks a set of evaluators against an oracle.
pub struct VerificationHarness<'a, W: Word, E: Evaluator<W>> {
    oracle: &'a ModularOracle<W>,
    algorithms: &'a [E],
}

impl<'a, W: Word, E: Evaluator<W>> VerificationHarness<'a, W, E> {
    #[must_use]
    pub fn new(oracle: &'a ModularOracle<W>, algorithms: &'a [E]) -> Self {
        Self { oracle, algorithms }
    }

    /// Check every index in order on the calling thread.
    pub fn run(&self, reporter: &dyn ProgressReporter) -> HarnessReport {
        let total = self.oracle.len() as u64;
        tracing::info!(width = %W::WIDTH, rows = total, algorithms = self.algorithms.len(), "harness started");
        reporter.start(total);

        let rows: Vec<IndexRow> = self
            .oracle
            .entries()
            .map(|entry| {
                let row = self.check_row(entry.index, entry.value);
                reporter.report(entry.index, entry.index + 1, total);
                row
            })
            .collect();

        reporter.complete();
        self.finish(rows)
    }

    /// Check index rows concurrently, one task per row.
    ///
    /// Row order in the report is the index order regardless of scheduling.
    pub fn run_parallel(&self, reporter: &dyn ProgressReporter) -> HarnessReport {
        let total = self.oracle.len() as u64;
        tracing::info!(width = %W::WIDTH, rows = total, algorithms = self.algorithms.len(), "parallel harness started");
        reporter.start(total);
        let done = AtomicU64::new(0);

        let rows: Vec<IndexRow> = self
            .oracle
            .values()
            .par_iter()
            .enumerate()
            .map(|(i, &expected)| {
                let index = i as u64;
                let row = self.check_row(index, expected);
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                reporter.report(index, finished, total);
                row
            })
            .collect();

        reporter.complete();
        self.finish(rows)
    }

    fn check_row(&self, index: u64, expected: W) -> IndexRow {
        let cells = self
            .algorithms
            .iter()
            .map(|algorithm| Self::check_cell(algorithm, index, expected))
            .collect();
        IndexRow {
            index,
            expected: expected.widen(),
            cells,
        }
    }

    fn check_cell(algorithm: &E, index: u64, expected: W) -> Outcome {
        if !algorithm.domain_limit().admits(index) {
            return Outcome::NotApplicable;
        }

        let (duration, value) = time(|| algorithm.evaluate(index));
        tracing::trace!(algorithm = algorithm.name(), index, ?duration, "evaluated");

        let verdict = if value == expected {
            Verdict::Pass
        } else {
            tracing::warn!(
                algorithm = algorithm.name(),
                index,
                %expected,
                %value,
                "result disagrees with oracle"
            );
            Verdict::Fail
        };

        Outcome::Checked {
            duration,
            value: value.widen(),
            verdict,
        }
    }

    fn finish(&self, rows: Vec<IndexRow>) -> HarnessReport {
        let report = HarnessReport {
            width: W::WIDTH,
            algorithms: self
                .algorithms
                .iter()
                .map(|algorithm| algorithm.name().to_string())
                .collect(),
            rows,
        };
        tracing::info!(failures = report.failures(), "harness finished");
        report
    }
}
