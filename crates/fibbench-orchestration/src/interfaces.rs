//! Orchestration interfaces and the report data model.

use std::time::Duration;

use serde::{Serialize, Serializer};

use fibbench_core::terms::Expansion;
use fibbench_core::word::Width;

/// Trait for reporting harness progress to the user.
pub trait ProgressReporter: Send + Sync {
    /// A run over `total` index rows is starting.
    fn start(&self, total: u64);

    /// Row `index` finished; `done` rows out of `total` are complete.
    fn report(&self, index: u64, done: u64, total: u64);

    /// Report completion.
    fn complete(&self);
}

/// Trait for presenting results to the user.
pub trait ResultPresenter {
    /// Present a full verification report.
    fn present_report(&self, report: &HarnessReport);

    /// Present a term expansion, optionally with every intermediate map.
    fn present_expansion(&self, expansion: &Expansion, show_trace: bool);

    /// Present `(index, value)` pairs of a generated sequence.
    fn present_sequence(&self, width: Width, values: &[(u64, u64)]);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Null progress reporter (does nothing).
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn start(&self, _total: u64) {}
    fn report(&self, _index: u64, _done: u64, _total: u64) {}
    fn complete(&self) {}
}

/// Result of comparing one evaluation with the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

/// One cell of the report: an algorithm at an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The index is outside the algorithm's domain; it was not invoked.
    NotApplicable,
    /// The algorithm was invoked once and compared with the oracle.
    Checked {
        #[serde(rename = "duration_ns", serialize_with = "serialize_nanos")]
        duration: Duration,
        /// Returned value, widened to `u64`.
        value: u64,
        verdict: Verdict,
    },
}

impl Outcome {
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::NotApplicable => None,
            Self::Checked { verdict, .. } => Some(*verdict),
        }
    }

    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::NotApplicable => None,
            Self::Checked { duration, .. } => Some(*duration),
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_nanos<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
}

/// All cells for one index, in algorithm column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexRow {
    pub index: u64,
    /// Oracle value, widened to `u64`.
    pub expected: u64,
    pub cells: Vec<Outcome>,
}

/// Flat view of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub algorithm: &'a str,
    pub index: u64,
    pub duration: Option<Duration>,
    pub verdict: Option<Verdict>,
}

/// Per-algorithm totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlgorithmSummary {
    pub algorithm: String,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    #[serde(rename = "total_ns", serialize_with = "serialize_nanos")]
    pub total: Duration,
}

/// Complete result of a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarnessReport {
    pub width: Width,
    /// Column names.
    pub algorithms: Vec<String>,
    pub rows: Vec<IndexRow>,
}

impl HarnessReport {
    /// `true` if no checked cell failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures() == 0
    }

    /// Number of failed cells.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| &row.cells)
            .filter(|cell| cell.verdict() == Some(Verdict::Fail))
            .count()
    }

    /// Every cell, row by row.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.rows.iter().flat_map(move |row| {
            self.algorithms
                .iter()
                .zip(&row.cells)
                .map(move |(algorithm, cell)| Record {
                    algorithm: algorithm.as_str(),
                    index: row.index,
                    duration: cell.duration(),
                    verdict: cell.verdict(),
                })
        })
    }

    /// Totals per algorithm column.
    #[must_use]
    pub fn summaries(&self) -> Vec<AlgorithmSummary> {
        let mut summaries: Vec<AlgorithmSummary> = self
            .algorithms
            .iter()
            .map(|name| AlgorithmSummary {
                algorithm: name.clone(),
                passed: 0,
                failed: 0,
                skipped: 0,
                total: Duration::ZERO,
            })
            .collect();

        for row in &self.rows {
            for (summary, cell) in summaries.iter_mut().zip(&row.cells) {
                match cell {
                    Outcome::NotApplicable => summary.skipped += 1,
                    Outcome::Checked {
                        duration, verdict, ..
                    } => {
                        summary.total += *duration;
                        match verdict {
                            Verdict::Pass => summary.passed += 1,
                            Verdict::Fail => summary.failed += 1,
                        }
                    }
                }
            }
        }
        summaries
    }

    /// Pretty-printed JSON with rows and summaries.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Document<'a> {
            #[serde(flatten)]
            report: &'a HarnessReport,
            summaries: Vec<AlgorithmSummary>,
            all_passed: bool,
        }

        serde_json::to_string_pretty(&Document {
            report: self,
            summaries: self.summaries(),
            all_passed: self.all_passed(),
        })
    }
}
