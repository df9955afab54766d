//! CLI result presenter and progress bar.

use std::fmt::Write as _;

use indicatif::{ProgressBar, ProgressStyle};

use fibbench_core::terms::{Expansion, Phase, Walk};
use fibbench_core::word::Width;
use fibbench_orchestration::interfaces::{HarnessReport, ProgressReporter, ResultPresenter};

use crate::output::{format_cell, format_duration, format_number, COLUMN_WIDTH};
use crate::system::cpu_model;
use crate::ui::{is_color_disabled, print_error, print_success};

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
    colors: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            colors: !is_color_disabled() && console::colors_enabled(),
        }
    }

    /// Override color detection.
    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }
}

/// The verification table: CPU brand, header, one row per index, summaries.
#[must_use]
pub fn render_report(report: &HarnessReport, cpu: &str, colors: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{cpu}");
    let _ = writeln!(out, "Width: {}", report.width);

    let _ = write!(out, "{:<8}|", "n");
    for name in &report.algorithms {
        let _ = write!(out, "{name:>width$}", width = COLUMN_WIDTH);
    }
    out.push('\n');

    for row in &report.rows {
        let _ = write!(out, "{:<8}|", row.index);
        for cell in &row.cells {
            out.push_str(&format_cell(cell, colors));
        }
        out.push('\n');
    }

    out.push('\n');
    for summary in report.summaries() {
        let _ = writeln!(
            out,
            "{:<18} passed {:>4}  failed {:>4}  skipped {:>4}  total {}",
            summary.algorithm,
            summary.passed,
            summary.failed,
            summary.skipped,
            format_duration(summary.total),
        );
    }
    out
}

/// A derivation: the final identity and, optionally, every step.
#[must_use]
pub fn render_expansion(expansion: &Expansion, show_trace: bool) -> String {
    let mut out = String::new();
    let target = term_name(expansion.target);
    let _ = writeln!(
        out,
        "{target} = {}   (tail limit {})",
        expansion.terms, expansion.tail_limit
    );
    if !show_trace {
        return out;
    }

    for (i, step) in expansion.trace.iter().enumerate() {
        let rule = match (step.phase, step.walk) {
            (Phase::PositivityElimination, _) => "positivity",
            (Phase::PowerOfTwoNormalization, Some(Walk::Settling)) => "settling",
            (Phase::PowerOfTwoNormalization, _) => "nearest",
        };
        let _ = writeln!(
            out,
            "{:>4}. {rule:<10} {:>8} x{:<6} -> {}",
            i + 1,
            term_name(step.offset),
            step.units,
            step.terms
        );
    }
    out
}

fn term_name(offset: i64) -> String {
    match offset {
        0 => "F(n)".to_string(),
        k => format!("F(n{k:+})"),
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_report(&self, report: &HarnessReport) {
        let failures = report.failures();
        if self.quiet {
            if failures == 0 {
                println!("PASS");
            } else {
                println!("FAIL {failures}");
            }
            return;
        }

        print!("{}", render_report(report, &cpu_model(), self.colors));
        if self.verbose {
            let checked: usize = report
                .summaries()
                .iter()
                .map(|summary| summary.passed + summary.failed)
                .sum();
            println!("Checked cells: {}", format_number(checked as u64));
        }
        if failures == 0 {
            print_success("all results match the oracle");
        } else {
            print_error(&format!("{failures} result(s) disagree with the oracle"));
        }
    }

    fn present_expansion(&self, expansion: &Expansion, show_trace: bool) {
        print!("{}", render_expansion(expansion, show_trace && !self.quiet));
    }

    fn present_sequence(&self, width: Width, values: &[(u64, u64)]) {
        if !self.quiet {
            println!("# F(n) mod 2^{}", width.bits());
        }
        for (index, value) in values {
            println!("{index}\t{value}");
        }
    }

    fn present_error(&self, error: &str) {
        print_error(error);
    }
}

/// Progress bar over index rows.
pub struct CLIProgressReporter {
    bar: ProgressBar,
}

impl CLIProgressReporter {
    /// A visible bar on stderr, or a hidden one when `enabled` is false.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} rows ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressReporter for CLIProgressReporter {
    fn start(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn report(&self, _index: u64, done: u64, _total: u64) {
        self.bar.set_position(done);
    }

    fn complete(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use fibbench_core::terms::TermRewriter;
    use fibbench_orchestration::interfaces::{IndexRow, Outcome, Verdict};

    fn report() -> HarnessReport {
        HarnessReport {
            width: Width::W64,
            algorithms: vec!["Recursive".into(), "FastDoubling".into()],
            rows: vec![
                IndexRow {
                    index: 29,
                    expected: 514_229,
                    cells: vec![
                        Outcome::Checked {
                            duration: Duration::from_nanos(900),
                            value: 514_229,
                            verdict: Verdict::Pass,
                        },
                        Outcome::Checked {
                            duration: Duration::from_nanos(12),
                            value: 514_229,
                            verdict: Verdict::Pass,
                        },
                    ],
                },
                IndexRow {
                    index: 30,
                    expected: 832_040,
                    cells: vec![
                        Outcome::NotApplicable,
                        Outcome::Checked {
                            duration: Duration::from_nanos(15),
                            value: 1,
                            verdict: Verdict::Fail,
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn report_table_layout() {
        let text = render_report(&report(), "Test CPU", false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Test CPU");
        assert_eq!(lines[1], "Width: 64-bit");
        assert!(lines[2].starts_with("n       |"));
        assert!(lines[2].ends_with("      FastDoubling"));
        assert!(lines[3].starts_with("29      |\u{2714}:"));
        assert!(lines[4].contains("---|\u{2717}:"));
        assert_eq!(lines[4].chars().count(), 9 + 2 * COLUMN_WIDTH);
        assert!(text.contains("Recursive          passed    1  failed    0  skipped    1"));
    }

    #[test]
    fn expansion_rendering() {
        let expansion = TermRewriter::new(4).unwrap().expand(3).unwrap();
        let short = render_expansion(&expansion, false);
        assert_eq!(
            short,
            "F(n+3) = 1*F(n-3) + 4*F(n-2) + 4*F(n-1)   (tail limit 4)\n"
        );

        let full = render_expansion(&expansion, true);
        let lines: Vec<&str> = full.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[1].contains("positivity"));
        assert!(lines[1].contains("F(n+3)"));
        assert!(lines[4].contains("F(n)"));
        assert!(lines[5].contains("settling"));
        assert!(lines[5].ends_with("1*F(n-3) + 4*F(n-2) + 4*F(n-1)"));
    }

    #[test]
    fn presenter_modes_do_not_panic() {
        let expansion = TermRewriter::new(4).unwrap().expand(5).unwrap();
        for (verbose, quiet) in [(false, false), (true, false), (false, true)] {
            let presenter = CLIResultPresenter::new(verbose, quiet).with_colors(false);
            presenter.present_expansion(&expansion, true);
            presenter.present_sequence(Width::W32, &[(0, 0), (1, 1)]);
            presenter.present_error("test error message");
        }
    }

    #[test]
    fn hidden_progress_reporter() {
        let reporter = CLIProgressReporter::new(false);
        reporter.start(10);
        reporter.report(4, 5, 10);
        assert_eq!(reporter.bar.position(), 5);
        reporter.complete();
    }
}
