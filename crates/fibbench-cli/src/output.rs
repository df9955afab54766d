//! CLI output formatting.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use fibbench_core::word::Width;
use fibbench_orchestration::interfaces::{HarnessReport, Outcome};

use crate::ui::verdict_glyph;

/// Width of one algorithm column, separator included.
pub const COLUMN_WIDTH: usize = 18;

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.000_001 {
        format!("{}ns", d.as_nanos())
    } else if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// One table cell: `✔:<nanoseconds>|` or `---|`, right-aligned to
/// [`COLUMN_WIDTH`] visible characters.
#[must_use]
pub fn format_cell(outcome: &Outcome, colors: bool) -> String {
    match outcome {
        Outcome::NotApplicable => format!("{:>width$}", "---|", width = COLUMN_WIDTH),
        Outcome::Checked {
            duration, verdict, ..
        } => {
            let nanos = duration.as_nanos();
            format!(
                "{}:{nanos:>width$}|",
                verdict_glyph(*verdict, colors),
                width = COLUMN_WIDTH - 3
            )
        }
    }
}

/// Write the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an I/O error if the report cannot be serialized or the file
/// cannot be written.
pub fn write_json(path: &Path, report: &HarnessReport) -> io::Result<()> {
    let json = report.to_json().map_err(io::Error::from)?;
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "wrote JSON report");
    Ok(())
}

#[derive(Serialize)]
struct SequenceEntry {
    index: u64,
    value: u64,
}

#[derive(Serialize)]
struct SequenceDocument {
    width: Width,
    bits: u32,
    values: Vec<SequenceEntry>,
}

/// Write a generated `(index, value)` sequence as pretty-printed JSON.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn write_sequence_json(path: &Path, width: Width, values: &[(u64, u64)]) -> io::Result<()> {
    let document = SequenceDocument {
        width,
        bits: width.bits(),
        values: values
            .iter()
            .map(|&(index, value)| SequenceEntry { index, value })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&document).map_err(io::Error::from)?;
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), count = values.len(), "wrote JSON sequence");
    Ok(())
}
