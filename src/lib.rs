//! Shared fixtures for the workspace-level integration tests.

use serde::Deserialize;

/// Golden file of fixed-width Fibonacci values.
#[derive(Debug, Deserialize)]
pub struct GoldenData {
    pub description: String,
    pub values: Vec<GoldenEntry>,
}

/// F(n) reduced to both supported widths.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GoldenEntry {
    pub n: u64,
    pub u64: u64,
    pub u32: u32,
}

/// Load `tests/testdata/oracle_golden.json`.
///
/// # Panics
///
/// Panics if the file is missing or malformed.
#[must_use]
pub fn load_golden_data() -> GoldenData {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/testdata/oracle_golden.json");
    let data = std::fs::read_to_string(path).expect("failed to read golden file");
    serde_json::from_str(&data).expect("failed to parse golden JSON")
}
