//! Algorithm selection logic.

use fibbench_core::algorithm::{Algorithm, FibError};
use fibbench_core::registry::AlgorithmFactory;
use fibbench_core::word::Word;

/// Get the algorithms to run from a comma-separated list of names.
///
/// `all` expands to every registered algorithm. Duplicates are dropped and
/// the first occurrence decides the column order.
pub fn select_algorithms<W: Word>(
    algo: &str,
    factory: &dyn AlgorithmFactory<W>,
) -> Result<Vec<Algorithm<W>>, FibError> {
    let mut selected: Vec<Algorithm<W>> = Vec::new();
    let mut push = |algorithm: Algorithm<W>| {
        if !selected.contains(&algorithm) {
            selected.push(algorithm);
        }
    };

    for name in algo.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        match name.to_ascii_lowercase().as_str() {
            "all" => {
                for available in factory.available() {
                    push(factory.get(available)?);
                }
            }
            other => push(factory.get(other)?),
        }
    }

    if selected.is_empty() {
        return Err(FibError::InvalidConfiguration(format!(
            "no algorithm selected by {algo:?}"
        )));
    }
    tracing::debug!(count = selected.len(), "selected algorithms");
    Ok(selected)
}
