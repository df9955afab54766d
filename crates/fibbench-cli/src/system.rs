//! Host information shown in the report header.

use sysinfo::System;

/// Get the current CPU model string, trimmed.
///
/// Falls back to `"unknown CPU"` when the platform does not report one.
#[must_use]
pub fn cpu_model() -> String {
    let sys = System::new_all();
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| "unknown CPU".to_string())
}
