//! Error handling and exit codes.

use fibbench_core::algorithm::FibError;
use fibbench_core::constants::exit_codes;

/// Map a library error to its process exit code.
#[must_use]
pub fn handle_error(err: &FibError) -> i32 {
    match err {
        FibError::InvalidConfiguration(_) | FibError::UnknownAlgorithm(_) => {
            exit_codes::ERROR_CONFIG
        }
        FibError::Mismatch { .. } => exit_codes::ERROR_MISMATCH,
        FibError::DomainExceeded { .. }
        | FibError::CoefficientOverflow { .. }
        | FibError::Kernel(_) => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for an application error; anything that is not a
/// [`FibError`] is a generic failure.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<FibError>()
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}
