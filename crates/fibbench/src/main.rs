//! fibbench: fixed-width Fibonacci evaluators checked against a modular oracle.

use fibbench_cli::presenter::CLIResultPresenter;
use fibbench_core::constants::exit_codes;
use fibbench_lib::{app, config, errors};
use fibbench_orchestration::interfaces::ResultPresenter;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = config::AppConfig::parse();

    let default_level = if config.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = app::run(&config) {
        let code = errors::exit_code(&err);
        // Mismatches were already reported alongside the table.
        if code != exit_codes::ERROR_MISMATCH {
            let presenter = CLIResultPresenter::new(config.verbose, config.quiet);
            presenter.present_error(&format!("{err:#}"));
        }
        std::process::exit(code);
    }
}
