//! Application entry point and dispatch.

use std::io::IsTerminal;

use anyhow::{Context, Result};

use fibbench_cli::output::{write_json, write_sequence_json};
use fibbench_cli::presenter::{CLIProgressReporter, CLIResultPresenter};
use fibbench_core::algorithm::FibError;
use fibbench_core::constants::DEFAULT_TAIL_LIMIT;
use fibbench_core::iterator::BatchedSequence;
use fibbench_core::kernel::ShiftAddKernel;
use fibbench_core::oracle::{last_exact_index, ModularOracle};
use fibbench_core::registry::DefaultFactory;
use fibbench_core::terms::TermRewriter;
use fibbench_core::word::{Width, Word};
use fibbench_orchestration::harness::VerificationHarness;
use fibbench_orchestration::interfaces::ResultPresenter;
use fibbench_orchestration::selection::select_algorithms;

use crate::config::AppConfig;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        fibbench_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);

    if let Some(target) = config.terms {
        return run_terms(config, target, &presenter);
    }

    let width = config.word_width()?;
    match (width, config.generate) {
        (Width::W32, Some(count)) => run_generate::<u32>(config, count, &presenter),
        (Width::W64, Some(count)) => run_generate::<u64>(config, count, &presenter),
        (Width::W32, None) => run_harness::<u32>(config, &presenter),
        (Width::W64, None) => run_harness::<u64>(config, &presenter),
    }
}

fn run_terms(config: &AppConfig, target: i64, presenter: &CLIResultPresenter) -> Result<()> {
    let rewriter = TermRewriter::new(config.tail_limit)?;
    let expansion = rewriter.expand(target)?;
    presenter.present_expansion(&expansion, config.trace);

    if let Some(path) = &config.json {
        let json = serde_json::to_string_pretty(&expansion)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn run_generate<W: Word>(
    config: &AppConfig,
    count: usize,
    presenter: &CLIResultPresenter,
) -> Result<()> {
    let rewriter = TermRewriter::new(DEFAULT_TAIL_LIMIT)?;
    let kernel = ShiftAddKernel::<W>::derive_with(&rewriter, config.backend.resolve())?;
    tracing::debug!(backend = kernel.backend().name(), count, "generating sequence");

    let mut values: Vec<(u64, u64)> = Vec::new();
    values.try_reserve_exact(count).map_err(|err| {
        FibError::InvalidConfiguration(format!(
            "sequence of {count} values cannot be allocated: {err}"
        ))
    })?;
    values.extend(
        BatchedSequence::new(kernel)
            .take(count)
            .map(|(index, value)| (index, value.widen())),
    );
    presenter.present_sequence(W::WIDTH, &values);

    if let Some(path) = &config.json {
        write_sequence_json(path, W::WIDTH, &values)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn run_harness<W: Word>(config: &AppConfig, presenter: &CLIResultPresenter) -> Result<()> {
    let factory = DefaultFactory::<W>::new(config.backend.resolve())?;
    let algorithms = select_algorithms(&config.algo, &factory)?;
    let oracle = ModularOracle::<W>::try_generate(config.oracle_len()?)?;

    if config.max_index > last_exact_index::<W>() {
        tracing::info!(
            last_exact = last_exact_index::<W>(),
            width = %W::WIDTH,
            "indices past the last exact value are compared modulo 2^w"
        );
    }

    if config.pin_core {
        pin_current_thread();
    }

    let reporter = CLIProgressReporter::new(!config.quiet && std::io::stderr().is_terminal());
    let harness = VerificationHarness::new(&oracle, &algorithms);
    let report = if config.parallel {
        harness.run_parallel(&reporter)
    } else {
        harness.run(&reporter)
    };

    presenter.present_report(&report);

    if let Some(path) = &config.json {
        write_json(path, &report).with_context(|| format!("writing {}", path.display()))?;
    }

    let failures = report.failures();
    if failures > 0 {
        return Err(FibError::Mismatch { failures }.into());
    }
    Ok(())
}

/// Pin the calling thread to the first reported core. Failure only warns.
fn pin_current_thread() {
    let pinned = core_affinity::get_core_ids()
        .and_then(|ids| ids.into_iter().next())
        .is_some_and(core_affinity::set_for_current);
    if pinned {
        tracing::debug!("pinned measuring thread to first core");
    } else {
        tracing::warn!("could not pin measuring thread to a core");
    }
}
