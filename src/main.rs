// Command-line entry point. The library (lib.rs) is the public API for
// presentation layers and holds the conversion pipeline; this file only wires
// flags, logging, Ctrl-C and progress output around it.

mod cli;

use std::process::ExitCode;
use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use heic_converter_lib::utils::load_config_or_default;
use heic_converter_lib::{BatchJob, BatchRequest, ConversionEngine, JobState};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_ansi(true)          // Keep colored output
        .with_writer(std::io::stderr)
        .compact()                // Use compact formatter instead of pretty
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    let request = BatchRequest {
        source_dir: cli.source.clone(),
        destination_dir: cli.destination(&config),
        policy: cli.policy(&config),
        extensions: cli.extensions(&config),
    };

    let engine = ConversionEngine::with_default_codecs().context("Failed to initialise image codecs")?;
    let unsupported = engine.unsupported_extensions(&request.extensions);
    if !unsupported.is_empty() {
        bail!(
            "This build cannot decode .{} files; rebuild with `--features vips` or choose other extensions with --ext",
            unsupported.join(", .")
        );
    }
    let job = BatchJob::new(engine);

    // First Ctrl-C asks the batch to stop after the file in flight, a second one exits.
    let handle = job.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        if handle.cancel() {
            warn!("Cancellation requested, finishing the current file (Ctrl-C again to abort)...");
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            error!("Aborted");
            std::process::exit(130);
        }
    });

    let mut progress_rx = job.subscribe();
    let reporter = tokio::spawn(async move {
        let mut last_completed = None;
        while progress_rx.changed().await.is_ok() {
            let progress = progress_rx.borrow_and_update().clone();
            if progress.state != JobState::Running || progress.total == 0 {
                continue;
            }
            if last_completed != Some(progress.completed) {
                last_completed = Some(progress.completed);
                info!(
                    "[{:>3.0}%] {}/{} {}",
                    progress.percentage(),
                    progress.completed,
                    progress.total,
                    progress.current_file.as_deref().unwrap_or("")
                );
            }
        }
    });

    let result = job.run(request).await;
    reporter.abort();
    let progress = result.context("Conversion batch failed")?;

    if progress.failed() > 0 {
        warn!("{} file(s) could not be converted", progress.failed());
    }

    if cli.json {
        let report = serde_json::json!({
            "progress": progress,
            "percentage": progress.percentage(),
            "files": job.outcomes(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", progress.summary());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
