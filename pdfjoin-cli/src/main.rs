//! pdfjoin - Combine PDF files into a single document.
//!
//! Selects the given files, applies any requested moves, and merges the
//! result into one PDF.

mod cli;

use clap::Parser;
use serde::Serialize;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfjoin::codec::LopdfCodec;
use pdfjoin::config::{Config, Move, OverwriteMode};
use pdfjoin::entry::FileSource;
use pdfjoin::error::PdfJoinError;
use pdfjoin::io::{DirectoryTarget, SaveReceipt};
use pdfjoin::merge::MergeStatistics;
use pdfjoin::output::{OutputFormatter, display_merge_statistics, display_preview_report};
use pdfjoin::preview::{PreviewReport, PreviewStatus};
use pdfjoin::session::MergeSession;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Default log filter when `RUST_LOG` is not set.
fn default_log_level(cli: &Cli) -> &'static str {
    if cli.quiet {
        "error"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(cli)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Machine-readable summary printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReport<'a> {
    dry_run: bool,
    output: String,
    files: &'a PreviewReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<&'a MergeStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<&'a SaveReceipt>,
}

fn print_json(report: &RunReport<'_>) -> Result<(), PdfJoinError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| PdfJoinError::other(format!("Failed to serialize report: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfJoinError> {
    cli.validate()?;

    let all_inputs = cli.get_all_inputs().await?;
    let config = cli.to_config(all_inputs)?;
    debug!(
        inputs = config.inputs.len(),
        moves = config.moves.len(),
        output = %config.output_path().display(),
        "resolved configuration"
    );

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfjoin::NAME, pdfjoin::VERSION));
        formatter.blank_line();
    }

    // Select and order the inputs
    formatter.info(&format!("Reading {} file(s)...", config.inputs.len()));
    let session = MergeSession::new(LopdfCodec::with_compression(config.compression));
    let sources = config.inputs.iter().map(FileSource::path).collect();
    session.select_files(sources).await?;

    for mv in &config.moves {
        apply_move(&session, *mv).await?;
        formatter.debug(&format!("Moved file {} to position {}", mv.from + 1, mv.to + 1));
    }

    let report = PreviewReport::from_previews(session.previews().await);
    if formatter.should_print() {
        display_preview_report(&formatter, &report);
    }

    let output_path = config.output_path();

    // Dry run mode - stop here
    if config.dry_run {
        if config.json {
            print_json(&RunReport {
                dry_run: true,
                output: output_path.display().to_string(),
                files: &report,
                statistics: None,
                receipt: None,
            })?;
        }

        if let Some(err) = first_preview_failure(&report) {
            return Err(err);
        }

        formatter.blank_line();
        formatter.success("Dry run completed successfully");
        formatter.info(&format!("  Output would be: {}", output_path.display()));
        formatter.info("  Run without --dry-run to create the merged PDF");
        return Ok(());
    }

    let overwrite = handle_output_overwrite(&config, &formatter).await?;
    let target = DirectoryTarget::new(&config.output_dir).overwrite(overwrite);

    formatter.info("Merging documents...");
    let delivered = session
        .merge_and_deliver(&target, &config.output_name)
        .await?;
    let statistics = &delivered.output.statistics;

    if config.json {
        return print_json(&RunReport {
            dry_run: false,
            output: delivered.receipt.location.clone(),
            files: &report,
            statistics: Some(statistics),
            receipt: Some(&delivered.receipt),
        });
    }

    if formatter.should_print() {
        formatter.blank_line();
        formatter.success(&format!(
            "Merged {} file(s) into {} pages: {} ({})",
            statistics.files_merged,
            statistics.total_pages,
            delivered.receipt.location,
            statistics.format_output_size()
        ));

        if formatter.is_verbose() {
            formatter.section("Statistics");
            display_merge_statistics(&formatter, statistics);
            formatter.detail(
                "Write time",
                &format!("{:.2}s", delivered.receipt.write_time.as_secs_f64()),
            );
        }
    }

    Ok(())
}

/// Apply a 1-based move from the command line.
async fn apply_move(session: &MergeSession<LopdfCodec>, mv: Move) -> Result<(), PdfJoinError> {
    session
        .move_entry(mv.from, mv.to)
        .await
        .map_err(|err| match err {
            PdfJoinError::IndexOutOfBounds { index, len } => PdfJoinError::invalid_config(format!(
                "Move {mv}: position {} is out of range for {len} file(s)",
                index + 1
            )),
            other => other,
        })
}

/// The decode failure the merge would hit first, if any.
fn first_preview_failure(report: &PreviewReport) -> Option<PdfJoinError> {
    report.previews.iter().find_map(|preview| match &preview.status {
        PreviewStatus::Failed { reason } => Some(PdfJoinError::decode_failure(
            preview.id,
            preview.name.clone(),
            reason.clone(),
        )),
        PreviewStatus::Ready { .. } => None,
    })
}

/// Decide whether an existing output file may be replaced.
///
/// Returns `true` when the file should be overwritten.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<bool, PdfJoinError> {
    let output = config.output_path();

    if !tokio::fs::try_exists(&output).await.unwrap_or(false) {
        return Ok(false);
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(true),
        OverwriteMode::NoClobber => Err(PdfJoinError::output_exists(output)),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet or JSON mode
            if formatter.is_quiet() || config.json {
                return Err(PdfJoinError::output_exists(output));
            }

            formatter.warning(&format!("Output file already exists: {}", output.display()));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| PdfJoinError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(true)
            } else {
                Err(PdfJoinError::Cancelled)
            }
        }
    }
}
