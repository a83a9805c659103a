//! Counter extraction and correlation reporting for archived MapReduce
//! benchmark logs.
//!
//! Log filenames encode the run (`test-<city>-<chunkMB>-<machines>` or
//! `test-<chunkMB>-<machines>`); log bodies carry job counters such as
//! `CPU time spent (ms)=4200`. [`pipeline::run`] turns an archive of such logs
//! into a correlation heatmap and CSV.

mod archive;
mod config;
mod correlation;
mod counters;
mod dataset;
mod export;
mod heatmap;
mod ingest;
mod pipeline;
mod run_id;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Extract MapReduce job counters from an archive of benchmark logs and
/// report how the selected counters correlate.
///
/// Writes an annotated heatmap (SVG) and the correlation matrix (CSV).
#[derive(Parser, Debug)]
#[command(name = "mapred-corr", version, about)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "mapred-corr.toml")]
    config: PathBuf,

    /// Log archive (overrides config)
    #[arg(long)]
    archive: Option<PathBuf>,

    /// Extraction directory (overrides config)
    #[arg(long)]
    extract_dir: Option<PathBuf>,

    /// Correlation CSV output path (overrides config)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Heatmap SVG output path (overrides config)
    #[arg(long)]
    heatmap: Option<PathBuf>,

    /// Print resolved config and exit without reading the archive
    #[arg(long)]
    dry_run: bool,

    /// Extra logging (per-file details, projection decisions)
    #[arg(short, long)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_thread_ids(false)
        .init();

    tracing::debug!(?cli, "parsed CLI arguments");

    let mut cfg = match config::load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    cfg.apply(config::Overrides {
        archive_path: cli.archive,
        extract_dir: cli.extract_dir,
        csv_path: cli.csv,
        heatmap_path: cli.heatmap,
    });

    if cli.dry_run {
        print!("{}", cfg.to_toml());
        return;
    }

    match pipeline::run(&cfg) {
        Ok(summary) => {
            tracing::info!(
                rows = summary.dataset.len(),
                skipped = summary.skipped.len(),
                counters = summary.matrix.len(),
                csv = %cfg.report.csv_path.display(),
                heatmap = %cfg.report.heatmap_path.display(),
                "report complete"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "report failed");
            std::process::exit(1);
        }
    }
}
