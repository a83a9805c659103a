//! One-shot report: unpack the archive, ingest every log, correlate the
//! selected counters, then write the heatmap and the CSV.
//!
//! A missing or unreadable archive aborts before anything is ingested.
//! Unrecognized filenames and absent counters never fail the run.

use crate::archive::{self, ArchiveError};
use crate::config::AnalyzerConfig;
use crate::correlation::{self, CorrelationMatrix};
use crate::dataset::Dataset;
use crate::export::{self, ExportError};
use crate::heatmap::{self, HeatmapError, HeatmapStyle};
use crate::ingest::{self, IngestError};
use std::path::PathBuf;

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub dataset: Dataset,
    pub skipped: Vec<PathBuf>,
    pub matrix: CorrelationMatrix,
}

pub fn run(config: &AnalyzerConfig) -> Result<RunSummary, PipelineError> {
    let input = &config.input;
    archive::extract_archive(&input.archive_path, &input.extract_dir)?;

    let report = ingest::ingest_dir(&input.extract_dir, input)?;
    for record in report.dataset.records() {
        tracing::debug!(
            file = %record.file,
            location = record.run.location.as_deref().unwrap_or("-"),
            chunk_size_mb = record.run.chunk_size_mb,
            num_machines = record.run.num_machines,
            counters_found = record.counters.iter().filter(|(_, v)| *v > 0).count(),
            "row"
        );
    }
    tracing::info!(
        rows = report.dataset.len(),
        skipped = report.skipped.len(),
        columns = Dataset::columns().count(),
        "dataset assembled"
    );

    let projection = report.dataset.project(&config.report.counters);
    let matrix = correlation::correlate(&projection);
    tracing::info!(counters = ?matrix.labels(), "correlation matrix computed");

    let style = HeatmapStyle {
        title: config.report.title.clone(),
        width: config.report.width,
        height: config.report.height,
    };
    heatmap::render(&matrix, &style, &config.report.heatmap_path)?;
    export::write_csv(&matrix, &config.report.csv_path)?;

    Ok(RunSummary {
        dataset: report.dataset,
        skipped: report.skipped,
        matrix,
    })
}

/// Fatal errors, one variant per stage.
#[derive(Debug)]
pub enum PipelineError {
    Archive(ArchiveError),
    Ingest(IngestError),
    Heatmap(HeatmapError),
    Export(ExportError),
}

impl From<ArchiveError> for PipelineError {
    fn from(e: ArchiveError) -> Self {
        PipelineError::Archive(e)
    }
}

impl From<IngestError> for PipelineError {
    fn from(e: IngestError) -> Self {
        PipelineError::Ingest(e)
    }
}

impl From<HeatmapError> for PipelineError {
    fn from(e: HeatmapError) -> Self {
        PipelineError::Heatmap(e)
    }
}

impl From<ExportError> for PipelineError {
    fn from(e: ExportError) -> Self {
        PipelineError::Export(e)
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Archive(e) => write!(f, "{e}"),
            PipelineError::Ingest(e) => write!(f, "{e}"),
            PipelineError::Heatmap(e) => write!(f, "{e}"),
            PipelineError::Export(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Archive(e) => Some(e),
            PipelineError::Ingest(e) => Some(e),
            PipelineError::Heatmap(e) => Some(e),
            PipelineError::Export(e) => Some(e),
        }
    }
}
