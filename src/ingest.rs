/// Log ingestion: walk the extracted tree, classify each log by filename,
/// extract its counters, and collect one record per recognized file.
use crate::config::InputConfig;
use crate::counters;
use crate::dataset::{Dataset, MetricRecord};
use crate::run_id;
use std::path::{Path, PathBuf};

/// Result of walking one extraction directory.
#[derive(Debug)]
pub struct IngestReport {
    pub dataset: Dataset,
    /// Log-looking files whose names matched neither naming convention.
    pub skipped: Vec<PathBuf>,
}

/// Whether a filename should be treated as a log.
pub fn is_log_file(name: &str, input: &InputConfig) -> bool {
    let suffix = format!(".{}", input.log_extension);
    name.ends_with(&suffix) || name.starts_with(&input.log_prefix)
}

/// Turn one log file into a record, or `None` if its name is unrecognized.
pub fn ingest_file(path: &Path) -> Result<Option<MetricRecord>, IngestError> {
    let name = file_name(path);
    let Some(run) = run_id::classify(&name) else {
        tracing::warn!(file = %name, "unrecognized log filename, skipping");
        return Ok(None);
    };

    let bytes = std::fs::read(path).map_err(|e| IngestError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = counters::decode_lossy(&bytes);
    let counters = counters::extract(&text);
    Ok(Some(MetricRecord::new(name, run, counters)))
}

/// Walk `root` recursively and ingest every log file, in path order.
pub fn ingest_dir(root: &Path, input: &InputConfig) -> Result<IngestReport, IngestError> {
    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&root.to_string_lossy())
    );
    let entries = glob::glob(&pattern).map_err(|e| IngestError::Pattern {
        pattern: pattern.clone(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() && is_log_file(&file_name(&path), input) {
                    paths.push(path);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read directory entry, skipping");
            }
        }
    }
    paths.sort();

    let mut report = IngestReport {
        dataset: Dataset::new(),
        skipped: Vec::new(),
    };
    for path in paths {
        match ingest_file(&path)? {
            Some(record) => report.dataset.push(record),
            None => report.skipped.push(path),
        }
    }
    Ok(report)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug)]
pub enum IngestError {
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Pattern { pattern, source } => {
                write!(f, "invalid log search pattern {pattern}: {source}")
            }
            IngestError::Read { path, source } => {
                write!(f, "failed to read log {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Pattern { source, .. } => Some(source),
            IngestError::Read { source, .. } => Some(source),
        }
    }
}
