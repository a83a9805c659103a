/// CSV export of the correlation matrix: a header row of counter names, then
/// one row per matrix row. No index column; `NaN` cells are left empty and
/// values are written as floats (`1.0`, `-0.25`). An empty matrix produces an
/// empty file.
use crate::correlation::CorrelationMatrix;
use std::path::{Path, PathBuf};

pub fn write_csv(matrix: &CorrelationMatrix, path: &Path) -> Result<(), ExportError> {
    let err = |source: csv::Error| ExportError {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(err)?;
    if matrix.is_empty() {
        writer.flush().map_err(|e| err(e.into()))?;
        tracing::info!(path = %path.display(), "no counters to correlate, CSV left empty");
        return Ok(());
    }
    writer.write_record(matrix.labels()).map_err(err)?;
    for row in matrix.rows() {
        writer
            .write_record(row.iter().map(|v| format_cell(*v)))
            .map_err(err)?;
    }
    writer.flush().map_err(|e| err(e.into()))?;

    tracing::info!(path = %path.display(), columns = matrix.len(), "correlation CSV written");
    Ok(())
}

fn format_cell(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        format!("{v:?}")
    }
}

#[derive(Debug)]
pub struct ExportError {
    pub path: PathBuf,
    pub source: csv::Error,
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to write CSV {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
