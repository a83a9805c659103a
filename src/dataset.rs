use crate::counters::{self, Counters, COUNTERS};
use crate::run_id::RunIdentifier;

/// Leading metadata columns, ahead of the counters.
pub const METADATA_COLUMNS: &[&str] = &["file", "chunk_size_MB", "num_machines", "location"];

/// One processed log file: its run parameters plus every counter.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub file: String,
    pub run: RunIdentifier,
    pub counters: Counters,
}

impl MetricRecord {
    pub fn new(file: impl Into<String>, run: RunIdentifier, counters: Counters) -> Self {
        Self {
            file: file.into(),
            run,
            counters,
        }
    }
}

/// All records from one run, in ingestion order. Duplicate run identifiers
/// are kept as separate rows.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<MetricRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MetricRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names in row layout: metadata first, then counters.
    pub fn columns() -> impl Iterator<Item = &'static str> {
        METADATA_COLUMNS
            .iter()
            .copied()
            .chain(COUNTERS.iter().map(|def| def.name))
    }

    /// Project the dataset onto the requested counters.
    ///
    /// Names that are not counter columns are dropped; the rest keep their
    /// requested order. Each returned column holds one value per record.
    /// A dataset without rows has no columns, so its projection is empty.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Projection {
        let mut columns: Vec<String> = Vec::new();
        let mut data: Vec<Vec<f64>> = Vec::new();
        if self.is_empty() {
            tracing::debug!("dataset has no rows, nothing to project");
            return Projection { columns, data };
        }
        for name in names {
            let name = name.as_ref();
            if counters::index_of(name).is_none() {
                tracing::debug!(column = name, "not a dataset column, excluded from projection");
                continue;
            }
            if columns.iter().any(|c| c == name) {
                continue;
            }
            columns.push(name.to_string());
            data.push(
                self.records
                    .iter()
                    .map(|r| r.counters.get(name).unwrap_or_default() as f64)
                    .collect(),
            );
        }
        Projection { columns, data }
    }
}

/// Column-major numeric view over a subset of counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub columns: Vec<String>,
    pub data: Vec<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::extract;

    fn record(file: &str, body: &str) -> MetricRecord {
        MetricRecord::new(
            file,
            RunIdentifier {
                location: None,
                chunk_size_mb: 64,
                num_machines: 4,
            },
            extract(body),
        )
    }

    #[test]
    fn columns_start_with_metadata() {
        let cols: Vec<_> = Dataset::columns().collect();
        assert_eq!(&cols[..4], METADATA_COLUMNS);
        assert_eq!(cols.len(), METADATA_COLUMNS.len() + COUNTERS.len());
        assert_eq!(cols[4], COUNTERS[0].name);
    }

    #[test]
    fn duplicate_runs_are_kept() {
        let mut ds = Dataset::new();
        ds.push(record("test-64-4.txt", "CPU time spent (ms)=1"));
        ds.push(record("test-64-4.log", "CPU time spent (ms)=2"));
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].run, ds.records()[1].run);
    }

    #[test]
    fn projection_keeps_requested_order() {
        let mut ds = Dataset::new();
        ds.push(record("a", "CPU time spent (ms)=10\nSpilled Records=1"));
        ds.push(record("b", "CPU time spent (ms)=20\nSpilled Records=2"));

        let p = ds.project(&["splilled_records", "cpu_time_ms"]);
        assert_eq!(p.columns, vec!["splilled_records", "cpu_time_ms"]);
        assert_eq!(p.data[0], vec![1.0, 2.0]);
        assert_eq!(p.data[1], vec![10.0, 20.0]);
    }

    #[test]
    fn projection_drops_unknown_and_metadata_columns() {
        let mut ds = Dataset::new();
        ds.push(record("a", ""));
        let p = ds.project(&["cpu_time_ms", "not_a_counter", "num_machines", "cpu_time_ms"]);
        assert_eq!(p.columns, vec!["cpu_time_ms"]);
        assert_eq!(p.data, vec![vec![0.0]]);
    }

    #[test]
    fn empty_dataset_projects_no_columns() {
        let ds = Dataset::new();
        assert!(ds.is_empty());
        let p = ds.project(&["cpu_time_ms", "heap_usage_bytes"]);
        assert!(p.columns.is_empty());
        assert!(p.data.is_empty());
        assert!(crate::correlation::correlate(&p).is_empty());
    }
}
