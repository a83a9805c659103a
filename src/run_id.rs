/// Run identification from log filenames.
///
/// Two naming conventions are recognized, tried in this order:
/// - `test-<city>-<chunkSize>-<machineCount>` (e.g. `test-Nancy-64-282`)
/// - `test-<chunkSize>-<machineCount>` (e.g. `test-64-137`)
///
/// Only the start of the name is matched, so extensions and any other
/// trailing text are ignored.
use regex::Regex;
use std::sync::LazyLock;

static CITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^test-([A-Za-z]+)-([0-9]+)-([0-9]+)").unwrap());

static SHORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^test-([0-9]+)-([0-9]+)").unwrap());

/// Benchmark parameters encoded in a log filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIdentifier {
    /// Site name; `None` for the short naming convention.
    pub location: Option<String>,
    pub chunk_size_mb: u64,
    pub num_machines: u64,
}

/// Classify a filename into its run parameters.
///
/// Returns `None` when neither convention matches, or when a numeric segment
/// is too large to represent.
pub fn classify(filename: &str) -> Option<RunIdentifier> {
    if let Some(caps) = CITY_PATTERN.captures(filename) {
        return Some(RunIdentifier {
            location: Some(caps[1].to_string()),
            chunk_size_mb: caps[2].parse().ok()?,
            num_machines: caps[3].parse().ok()?,
        });
    }

    let caps = SHORT_PATTERN.captures(filename)?;
    Some(RunIdentifier {
        location: None,
        chunk_size_mb: caps[1].parse().ok()?,
        num_machines: caps[2].parse().ok()?,
    })
}
