//! Counter extraction from MapReduce job logs.
//!
//! Each counter is an independent lookup: a label pattern with one integer
//! capture group. The first match anywhere in the text wins; a counter whose
//! label never appears is reported as `0`.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Declaration of one counter: output key and the pattern that locates it.
#[derive(Debug, Clone, Copy)]
pub struct CounterDef {
    pub name: &'static str,
    pub pattern: &'static str,
    /// Whether `.` in the pattern may cross line breaks.
    pub dot_all: bool,
}

const fn counter(name: &'static str, pattern: &'static str) -> CounterDef {
    CounterDef {
        name,
        pattern,
        dot_all: true,
    }
}

/// Known counters, in output column order.
///
/// Labels are matched verbatim. `total_com_usage` keeps the misspelled
/// "head usage" label found in older logs and is reported separately from
/// `heap_usage_bytes`.
pub const COUNTERS: &[CounterDef] = &[
    counter("slots_m_map", r"SLOTS_MILLIS_MAPS=([0-9]+)"),
    counter("rack_local_map_tasks", r"Rack-local map tasks=([0-9]+)"),
    counter("launched_map_tasks", r"Launched map tasks=([0-9]+)"),
    counter("data_local_map_tasks", r"Data-local map tasks=([0-9]+)"),
    counter("slots_m_reduce", r"SLOTS_MILLIS_REDUCES=([0-9]+)"),
    counter(
        "file_input_bytes",
        r"File Input Format Counters.*?Bytes Read=([0-9]+)",
    ),
    counter(
        "file_output_bytes",
        r"File Output Format Counters.*?Bytes Written=([0-9]+)",
    ),
    counter("fs_local_read_bytes", r"FILE_BYTES_READ=([0-9]+)"),
    counter("fs_hdfs_read_bytes", r"HDFS_BYTES_READ=([0-9]+)"),
    counter("fs_local_write_bytes", r"FILE_BYTES_WRITTEN=([0-9]+)"),
    counter("fs_hdfs_write_bytes", r"HDFS_BYTES_WRITTEN=([0-9]+)"),
    counter(
        "map_out_mater_bytes",
        r"Map output materialized bytes=([0-9]+)",
    ),
    counter("map_input_bytes", r"Map input bytes=([0-9]+)"),
    counter("reduce_shuffle_bytes", r"Reduce shuffle bytes=([0-9]+)"),
    counter("splilled_records", r"Spilled Records=([0-9]+)"),
    counter("map_output_bytes", r"Map output bytes=([0-9]+)"),
    counter(
        "heap_usage_bytes",
        r"Total committed heap usage \(bytes\)=([0-9]+)",
    ),
    counter(
        "total_com_usage",
        r"Total committed head usage \(bytes\)=([0-9]+)",
    ),
    counter("cpu_time_ms", r"CPU time spent \(ms\)=([0-9]+)"),
    counter("split_raw_bytes", r"SPLIT_RAW_BYTES=([0-9]+)"),
    counter("combine_in_records", r"Combine input records=([0-9]+)"),
    counter("reduce_input_records", r"Reduce input records=([0-9]+)"),
    counter("reduce_input_groups", r"Reduce input groups=([0-9]+)"),
    counter("combine_out_records", r"Combine output records=([0-9]+)"),
    counter(
        "physical_memory_bytes",
        r"Physical memory \(bytes\) snapshot=([0-9]+)",
    ),
    counter("reduce_output_records", r"Reduce output records=([0-9]+)"),
    counter(
        "virtual_memory_bytes",
        r"Virtual memory \(bytes\) snapshot=([0-9]+)",
    ),
    counter("map_output_records", r"Map output records=([0-9]+)"),
];

/// Compiled patterns, index-aligned with [`COUNTERS`].
static COMPILED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    COUNTERS
        .iter()
        .map(|def| {
            RegexBuilder::new(def.pattern)
                .dot_matches_new_line(def.dot_all)
                .build()
                .unwrap()
        })
        .collect()
});

/// Position of `name` in [`COUNTERS`].
pub fn index_of(name: &str) -> Option<usize> {
    COUNTERS.iter().position(|def| def.name == name)
}

/// Counter values for one log, index-aligned with [`COUNTERS`].
///
/// Every known counter always has a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counters {
    values: Vec<u64>,
}

impl Counters {
    /// All counters at zero.
    pub fn zeroed() -> Self {
        Self {
            values: vec![0; COUNTERS.len()],
        }
    }

    /// Value of the named counter, or `None` for an unknown name.
    pub fn get(&self, name: &str) -> Option<u64> {
        index_of(name).map(|i| self.values[i])
    }

    /// `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        COUNTERS
            .iter()
            .zip(self.values.iter())
            .map(|(def, v)| (def.name, *v))
    }
}

/// Scan log text for every known counter.
pub fn extract(text: &str) -> Counters {
    let mut counters = Counters::zeroed();
    for (i, (def, re)) in COUNTERS.iter().zip(COMPILED.iter()).enumerate() {
        let Some(caps) = re.captures(text) else {
            continue;
        };
        match caps[1].parse::<u64>() {
            Ok(v) => counters.values[i] = v,
            Err(e) => {
                tracing::warn!(
                    counter = def.name,
                    raw = &caps[1],
                    error = %e,
                    "counter value out of range, using 0"
                );
            }
        }
    }
    counters
}

/// Decode log bytes as UTF-8, dropping any invalid sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}
