use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration loaded from mapred-corr.toml.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub input: InputConfig,
    pub report: ReportConfig,
}

/// Where the logs come from and which files count as logs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    /// Zip archive holding the log tree.
    pub archive_path: PathBuf,
    /// Directory the archive is unpacked into (overwritten each run).
    pub extract_dir: PathBuf,
    /// Files whose name ends in `.{log_extension}` are treated as logs.
    pub log_extension: String,
    /// Files whose name starts with this prefix are treated as logs.
    pub log_prefix: String,
}

/// What gets correlated and where the artifacts land.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Counter names projected into the correlation matrix, in display order.
    pub counters: Vec<String>,
    pub csv_path: PathBuf,
    pub heatmap_path: PathBuf,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

// --- Default implementations ---

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            archive_path: PathBuf::from("testes.zip"),
            extract_dir: PathBuf::from("testes_logs"),
            log_extension: "txt".to_string(),
            log_prefix: "test-".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            counters: [
                "cpu_time_ms",
                "physical_memory_bytes",
                "fs_local_read_bytes",
                "fs_hdfs_read_bytes",
                "map_input_bytes",
                "map_output_bytes",
                "reduce_shuffle_bytes",
                "reduce_input_records",
                "slots_m_map",
                "slots_m_reduce",
                "heap_usage_bytes",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            csv_path: PathBuf::from("analise_logs_correlacao.csv"),
            heatmap_path: PathBuf::from("analise_logs_correlacao.svg"),
            title: "Correlation Matrix - Selected Counters".to_string(),
            width: 1500,
            height: 1000,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub archive_path: Option<PathBuf>,
    pub extract_dir: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
    pub heatmap_path: Option<PathBuf>,
}

impl AnalyzerConfig {
    /// Apply command-line overrides in place.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(p) = overrides.archive_path {
            self.input.archive_path = p;
        }
        if let Some(p) = overrides.extract_dir {
            self.input.extract_dir = p;
        }
        if let Some(p) = overrides.csv_path {
            self.report.csv_path = p;
        }
        if let Some(p) = overrides.heatmap_path {
            self.report.heatmap_path = p;
        }
    }

    /// Render the resolved configuration back to TOML (for `--dry-run`).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|e| format!("# unable to render config: {e}\n"))
    }
}

/// Load config from `path`, or defaults when the file does not exist.
///
/// A file that exists but cannot be read or parsed is an error.
pub fn load_config(path: &Path) -> Result<AnalyzerConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(AnalyzerConfig::default());
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Errors from loading the config file.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, AnalyzerConfig::default());
        assert_eq!(cfg.input.archive_path, PathBuf::from("testes.zip"));
        assert_eq!(cfg.report.counters.len(), 11);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mapred-corr.toml");
        std::fs::write(
            &path,
            "[input]\narchive_path = \"runs.zip\"\n\n[report]\ncounters = [\"cpu_time_ms\"]\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.input.archive_path, PathBuf::from("runs.zip"));
        assert_eq!(cfg.input.extract_dir, PathBuf::from("testes_logs"));
        assert_eq!(cfg.input.log_prefix, "test-");
        assert_eq!(cfg.report.counters, vec!["cpu_time_ms".to_string()]);
        assert_eq!(cfg.report.width, 1500);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[input\narchive_path = ").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut cfg = AnalyzerConfig::default();
        cfg.apply(Overrides {
            archive_path: Some(PathBuf::from("other.zip")),
            csv_path: Some(PathBuf::from("out.csv")),
            ..Default::default()
        });
        assert_eq!(cfg.input.archive_path, PathBuf::from("other.zip"));
        assert_eq!(cfg.report.csv_path, PathBuf::from("out.csv"));
        assert_eq!(cfg.input.extract_dir, PathBuf::from("testes_logs"));
        assert_eq!(
            cfg.report.heatmap_path,
            PathBuf::from("analise_logs_correlacao.svg")
        );
    }

    #[test]
    fn resolved_config_renders_as_toml() {
        let rendered = AnalyzerConfig::default().to_toml();
        assert!(rendered.contains("[input]"));
        assert!(rendered.contains("archive_path = \"testes.zip\""));
        let back: AnalyzerConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(back, AnalyzerConfig::default());
    }
}
