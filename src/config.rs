//! Project configuration module.
//!
//! Handles loading, validating, and merging `concept-map.toml`. Stock defaults
//! are overridden by the user's file, and command-line flags override both.
//!
//! ## Config File Location
//!
//! By default the file is looked up next to the input outline:
//!
//! ```text
//! notes/
//! ├── outline.txt
//! └── concept-map.toml      # optional
//! ```
//!
//! `--config <path>` points at a file elsewhere; in that case the file must
//! exist.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [chunks]
//! size = 4                  # Top-level entries per diagram
//!
//! [graph]
//! format = "png"            # png | svg | pdf | jpg | dot
//! rankdir = "LR"            # LR | RL | TB | BT
//! node_shape = "plain"
//! font_color = "red"
//!
//! [graphviz]
//! command = "dot"           # Graphviz executable
//!
//! [document]
//! title = "Text Book Concept Map"
//!
//! [processing]
//! max_processes = 4         # Max parallel renders (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [graph]
//! format = "svg"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::graph::RankDir;
use crate::rendering::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use thiserror::Error;

/// Config file name looked up next to the input outline.
pub const CONFIG_FILE_NAME: &str = "concept-map.toml";

const DEFAULT_CHUNK_SIZE: NonZeroUsize = NonZeroUsize::new(4).unwrap();

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `concept-map.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// How top-level entries are grouped into diagrams.
    pub chunks: ChunksConfig,
    /// Diagram format and styling.
    pub graph: GraphConfig,
    /// External Graphviz tool settings.
    pub graphviz: GraphvizConfig,
    /// Summary document settings.
    pub document: DocumentConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl ProjectConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.graph.node_shape.trim().is_empty() {
            return Err(ConfigError::Validation(
                "graph.node_shape must not be empty".into(),
            ));
        }
        if self.graph.font_color.trim().is_empty() {
            return Err(ConfigError::Validation(
                "graph.font_color must not be empty".into(),
            ));
        }
        if self.graphviz.command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "graphviz.command must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        chunk_size: Option<NonZeroUsize>,
        format: Option<OutputFormat>,
    ) -> Self {
        if let Some(size) = chunk_size {
            self.chunks.size = size;
        }
        if let Some(format) = format {
            self.graph.format = format;
        }
        self
    }
}

/// Chunking settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunksConfig {
    /// Number of top-level entries drawn per diagram. Zero is rejected.
    pub size: NonZeroUsize,
}

impl Default for ChunksConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Diagram settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Output format for chunk diagrams.
    pub format: OutputFormat,
    /// Direction edges flow in.
    pub rankdir: RankDir,
    /// Graphviz node shape (e.g. `plain`, `box`, `ellipse`).
    pub node_shape: String,
    /// Graphviz font color for node labels.
    pub font_color: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            rankdir: RankDir::Lr,
            node_shape: "plain".to_string(),
            font_color: "red".to_string(),
        }
    }
}

/// Graphviz settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphvizConfig {
    /// Executable used to lay out and render DOT source.
    pub command: String,
}

impl Default for GraphvizConfig {
    fn default() -> Self {
        Self {
            command: "dot".to_string(),
        }
    }
}

/// Summary document settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Heading and `<title>` of the summary document.
    pub title: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "Text Book Concept Map".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of diagrams rendered at once.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ProjectConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ProjectConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ProjectConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `concept-map.toml` from a directory, falling back to stock defaults
/// when the file does not exist.
pub fn load_config(dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    let overlay = if path.exists() {
        Some(load_raw_config(&path)?)
    } else {
        None
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `concept-map.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# concept-map Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file next to your outline as concept-map.toml, or pass
# --config <path>. Command-line flags override values set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Chunking
# ---------------------------------------------------------------------------
[chunks]
# Top-level outline entries drawn per diagram. The last diagram may hold fewer.
size = 4

# ---------------------------------------------------------------------------
# Diagrams
# ---------------------------------------------------------------------------
[graph]
# Output format: png, svg, pdf, jpg, or dot (DOT source, no Graphviz needed).
format = "png"

# Edge direction: LR (left to right), RL, TB (top to bottom), or BT.
rankdir = "LR"

# Graphviz node shape and label color.
node_shape = "plain"
font_color = "red"

# ---------------------------------------------------------------------------
# Graphviz
# ---------------------------------------------------------------------------
[graphviz]
# Executable that renders DOT source. Must be on PATH unless absolute.
command = "dot"

# ---------------------------------------------------------------------------
# Summary document
# ---------------------------------------------------------------------------
[document]
title = "Text Book Concept Map"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum diagrams rendered in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn default_config_values() {
        let config = ProjectConfig::default();
        assert_eq!(config.chunks.size.get(), 4);
        assert_eq!(config.graph.format, OutputFormat::Png);
        assert_eq!(config.graph.rankdir, RankDir::Lr);
        assert_eq!(config.graph.node_shape, "plain");
        assert_eq!(config.graph.font_color, "red");
        assert_eq!(config.graphviz.command, "dot");
        assert_eq!(config.document.title, "Text Book Concept Map");
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[graph]
format = "svg"
"#;
        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.graph.format, OutputFormat::Svg);
        // Defaults preserved
        assert_eq!(config.graph.rankdir, RankDir::Lr);
        assert_eq!(config.chunks.size.get(), 4);
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let result: Result<ProjectConfig, _> = toml::from_str("[chunks]\nsize = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_format_rejected() {
        let result: Result<ProjectConfig, _> = toml::from_str("[graph]\nformat = \"gif\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            r#"
[chunks]
size = 2

[graph]
rankdir = "TB"
"#,
        );

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.chunks.size.get(), 2);
        assert_eq!(config.graph.rankdir, RankDir::Tb);
        // Unspecified values should be defaults
        assert_eq!(config.graph.format, OutputFormat::Png);
        assert_eq!(config.document.title, "Text Book Concept Map");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "this is not valid toml [[[");
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_file_missing_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_file(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_file_reads_named_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[document]\ntitle = \"Cells\"\n").unwrap();
        let config = load_config_file(&path).unwrap();
        assert_eq!(config.document.title, "Cells");
    }

    // =========================================================================
    // Unknown keys
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<ProjectConfig, _> = toml::from_str("chunk_size = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let result: Result<ProjectConfig, _> = toml::from_str("[graph]\ncolour = \"red\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[chunks]\nsize = 3\nwidth = 9\n");
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value =
            toml::from_str("[graph]\nformat = \"png\"\nrankdir = \"LR\"\n").unwrap();
        let overlay: toml::Value = toml::from_str("[graph]\nrankdir = \"TB\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["graph"]["format"].as_str(), Some("png"));
        assert_eq!(merged["graph"]["rankdir"].as_str(), Some("TB"));
    }

    #[test]
    fn stock_defaults_round_trip() {
        let config = resolve_config(stock_defaults_value(), None).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: ProjectConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    // =========================================================================
    // Validation and overrides
    // =========================================================================

    #[test]
    fn validate_empty_node_shape() {
        let mut config = ProjectConfig::default();
        config.graph.node_shape = " ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_empty_command() {
        let mut config = ProjectConfig::default();
        config.graphviz.command = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_max_processes() {
        let mut config = ProjectConfig::default();
        config.processing.max_processes = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = ProjectConfig::default()
            .with_overrides(NonZeroUsize::new(2), Some(OutputFormat::Dot));
        assert_eq!(config.chunks.size.get(), 2);
        assert_eq!(config.graph.format, OutputFormat::Dot);
    }

    #[test]
    fn absent_overrides_keep_values() {
        let config = ProjectConfig::default().with_overrides(None, None);
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_auto_is_positive() {
        assert!(effective_threads(&ProcessingConfig::default()) >= 1);
    }
}
