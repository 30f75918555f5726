use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use tracing::warn;
use crate::error::ConfigError;

/// A full sweep: how to launch the simulator, which axes to vary, and where results go
#[derive(Debug, Deserialize)]
pub struct SweepConfig {
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub axes: SweepAxes,
    /// Accepted for compatibility with older sweep files. Never passed to the simulator
    #[serde(default)]
    pub replacement_policy: Option<String>,
    /// Accepted for compatibility with older sweep files. Never passed to the simulator
    #[serde(default)]
    pub prefetcher: Option<String>,
    #[serde(default = "default_results_path")]
    pub output: PathBuf,
}

/// How the external simulator is launched for one configuration point
///
/// The final command line is `program tool_args.. <cache flag> <kb> <block flag> <bytes>
/// <associativity flag> <ways> -- workload..`
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorConfig {
    pub program: String,
    #[serde(default)]
    pub tool_args: Vec<String>,
    #[serde(default = "default_cache_size_flag")]
    pub cache_size_flag: String,
    #[serde(default = "default_block_size_flag")]
    pub block_size_flag: String,
    #[serde(default = "default_associativity_flag")]
    pub associativity_flag: String,
    #[serde(default = "default_workload")]
    pub workload: Vec<String>,
}

/// The ordered values of each axis. Enumeration follows the order given here, never sorted
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SweepAxes {
    #[serde(default = "default_cache_sizes", alias = "cache_sizes")]
    pub cache_sizes_kb: Vec<u32>,
    #[serde(default = "default_block_sizes", alias = "block_sizes")]
    pub block_sizes_b: Vec<u32>,
    #[serde(default = "default_associativities")]
    pub associativities: Vec<u32>,
}

/// One combination of axis values
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ConfigurationPoint {
    pub cache_size_kb: u32,
    pub block_size_b: u32,
    /// 1 is direct mapped
    pub associativity: u32,
}

impl fmt::Display for ConfigurationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cache Size: {}KB, Block Size: {}B, Associativity: {}",
            self.cache_size_kb, self.block_size_b, self.associativity
        )
    }
}

/// Which documents to draw and from which tables
#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_document_path")]
    pub output: PathBuf,
    #[serde(default = "default_document_title")]
    pub title: String,
    #[serde(default = "default_tables")]
    pub tables: Vec<TableInput>,
}

/// One result table and the axis that was varied when it was produced
#[derive(Debug, Clone, Deserialize)]
pub struct TableInput {
    pub path: PathBuf,
    pub x_axis: XAxis,
    pub title: String,
}

/// The configuration column used as the x axis of every chart for a table
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum XAxis {
    #[serde(alias = "cache_size", alias = "Cache Size (KB)")]
    CacheSize,
    #[serde(alias = "block_size", alias = "Block Size (B)")]
    BlockSize,
    #[serde(alias = "associativity", alias = "Associativity")]
    Associativity,
}

impl XAxis {
    /// The result table column this axis reads from
    pub fn column(&self) -> &'static str {
        match self {
            XAxis::CacheSize => "Cache Size (KB)",
            XAxis::BlockSize => "Block Size (B)",
            XAxis::Associativity => "Associativity",
        }
    }
}

impl SweepConfig {
    /// Loads and validates a sweep file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: SweepConfig = read_json(path.as_ref())?;
        config.validate()?;
        config.warn_unwired();
        Ok(config)
    }

    /// Rejects axes that can't describe a real cache
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulator.program.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(String::from("simulator.program is empty")));
        }
        let axes = [
            ("cache_sizes_kb", &self.axes.cache_sizes_kb),
            ("block_sizes_b", &self.axes.block_sizes_b),
            ("associativities", &self.axes.associativities),
        ];
        for (name, values) in axes {
            if values.iter().any(|v| *v == 0) {
                return Err(ConfigError::InvalidConfig(format!("axes.{name} contains 0, axis values must be positive")));
            }
        }
        Ok(())
    }

    fn warn_unwired(&self) {
        if let Some(policy) = &self.replacement_policy {
            warn!(policy = %policy, "replacement_policy is not passed to the simulator and is ignored");
        }
        if let Some(prefetcher) = &self.prefetcher {
            warn!(prefetcher = %prefetcher, "prefetcher is not passed to the simulator and is ignored");
        }
    }
}

impl RenderConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json(path.as_ref())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: default_document_path(),
            title: default_document_title(),
            tables: default_tables(),
        }
    }
}

impl Default for SweepAxes {
    fn default() -> Self {
        Self {
            cache_sizes_kb: default_cache_sizes(),
            block_sizes_b: default_block_sizes(),
            associativities: default_associativities(),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn default_results_path() -> PathBuf {
    PathBuf::from("cache_simulation_results.csv")
}

fn default_cache_size_flag() -> String {
    String::from("-dl1_c")
}

fn default_block_size_flag() -> String {
    String::from("-b")
}

fn default_associativity_flag() -> String {
    String::from("-dl1_a")
}

fn default_workload() -> Vec<String> {
    vec![String::from("./matrixMultSimple")]
}

fn default_cache_sizes() -> Vec<u32> {
    vec![256]
}

fn default_block_sizes() -> Vec<u32> {
    vec![64]
}

fn default_associativities() -> Vec<u32> {
    vec![1]
}

fn default_document_path() -> PathBuf {
    PathBuf::from("cache_analysis.html")
}

fn default_document_title() -> String {
    String::from("Cache Performance Analysis")
}

fn default_tables() -> Vec<TableInput> {
    vec![
        TableInput {
            path: PathBuf::from("block_size_results.csv"),
            x_axis: XAxis::BlockSize,
            title: String::from("Varying Block Size"),
        },
        TableInput {
            path: PathBuf::from("cache_size_results.csv"),
            x_axis: XAxis::CacheSize,
            title: String::from("Varying Cache Size"),
        },
        TableInput {
            path: PathBuf::from("associativity_results.csv"),
            x_axis: XAxis::Associativity,
            title: String::from("Varying Associativity"),
        },
    ]
}
