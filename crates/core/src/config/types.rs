use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::templates::DEFAULT_MAX_DEPTH;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub expansion: ExpansionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub project_root: String,
    pub templates_dir: String,
    pub data_dir: String,
    pub output_dir: String,
    /// Where rendered plot images go (defaults to `<output_dir>/figures`).
    pub figures_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self { max_depth: default_max_depth() }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub project_root: PathBuf,
    pub templates_dir: PathBuf,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub expansion: ExpansionConfig,
    pub logging: LoggingConfig,
}
