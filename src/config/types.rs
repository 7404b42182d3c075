use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::export::ExportFormat;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: f64,
    /// Usage log location. Falls back to `~/work/api_usage.log`.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Results directory. Falls back to `~/work/results`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_formats")]
    pub formats: Vec<ExportFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: default_limit(),
            warning_threshold: default_warning_threshold(),
            log_path: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            formats: default_formats(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_limit() -> u64 {
    1_000_000
}

fn default_warning_threshold() -> f64 {
    0.9
}

fn default_formats() -> Vec<ExportFormat> {
    vec![ExportFormat::Csv]
}

fn default_log_level() -> String {
    "info".to_string()
}
