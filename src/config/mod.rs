mod cli;
mod types;

pub use cli::{Cli, Command, InputArgs};
pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "genome-batch.yaml";

/// Loads the configuration file.
///
/// An explicit path (argument or `CONFIG_PATH`) must exist. The default
/// `genome-batch.yaml` is optional and falls back to built-in defaults.
/// `GENOME_API_KEY` overrides `model.api_key` when set.
pub async fn load(path: Option<&Path>) -> Result<Config> {
    let explicit = path
        .map(Path::to_path_buf)
        .or_else(|| env::var("CONFIG_PATH").ok().map(PathBuf::from));

    let mut config = match explicit {
        Some(config_path) => {
            debug!("Loading configuration from: {}", config_path.display());
            let config_str = tokio::fs::read_to_string(&config_path).await.map_err(|e| {
                Error::config(format!(
                    "Failed to read {}: {}",
                    config_path.display(),
                    e
                ))
            })?;
            parse(&config_str)?
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            debug!("Loading configuration from: {}", DEFAULT_CONFIG_PATH);
            let config_str = tokio::fs::read_to_string(DEFAULT_CONFIG_PATH).await?;
            parse(&config_str)?
        }
        None => {
            debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    if let Ok(api_key) = env::var("GENOME_API_KEY") {
        config.model.api_key = api_key;
    }

    Ok(config)
}

/// Parses and validates a YAML configuration document.
pub fn parse(config_str: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(config_str)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.monitor.limit == 0 {
        return Err(Error::config("monitor.limit must be greater than 0"));
    }
    let threshold = config.monitor.warning_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(Error::config(format!(
            "monitor.warning_threshold must be in (0, 1], got {threshold}"
        )));
    }
    Ok(())
}

/// Resolves a path under `~/work/`, the tool's home-based storage root.
pub fn work_dir_path(file_name: &str) -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::config("Could not determine home directory"))?;
    Ok(home.join("work").join(file_name))
}
