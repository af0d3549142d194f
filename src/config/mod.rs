mod schema;

pub use schema::{Config, RankingConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::validate_scoring;

/// Get the config directory path (~/.config/entity-ranker/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("entity-ranker"))
}

/// Get the default config file path (~/.config/entity-ranker/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration.
///
/// With an explicit `path` the file must exist. Without one, the default
/// path is used if present; otherwise built-in defaults are returned.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            load_config_file(&path)
        }
        None => match get_config_path() {
            Some(default_path) if default_path.exists() => load_config_file(&default_path),
            _ => {
                tracing::debug!("no config file found, using defaults");
                Ok(Config::default())
            }
        },
    }
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Validate the whole config, collecting every error.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = match validate_scoring(&config.effective_scoring()) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    if let Some(ref ranking) = config.ranking {
        if ranking.workers == Some(0) {
            errors.push("ranking.workers: must be at least 1".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
