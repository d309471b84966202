//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use kiln::{KilnError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for KilnError {
    fn from(err: ConfigError) -> Self {
        KilnError::Config(Box::new(err))
    }
}

/// Load the renderer configuration.
///
/// An explicit `--config` path wins and must exist. Otherwise the first of
/// `kiln/config.toml` and the platform config directory that exists is used,
/// and the built-in datasource defaults apply when neither does.
///
/// # Errors
///
/// Returns [`KilnError::Config`] when the chosen file is missing, unreadable
/// or not valid TOML.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, KilnError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return Ok(load_config_file(path)?);
    }

    let local_config = Path::new("kiln/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return Ok(load_config_file(local_config)?);
    }

    match ProjectDirs::from("com", "kiln", "kiln") {
        Some(dirs) => {
            let user_config = dirs.config_dir().join("config.toml");
            if user_config.exists() {
                info!(path = user_config.display().to_string(); "Loading configuration from user config directory");
                return Ok(load_config_file(&user_config)?);
            }
            debug!(path = user_config.display().to_string(); "No user configuration file");
        }
        None => debug!("No home directory, skipping user configuration"),
    }

    debug!("Using built-in datasource defaults");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
