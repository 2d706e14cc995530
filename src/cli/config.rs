use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::error::{CliError, CliResult};
use crate::config::Config;

/// Load the configuration.
///
/// An explicit path must exist. Without one, the platform config file is used
/// when present and built-in defaults otherwise.
pub fn load_config(config_path: Option<&str>) -> CliResult<Config> {
    let config_file = match config_path {
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(CliError::ConfigNotFound(path));
            }
            path
        }
        None => {
            let default_path = get_default_config_path()?;
            if !default_path.exists() {
                debug!("No configuration file at {}, using defaults", default_path.display());
                return Ok(Config::default());
            }
            default_path
        }
    };

    debug!("Loading configuration from {}", config_file.display());
    Config::from_file(&config_file)
        .map_err(|e| CliError::Config(format!("{}: {}", config_file.display(), e)))
}

pub fn get_default_config_path() -> CliResult<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "peft-compare")
        .ok_or_else(|| CliError::Config("Failed to determine config directory".to_string()))?;

    Ok(proj_dirs.config_dir().join("config.yaml"))
}

pub fn show_config(config: &Config) -> CliResult<()> {
    let yaml_content = serde_yaml::to_string(config)?;
    println!("{}", yaml_content);
    Ok(())
}

pub fn init_config(path: Option<&str>, force: bool) -> CliResult<PathBuf> {
    let config_path = match path {
        Some(path) => PathBuf::from(path),
        None => get_default_config_path()?,
    };

    if config_path.exists() && !force {
        return Err(CliError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    Config::default().save(&config_path)?;
    Ok(config_path)
}
