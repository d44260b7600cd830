//! Configuration file lookup for the CLI
//!
//! Search order:
//! 1. Explicit `--config` path
//! 2. Local project file `wardley/config.toml`
//! 3. Platform config directory
//! 4. Built-in defaults

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use wardley::{WardleyError, config::AppConfig};

const LOCAL_CONFIG: &str = "wardley/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for WardleyError {
    fn from(err: ConfigError) -> Self {
        WardleyError::Config(err.to_string())
    }
}

/// Find and load the configuration.
///
/// # Errors
///
/// Returns [`WardleyError::Config`] if an explicit path is missing, or if the
/// chosen file cannot be parsed or fails validation.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, WardleyError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "wardley", "wardley") {
        let system_config = proj_dirs.config_dir().join("config.toml");
        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }
        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, WardleyError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

/// Rejects settings that would only fail later, at render time.
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    config
        .style()
        .background_color()
        .map_err(|err| ConfigError::Validation(format!("style.background_color: {err}")))?;
    config
        .canvas()
        .mapper(None)
        .map_err(|err| ConfigError::Validation(format!("canvas: {err}")))?;
    let duration = config.animation().glitch_duration();
    if duration.is_nan() || duration <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "animation.glitch_duration must be positive, got {duration}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "[canvas]\nwidth = 1024.0\nheight = 768.0\npadding = 32.0\n\n[animation]\nglitch_duration = 1.5\n",
        );

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.canvas().width(), 1024.0);
        assert_eq!(config.animation().glitch_duration(), 1.5);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, WardleyError::Config(msg) if msg.contains("Missing configuration file")));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "[canvas\nwidth = ");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, WardleyError::Config(msg) if msg.contains("TOML")));
    }

    #[test]
    fn test_validation_failures() {
        let dir = tempfile::tempdir().unwrap();

        let path = write(dir.path(), "[style]\nbackground_color = \"not-a-colour\"\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, WardleyError::Config(msg) if msg.contains("background_color")));

        let path = write(dir.path(), "[canvas]\nwidth = 50.0\nheight = 50.0\npadding = 40.0\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, WardleyError::Config(msg) if msg.contains("canvas")));

        let path = write(dir.path(), "[animation]\nglitch_duration = 0.0\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, WardleyError::Config(msg) if msg.contains("glitch_duration")));
    }
}
