//! Configuration loading and discovery for `placer.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::PlacerConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = "placer.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse placer.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override palette name
    pub palette: Option<String>,
    /// Override grid size
    pub grid_size: Option<usize>,
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override text delimiter
    pub text_delimiter: Option<String>,
    /// Override PNG export scale
    pub scale: Option<u32>,
    /// Override alpha threshold
    pub alpha_threshold: Option<u8>,
}

/// Find placer.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for placer.toml
/// 2. Check XDG_CONFIG_HOME/pixel-placer/placer.toml (or ~/.config/pixel-placer/placer.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find placer.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("pixel-placer").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find placer.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a placer.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the
/// defaults.
pub fn load_config(path: Option<&Path>) -> Result<PlacerConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(PlacerConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<PlacerConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: PlacerConfig = toml::from_str(&contents)?;
    check(&config)?;
    Ok(config)
}

/// Turn validation problems into a `ConfigError`.
pub fn check(config: &PlacerConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. Call [`check`]
/// afterwards, since overrides are not validated here.
pub fn merge_cli_overrides(config: &mut PlacerConfig, overrides: &CliOverrides) {
    if let Some(ref palette) = overrides.palette {
        config.editor.palette = palette.clone();
        // The configured color may not exist in another palette
        if let Some(p) = crate::palettes::get_builtin(palette) {
            if p.lookup(&config.editor.current_color).is_err() {
                if let Some((_, first, _)) = p.opaque().next() {
                    config.editor.current_color = first.code.clone();
                }
            }
        }
    }

    if let Some(grid_size) = overrides.grid_size {
        config.editor.grid_size = grid_size;
    }

    if let Some(ref out) = overrides.out {
        config.export.out = out.clone();
    }

    if let Some(ref delimiter) = overrides.text_delimiter {
        config.export.text_delimiter = delimiter.clone();
    }

    if let Some(scale) = overrides.scale {
        config.export.scale = scale;
    }

    if let Some(alpha_threshold) = overrides.alpha_threshold {
        config.quantize.alpha_threshold = alpha_threshold;
    }
}
