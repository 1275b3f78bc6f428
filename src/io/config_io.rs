use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::NavConfig;
use crate::model::menu::{MenuRegistry, RegistryError};

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid menu registry: {0}")]
    RegistryError(#[from] RegistryError),
}

/// Get the config directory: `NAVTREE_CONFIG_DIR`, else
/// `$XDG_CONFIG_HOME/navtree`, else `$HOME/.config/navtree`.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("NAVTREE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_home.join("navtree")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Directory holding the preference records
pub fn prefs_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("prefs")
}

/// Read config.toml from the config directory. A missing file yields the
/// defaults; a malformed one is an error.
pub fn read_config(config_dir: &Path) -> Result<NavConfig, ConfigError> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Ok(NavConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Load the menu registry: an explicit override file, else `menu.toml` in the
/// config directory, else the bundled registry.
pub fn read_registry(config_dir: &Path, override_path: Option<&Path>) -> Result<MenuRegistry, ConfigError> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => {
            let local = config_dir.join("menu.toml");
            if !local.exists() {
                return Ok(MenuRegistry::builtin()?);
            }
            local
        }
    };
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(MenuRegistry::from_toml(&text)?)
}
