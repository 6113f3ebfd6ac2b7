// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve and load the config the way the binary does.
///
/// - An explicit path (from `--config`) must exist.
/// - Otherwise `TINYSH_CONFIG`, then [`default_config_path`], are tried;
///   if the chosen file does not exist, defaults are used.
pub fn load_for_cli(explicit: Option<&str>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    let path = std::env::var("TINYSH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path());

    if !path.is_file() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(ConfigFile::default());
    }

    debug!(path = %path.display(), "loading config");
    load_and_validate(path)
}

/// Default config location: `tinysh.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("tinysh.toml")
}
