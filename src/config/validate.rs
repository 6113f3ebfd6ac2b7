// src/config/validate.rs

use crate::config::model::{
    ConfigFile, RawConfigFile, MAX_EVENT_CAPACITY, MIN_EVENT_CAPACITY,
};
use crate::errors::{Result, ShellError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ShellError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.shell, raw.jobs))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_shell_section(cfg)?;
    validate_jobs_section(cfg)?;
    Ok(())
}

fn validate_shell_section(cfg: &RawConfigFile) -> Result<()> {
    // color is strongly typed and validated during deserialization.

    if cfg.shell.prompt.is_empty() {
        return Err(ShellError::ConfigError(
            "[shell].prompt must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_jobs_section(cfg: &RawConfigFile) -> Result<()> {
    let capacity = cfg.jobs.event_capacity;

    if !(MIN_EVENT_CAPACITY..=MAX_EVENT_CAPACITY).contains(&capacity) {
        return Err(ShellError::ConfigError(format!(
            "[jobs].event_capacity must be within {}..={} (got {})",
            MIN_EVENT_CAPACITY, MAX_EVENT_CAPACITY, capacity
        )));
    }

    if !capacity.is_power_of_two() {
        return Err(ShellError::ConfigError(format!(
            "[jobs].event_capacity must be a power of two (got {})",
            capacity
        )));
    }

    Ok(())
}
