// src/config/model.rs

use serde::Deserialize;

use crate::types::ColorMode;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [shell]
/// prompt = "tinysh:{cwd}$ "
/// color = "auto"
/// banner = true
/// report_exit_status = true
///
/// [jobs]
/// event_capacity = 256
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// Interactive behaviour from `[shell]`.
    #[serde(default)]
    pub shell: ShellSection,

    /// Job-control tuning from `[jobs]`.
    #[serde(default)]
    pub jobs: JobsSection,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    shell: ShellSection,
    jobs: JobsSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(shell: ShellSection, jobs: JobsSection) -> Self {
        Self { shell, jobs }
    }

    pub fn shell(&self) -> &ShellSection {
        &self.shell
    }

    pub fn jobs(&self) -> &JobsSection {
        &self.jobs
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(ShellSection::default(), JobsSection::default())
    }
}

/// `[shell]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellSection {
    /// Prompt template. `{cwd}` is replaced with the working directory.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// `"auto"`, `"always"` or `"never"`.
    #[serde(default)]
    pub color: ColorMode,

    /// Print the welcome banner in interactive mode.
    #[serde(default = "default_true")]
    pub banner: bool,

    /// Print `[Process exited with code: N]` / `[Process terminated by
    /// signal: N]` after foreground commands that did not succeed.
    #[serde(default = "default_true")]
    pub report_exit_status: bool,
}

fn default_prompt() -> String {
    "tinysh:{cwd}$ ".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            color: ColorMode::default(),
            banner: true,
            report_exit_status: true,
        }
    }
}

/// `[jobs]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobsSection {
    /// Capacity of the reaper's status-event ring.
    ///
    /// Allocated once at startup; must be a power of two.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

pub const MIN_EVENT_CAPACITY: usize = 16;
pub const MAX_EVENT_CAPACITY: usize = 4096;

fn default_event_capacity() -> usize {
    256
}

impl Default for JobsSection {
    fn default() -> Self {
        Self {
            event_capacity: default_event_capacity(),
        }
    }
}
