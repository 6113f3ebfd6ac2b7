// src/session/mod.rs

//! The shell's main-thread state and everything that mutates it.
//!
//! A [`Session`] owns the job table, the process controller and the console.
//! Its behaviour is split across:
//!
//! - [`executor`]: running parsed lines, single commands and pipelines;
//! - [`notifier`]: applying reaper events to the table and reporting
//!   finished jobs before each prompt;
//! - [`builtins`]: `jobs`, `fg`, `bg` and `exit`.

pub mod builtins;
pub mod executor;
pub mod notifier;

use tracing::debug;

use crate::config::ConfigFile;
use crate::console::Console;
use crate::errors::ShellError;
use crate::exec::ProcessControl;
use crate::jobs::JobTable;
use crate::reaper::StatusEvent;

pub use builtins::Builtin;

/// Status of a line whose command could not be found.
pub const STATUS_NOT_FOUND: i32 = 127;

/// Status of a foreground job that was stopped (128 + SIGTSTP).
pub const STATUS_STOPPED: i32 = 128 + libc::SIGTSTP;

/// Session behaviour taken from the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Print `[Process exited with code: N]` and friends after foreground
    /// jobs that fail.
    pub report_exit_status: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            report_exit_status: true,
        }
    }
}

impl From<&ConfigFile> for SessionSettings {
    fn from(config: &ConfigFile) -> Self {
        Self {
            report_exit_status: config.shell().report_exit_status,
        }
    }
}

/// What the read loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue(i32),
    Exit(i32),
}

pub struct Session<P: ProcessControl> {
    jobs: JobTable,
    control: P,
    console: Console,
    settings: SessionSettings,
    last_status: i32,
    /// A job reached Done outside the notifier's own drain.
    pending_report: bool,
    /// Scratch buffer reused for every drain of the reaper ring.
    events: Vec<StatusEvent>,
}

impl<P: ProcessControl> Session<P> {
    pub fn new(control: P, console: Console, settings: SessionSettings) -> Self {
        debug!(?settings, "session created");
        Self {
            jobs: JobTable::new(),
            control,
            console,
            settings,
            last_status: 0,
            pending_report: false,
            events: Vec::new(),
        }
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    pub fn control(&self) -> &P {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut P {
        &mut self.control
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    /// Status of the last line executed.
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    pub(crate) fn report_error(&mut self, error: &ShellError) {
        self.console.error(&error.to_string());
    }
}
