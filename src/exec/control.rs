// src/exec/control.rs

//! Pluggable process-control abstraction.
//!
//! The session talks to a `ProcessControl` instead of calling `fork`,
//! `waitpid` and `tcsetpgrp` directly. Production code uses
//! [`RealProcessControl`]; tests provide a fake that records what the
//! session asked for and replays scripted wait outcomes.

use std::path::PathBuf;

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tracing::{debug, trace, warn};

use crate::errors::Result;
use crate::lookup;
use crate::parse::Command;
use crate::reaper::{EventRing, StatusEvent};
use crate::terminal::{ChildSignalBlock, TerminalState};

use super::{launcher, wait};

/// One stage of a job, with its program already resolved.
///
/// `program` is `None` when lookup failed; the stage's child then reports
/// "command not found" and exits 127 without aborting its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    pub program: Option<PathBuf>,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub stages: Vec<StagePlan>,
    pub foreground: bool,
}

/// A running job: its process group and member pids in stage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launched {
    pub pgid: Pid,
    pub pids: Vec<Pid>,
}

/// How a job's last stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(i32),
    Signaled(i32),
}

impl ExitStatus {
    /// Shell status: the exit code, or 128 plus the signal number.
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Exited(code) => code,
            ExitStatus::Signaled(signal) => 128 + signal,
        }
    }

    pub fn success(self) -> bool {
        self == ExitStatus::Exited(0)
    }
}

/// Result of a synchronous foreground wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Every member is gone.
    Completed { status: ExitStatus, reaped: Vec<Pid> },
    /// A member stopped; the others may still be alive.
    Stopped { signal: i32, reaped: Vec<Pid> },
}

impl WaitOutcome {
    /// Members collected by the wait itself.
    pub fn reaped(&self) -> &[Pid] {
        match self {
            WaitOutcome::Completed { reaped, .. } | WaitOutcome::Stopped { reaped, .. } => reaped,
        }
    }
}

/// Everything the session needs from the operating system.
///
/// Production code uses [`RealProcessControl`]; tests can provide their own
/// implementation that never forks.
pub trait ProcessControl {
    /// Locate `program` on the search path.
    fn resolve(&self, program: &str) -> Option<PathBuf>;

    /// Fork every stage into one new process group.
    fn launch(&mut self, request: &LaunchRequest) -> Result<Launched>;

    /// Make `pgid` the terminal's foreground group.
    fn give_terminal(&mut self, pgid: Pid);

    /// Return the terminal to the shell.
    fn reclaim_terminal(&mut self);

    /// Send SIGCONT to every process in the group.
    fn continue_job(&mut self, pgid: Pid) -> Result<()>;

    /// Stop the reaper from collecting statuses until released.
    fn hold_child_signals(&mut self) -> Result<()>;

    fn release_child_signals(&mut self);

    /// Wait synchronously until the listed members finish or one stops.
    fn wait_foreground(&mut self, pgid: Pid, members: &[Pid]) -> WaitOutcome;

    /// Move status changes recorded by the reaper into `events`.
    ///
    /// Returns `false` without touching `events` when nothing was recorded
    /// since the last call.
    fn take_status_events(&mut self, events: &mut Vec<StatusEvent>) -> bool;
}

/// Process control backed by real system calls.
pub struct RealProcessControl {
    terminal: TerminalState,
    reaper: Option<&'static EventRing>,
    block: Option<ChildSignalBlock>,
}

impl RealProcessControl {
    pub fn new(terminal: TerminalState) -> Self {
        Self {
            terminal,
            reaper: None,
            block: None,
        }
    }

    /// Read status changes from the installed reaper's ring.
    pub fn with_reaper(mut self, ring: &'static EventRing) -> Self {
        self.reaper = Some(ring);
        self
    }

    pub fn terminal(&self) -> &TerminalState {
        &self.terminal
    }
}

impl ProcessControl for RealProcessControl {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        lookup::find_in_path(program)
    }

    fn launch(&mut self, request: &LaunchRequest) -> Result<Launched> {
        launcher::launch(request, &self.terminal)
    }

    fn give_terminal(&mut self, pgid: Pid) {
        self.terminal.give_to(pgid);
    }

    fn reclaim_terminal(&mut self) {
        self.terminal.reclaim();
    }

    fn continue_job(&mut self, pgid: Pid) -> Result<()> {
        trace!(pgid = pgid.as_raw(), "sending SIGCONT");
        killpg(pgid, Signal::SIGCONT)?;
        Ok(())
    }

    fn hold_child_signals(&mut self) -> Result<()> {
        if self.block.is_none() {
            self.block = Some(ChildSignalBlock::new()?);
        }
        Ok(())
    }

    fn release_child_signals(&mut self) {
        self.block = None;
    }

    fn wait_foreground(&mut self, pgid: Pid, members: &[Pid]) -> WaitOutcome {
        wait::wait_for_group(pgid, members)
    }

    fn take_status_events(&mut self, events: &mut Vec<StatusEvent>) -> bool {
        let Some(ring) = self.reaper else {
            return false;
        };
        if !ring.take_dirty() {
            return false;
        }

        while let Some(event) = ring.pop() {
            events.push(event);
        }

        let dropped = ring.take_dropped();
        if dropped > 0 {
            warn!(dropped, "status event ring overflowed; some job updates were lost");
        }
        debug!(count = events.len(), "drained status events");
        true
    }
}
