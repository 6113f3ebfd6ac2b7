use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use nix::errno::Errno;
use nix::unistd::Pid;
use tracing::debug;
use tinysh::errors::{Result, ShellError};
use tinysh::exec::{ExitStatus, LaunchRequest, Launched, ProcessControl, WaitOutcome};
use tinysh::reaper::{StatusChange, StatusEvent};

/// First pid handed out by [`FakeProcessControl`].
pub const FIRST_PID: i32 = 1000;

/// One request the session made of its process controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCall {
    Launch {
        pgid: Pid,
        stages: Vec<String>,
        foreground: bool,
    },
    GiveTerminal(Pid),
    ReclaimTerminal,
    Continue(Pid),
    HoldChildSignals,
    ReleaseChildSignals,
    Wait {
        pgid: Pid,
        members: Vec<Pid>,
    },
}

#[derive(Debug, Clone, Copy)]
enum ScriptedWait {
    Complete(ExitStatus),
    Stop(i32),
}

/// A fake process controller that:
/// - never forks; each launch hands out consecutive pids from 1000, the
///   first stage's pid doubling as the process group id
/// - records every call so tests can assert on ordering
/// - answers foreground waits from a script (default: exit 0)
/// - replays status events pushed by the test as if the reaper saw them.
#[derive(Debug)]
pub struct FakeProcessControl {
    next_pid: i32,
    missing: HashSet<String>,
    calls: Vec<ControlCall>,
    launches: Vec<LaunchRequest>,
    waits: VecDeque<ScriptedWait>,
    events: Vec<StatusEvent>,
    dirty: bool,
    launch_failure: Option<Errno>,
    hold_failure: Option<Errno>,
    held: bool,
}

impl Default for FakeProcessControl {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeProcessControl {
    pub fn new() -> Self {
        Self {
            next_pid: FIRST_PID,
            missing: HashSet::new(),
            calls: Vec::new(),
            launches: Vec::new(),
            waits: VecDeque::new(),
            events: Vec::new(),
            dirty: false,
            launch_failure: None,
            hold_failure: None,
            held: false,
        }
    }

    /// Make `program` unresolvable.
    pub fn with_missing(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Next foreground wait completes with `exit(code)`.
    pub fn push_wait_exit(&mut self, code: i32) {
        self.waits
            .push_back(ScriptedWait::Complete(ExitStatus::Exited(code)));
    }

    /// Next foreground wait completes with death by `signal`.
    pub fn push_wait_signal(&mut self, signal: i32) {
        self.waits
            .push_back(ScriptedWait::Complete(ExitStatus::Signaled(signal)));
    }

    /// Next foreground wait reports a stop by `signal`.
    pub fn push_wait_stop(&mut self, signal: i32) {
        self.waits.push_back(ScriptedWait::Stop(signal));
    }

    /// Record a status change as the reaper would, raising the dirty flag.
    pub fn push_event(&mut self, pid: i32, change: StatusChange) {
        self.events.push(StatusEvent::new(Pid::from_raw(pid), change));
        self.dirty = true;
    }

    /// Make the next launch fail as if `fork` returned `errno`.
    pub fn fail_next_launch(&mut self, errno: Errno) {
        self.launch_failure = Some(errno);
    }

    /// Make the next attempt to block SIGCHLD fail with `errno`.
    pub fn fail_next_hold(&mut self, errno: Errno) {
        self.hold_failure = Some(errno);
    }

    pub fn calls(&self) -> &[ControlCall] {
        &self.calls
    }

    pub fn launches(&self) -> &[LaunchRequest] {
        &self.launches
    }

    /// Whether child signals are currently held.
    pub fn is_holding(&self) -> bool {
        self.held
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl ProcessControl for FakeProcessControl {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        if self.missing.contains(program) {
            None
        } else {
            Some(PathBuf::from("/usr/bin").join(program))
        }
    }

    fn launch(&mut self, request: &LaunchRequest) -> Result<Launched> {
        if let Some(errno) = self.launch_failure.take() {
            debug!(error = %errno, "scripted launch failure");
            return Err(ShellError::ForkFailure(errno));
        }

        let pids: Vec<Pid> = request
            .stages
            .iter()
            .map(|_| {
                let pid = Pid::from_raw(self.next_pid);
                self.next_pid += 1;
                pid
            })
            .collect();
        let pgid = pids[0];

        self.calls.push(ControlCall::Launch {
            pgid,
            stages: request
                .stages
                .iter()
                .map(|s| s.command.display_text())
                .collect(),
            foreground: request.foreground,
        });
        self.launches.push(request.clone());
        debug!(pgid = pgid.as_raw(), stages = pids.len(), "fake launch");

        Ok(Launched { pgid, pids })
    }

    fn give_terminal(&mut self, pgid: Pid) {
        self.calls.push(ControlCall::GiveTerminal(pgid));
    }

    fn reclaim_terminal(&mut self) {
        self.calls.push(ControlCall::ReclaimTerminal);
    }

    fn continue_job(&mut self, pgid: Pid) -> Result<()> {
        self.calls.push(ControlCall::Continue(pgid));
        Ok(())
    }

    fn hold_child_signals(&mut self) -> Result<()> {
        if let Some(errno) = self.hold_failure.take() {
            debug!(error = %errno, "scripted sigprocmask failure");
            return Err(ShellError::Sys(errno));
        }
        self.held = true;
        self.calls.push(ControlCall::HoldChildSignals);
        Ok(())
    }

    fn release_child_signals(&mut self) {
        self.held = false;
        self.calls.push(ControlCall::ReleaseChildSignals);
    }

    fn wait_foreground(&mut self, pgid: Pid, members: &[Pid]) -> WaitOutcome {
        self.calls.push(ControlCall::Wait {
            pgid,
            members: members.to_vec(),
        });

        match self
            .waits
            .pop_front()
            .unwrap_or(ScriptedWait::Complete(ExitStatus::Exited(0)))
        {
            ScriptedWait::Complete(status) => WaitOutcome::Completed {
                status,
                reaped: members.to_vec(),
            },
            ScriptedWait::Stop(signal) => WaitOutcome::Stopped {
                signal,
                reaped: Vec::new(),
            },
        }
    }

    fn take_status_events(&mut self, events: &mut Vec<StatusEvent>) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        events.append(&mut self.events);
        true
    }
}
