// src/session/builtins.rs

//! Job-control builtins.

use tracing::{debug, warn};

use crate::errors::ShellError;
use crate::exec::{ProcessControl, WaitOutcome};
use crate::jobs::{JobId, JobState};
use crate::parse::Command;

use super::{Session, STATUS_STOPPED};

/// Commands the shell runs itself instead of forking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Jobs,
    Fg,
    Bg,
    Exit,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "jobs" => Some(Builtin::Jobs),
            "fg" => Some(Builtin::Fg),
            "bg" => Some(Builtin::Bg),
            "exit" => Some(Builtin::Exit),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Jobs => "jobs",
            Builtin::Fg => "fg",
            Builtin::Bg => "bg",
            Builtin::Exit => "exit",
        }
    }
}

impl<P: ProcessControl> Session<P> {
    pub(crate) fn run_builtin(&mut self, builtin: Builtin, command: &Command) -> i32 {
        let arg = command.args.get(1).map(String::as_str);
        debug!(builtin = builtin.name(), ?arg, "running builtin");
        match builtin {
            Builtin::Jobs => self.builtin_jobs(),
            Builtin::Fg => self.builtin_fg(arg),
            Builtin::Bg => self.builtin_bg(arg),
            Builtin::Exit => self.exit_status(command),
        }
    }

    /// `jobs`: one line per job that has not finished.
    pub fn builtin_jobs(&mut self) -> i32 {
        self.absorb_status_events();
        let lines: Vec<String> = self.jobs.list().collect();
        for line in lines {
            self.console.line(&line);
        }
        0
    }

    /// `fg [%N|N]`: resume a job in the foreground and wait for it.
    pub fn builtin_fg(&mut self, arg: Option<&str>) -> i32 {
        self.absorb_status_events();
        let id = match self.resolve_job("fg", arg) {
            Ok(id) => id,
            Err(e) => {
                self.report_error(&e);
                return 1;
            }
        };

        let Some(job) = self.jobs.get(id) else {
            return 1;
        };
        let pgid = job.pgid();
        let stopped = job.state() == JobState::Stopped;
        let pending = job.unfinished_pids();
        let text = job.command().to_owned();

        if let Err(e) = self.control.hold_child_signals() {
            self.report_error(&e);
            return 1;
        }

        self.jobs.mark_current(id);
        self.console.line(&text);

        self.control.give_terminal(pgid);
        if stopped {
            if let Err(e) = self.control.continue_job(pgid) {
                warn!(job_id = %id, pgid = pgid.as_raw(), error = %e, "failed to continue job");
            }
        }
        self.jobs.set_state(id, JobState::Running);

        let outcome = self.control.wait_foreground(pgid, &pending);
        self.control.reclaim_terminal();
        self.control.release_child_signals();

        if let Some(job) = self.jobs.get_mut(id) {
            for &pid in outcome.reaped() {
                job.mark_finished(pid);
            }
        }

        match outcome {
            WaitOutcome::Completed { status, .. } => {
                self.jobs.remove(id);
                self.report_exit(status)
            }
            WaitOutcome::Stopped { .. } => {
                self.jobs.set_state(id, JobState::Stopped);
                self.print_stopped_banner(id);
                STATUS_STOPPED
            }
        }
    }

    /// `bg [%N|N]`: resume a stopped job in the background.
    pub fn builtin_bg(&mut self, arg: Option<&str>) -> i32 {
        self.absorb_status_events();
        let id = match self.resolve_job("bg", arg) {
            Ok(id) => id,
            Err(e) => {
                self.report_error(&e);
                return 1;
            }
        };

        let Some(job) = self.jobs.get(id) else {
            return 1;
        };
        if job.state() != JobState::Stopped {
            self.report_error(&ShellError::InvalidJobState {
                builtin: "bg",
                job_id: id.0,
            });
            return 1;
        }

        self.jobs.mark_current(id);
        let Some(job) = self.jobs.get(id) else {
            return 1;
        };
        let pgid = job.pgid();
        let line = job.resumed_line();
        self.console.line(&line);

        if let Err(e) = self.control.continue_job(pgid) {
            self.report_error(&e);
            return 1;
        }
        self.jobs.set_state(id, JobState::Running);
        0
    }

    /// Status requested by `exit [N]`. A non-numeric argument is reported
    /// and exits with 2.
    pub(crate) fn exit_status(&mut self, command: &Command) -> i32 {
        match command.args.get(1) {
            None => 0,
            Some(arg) => match arg.parse::<i32>() {
                Ok(code) => code,
                Err(_) => {
                    self.console
                        .error(&format!("exit: {arg}: numeric argument required"));
                    2
                }
            },
        }
    }

    /// Explicit `%N`/`N`, or the current job when no argument is given.
    /// Finished jobs awaiting their report are not eligible.
    fn resolve_job(&self, builtin: &'static str, arg: Option<&str>) -> Result<JobId, ShellError> {
        match arg {
            Some(jobspec) => {
                let digits = jobspec.strip_prefix('%').unwrap_or(jobspec);
                digits
                    .parse::<u32>()
                    .ok()
                    .map(JobId)
                    .filter(|&id| {
                        self.jobs
                            .get(id)
                            .is_some_and(|job| job.state() != JobState::Done)
                    })
                    .ok_or_else(|| ShellError::JobLookupFailure {
                        builtin,
                        jobspec: format!("%{digits}"),
                    })
            }
            None => self
                .jobs
                .most_recent()
                .filter(|job| job.state() != JobState::Done)
                .map(|job| job.id())
                .ok_or_else(|| ShellError::JobLookupFailure {
                    builtin,
                    jobspec: "current".to_owned(),
                }),
        }
    }

    pub(crate) fn print_stopped_banner(&mut self, id: JobId) {
        if let Some(job) = self.jobs.get(id) {
            let line = format!("\n{}", job.stopped_line());
            self.console.line(&line);
        }
    }
}
