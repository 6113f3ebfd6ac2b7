// src/session/executor.rs

//! Running parsed lines: single commands and pipelines, in the foreground
//! or the background.

use tracing::{debug, info};

use crate::errors::ShellError;
use crate::exec::{ExitStatus, LaunchRequest, ProcessControl, StagePlan, WaitOutcome};
use crate::jobs::{added_line, JobState};
use crate::parse::{Command, Pipeline};

use super::{Builtin, LineOutcome, Session, STATUS_NOT_FOUND, STATUS_STOPPED};

impl<P: ProcessControl> Session<P> {
    /// Run one parsed line.
    ///
    /// `exit` anywhere in the line ends the session. Builtins are only
    /// recognised for a single command without pipes.
    pub fn execute(&mut self, pipeline: &Pipeline) -> LineOutcome {
        if pipeline.is_empty() {
            return LineOutcome::Continue(self.last_status);
        }

        if let Some(exit) = pipeline
            .commands
            .iter()
            .find(|c| c.program() == Some(Builtin::Exit.name()))
        {
            return LineOutcome::Exit(self.exit_status(exit));
        }

        let status = match pipeline.commands.as_slice() {
            [command] if !pipeline.has_pipes => match command.program().and_then(Builtin::from_name) {
                Some(builtin) => self.run_builtin(builtin, command),
                None => self.execute_command(command),
            },
            _ => self.execute_pipeline(pipeline),
        };

        self.last_status = status;
        LineOutcome::Continue(status)
    }

    /// Run one external command.
    pub fn execute_command(&mut self, command: &Command) -> i32 {
        let Some(name) = command.program() else {
            return self.last_status;
        };

        let Some(program) = self.control.resolve(name) else {
            self.report_error(&ShellError::CommandNotFound(name.to_owned()));
            return STATUS_NOT_FOUND;
        };

        let request = LaunchRequest {
            stages: vec![StagePlan {
                program: Some(program),
                command: command.clone(),
            }],
            foreground: !command.background,
        };
        self.run_job(&request, command.display_text())
    }

    /// Run every stage of `pipeline` in one process group.
    ///
    /// Unresolved stages are still forked; their child reports the missing
    /// command and exits 127 while the other stages run.
    pub fn execute_pipeline(&mut self, pipeline: &Pipeline) -> i32 {
        let stages = pipeline
            .commands
            .iter()
            .map(|command| StagePlan {
                program: command.program().and_then(|name| self.control.resolve(name)),
                command: command.clone(),
            })
            .collect();

        let request = LaunchRequest {
            stages,
            foreground: !pipeline.background,
        };
        self.run_job(&request, pipeline.display_text())
    }

    fn run_job(&mut self, request: &LaunchRequest, text: String) -> i32 {
        if request.foreground {
            self.run_foreground(request, text)
        } else {
            self.run_background(request, text)
        }
    }

    fn run_background(&mut self, request: &LaunchRequest, text: String) -> i32 {
        let launched = match self.control.launch(request) {
            Ok(launched) => launched,
            Err(e) => {
                self.report_error(&e);
                return 1;
            }
        };

        let id = self
            .jobs
            .add(launched.pgid, text, JobState::Running, &launched.pids);
        self.console.line(&added_line(id, launched.pgid));
        0
    }

    fn run_foreground(&mut self, request: &LaunchRequest, text: String) -> i32 {
        if let Err(e) = self.control.hold_child_signals() {
            self.report_error(&e);
            return 1;
        }

        let launched = match self.control.launch(request) {
            Ok(launched) => launched,
            Err(e) => {
                self.control.release_child_signals();
                self.report_error(&e);
                return 1;
            }
        };

        self.control.give_terminal(launched.pgid);
        let outcome = self.control.wait_foreground(launched.pgid, &launched.pids);
        self.control.reclaim_terminal();
        self.control.release_child_signals();

        match outcome {
            WaitOutcome::Completed { status, .. } => {
                debug!(pgid = launched.pgid.as_raw(), status = status.code(), "foreground job finished");
                self.report_exit(status)
            }
            WaitOutcome::Stopped { signal, reaped } => {
                let id = self
                    .jobs
                    .add(launched.pgid, text, JobState::Stopped, &launched.pids);
                if let Some(job) = self.jobs.get_mut(id) {
                    for pid in reaped {
                        job.mark_finished(pid);
                    }
                }
                info!(job_id = %id, pgid = launched.pgid.as_raw(), signal, "foreground job stopped");

                self.console.line(&added_line(id, launched.pgid));
                self.print_stopped_banner(id);
                STATUS_STOPPED
            }
        }
    }

    /// Report a failed foreground job and turn its status into a shell
    /// status.
    pub(crate) fn report_exit(&mut self, status: ExitStatus) -> i32 {
        if self.settings.report_exit_status {
            match status {
                ExitStatus::Exited(0) => {}
                ExitStatus::Exited(code) => {
                    self.console
                        .info(&format!("[Process exited with code: {code}]"));
                }
                ExitStatus::Signaled(signal) => {
                    self.console
                        .info(&format!("[Process terminated by signal: {signal}]"));
                }
            }
        }
        status.code()
    }
}
