// src/session/notifier.rs

//! Applying recorded child status changes to the job table.

use tracing::{debug, trace};

use crate::exec::ProcessControl;
use crate::jobs::JobState;
use crate::reaper::{StatusChange, StatusEvent};

use super::Session;

impl<P: ProcessControl> Session<P> {
    /// Drain the reaper and update job states without printing anything.
    ///
    /// Returns whether the reaper had recorded anything.
    pub fn absorb_status_events(&mut self) -> bool {
        let mut events = std::mem::take(&mut self.events);
        let dirty = self.control.take_status_events(&mut events);
        for event in events.drain(..) {
            self.apply_status_event(event);
        }
        self.events = events;
        dirty
    }

    /// Run once per prompt cycle: absorb pending events, then print and
    /// remove every finished job exactly once.
    pub fn report_status_changes(&mut self) {
        let dirty = self.absorb_status_events();
        if !dirty && !self.pending_report {
            return;
        }
        self.pending_report = false;

        for line in self.jobs.take_finished() {
            self.console.line(&line);
        }
    }

    fn apply_status_event(&mut self, event: StatusEvent) {
        let Some(job) = self.jobs.by_pid_mut(event.pid) else {
            debug!(pid = event.pid.as_raw(), change = ?event.change, "status event for unknown pid");
            return;
        };

        trace!(job_id = %job.id(), pid = event.pid.as_raw(), change = ?event.change, "applying status event");

        if job.state() == JobState::Done {
            return;
        }

        match event.change {
            StatusChange::Exited(_) | StatusChange::Signaled(_) => {
                if job.mark_finished(event.pid) {
                    debug!(job_id = %job.id(), pgid = job.pgid().as_raw(), "job done");
                    job.set_state(JobState::Done);
                    self.pending_report = true;
                }
            }
            StatusChange::Stopped(_) => job.set_state(JobState::Stopped),
            StatusChange::Continued => job.set_state(JobState::Running),
        }
    }
}
