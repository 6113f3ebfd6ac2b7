// src/jobs/table.rs

//! The job table.

use nix::unistd::Pid;
use tracing::{debug, trace};

use super::job::{Job, JobId, JobState, Member};

/// Ordered registry of background and suspended jobs.
///
/// Invariants:
/// - ids are handed out in increasing order starting at 1 and never reused;
/// - whenever the table is non-empty exactly one job is current.
///
/// Lookups are linear scans; a shell has tens of jobs, not thousands.
#[derive(Debug)]
pub struct JobTable {
    jobs: Vec<Job>,
    next_id: u32,
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTable {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Register a new job and make it current.
    ///
    /// Returns the new id; the caller announces it with [`added_line`].
    pub fn add(
        &mut self,
        pgid: Pid,
        command: impl Into<String>,
        state: JobState,
        members: &[Pid],
    ) -> JobId {
        let id = JobId(self.next_id);
        self.next_id += 1;

        for job in &mut self.jobs {
            job.current = false;
        }

        let job = Job {
            id,
            pgid,
            command: command.into(),
            state,
            members: members
                .iter()
                .map(|&pid| Member {
                    pid,
                    finished: false,
                })
                .collect(),
            current: true,
            notified: false,
        };

        debug!(job_id = %id, pgid = pgid.as_raw(), state = %state, command = %job.command, "job added");
        self.jobs.push(job);
        id
    }

    /// Remove a job.
    ///
    /// If jobs remain, the *last* remaining entry becomes current (and the
    /// only current one). This is positional, not "previous current job".
    pub fn remove(&mut self, id: JobId) -> Option<Job> {
        let index = self.jobs.iter().position(|j| j.id == id)?;
        let removed = self.jobs.remove(index);

        if let Some(last) = self.jobs.last().map(|j| j.id) {
            self.mark_current(last);
        }

        debug!(job_id = %id, remaining = self.jobs.len(), "job removed");
        Some(removed)
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn get_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|j| j.id == id)
    }

    pub fn by_pgid_mut(&mut self, pgid: Pid) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|j| j.pgid == pgid)
    }

    /// Find the job owning `pid`, falling back to a group-leader match.
    pub fn by_pid_mut(&mut self, pid: Pid) -> Option<&mut Job> {
        let index = self
            .jobs
            .iter()
            .position(|j| j.has_member(pid))
            .or_else(|| self.jobs.iter().position(|j| j.pgid == pid))?;
        self.jobs.get_mut(index)
    }

    /// Plain state assignment; no other bookkeeping.
    pub fn set_state(&mut self, id: JobId, state: JobState) -> bool {
        match self.get_mut(id) {
            Some(job) => {
                trace!(job_id = %id, from = %job.state, to = %state, "job state change");
                job.set_state(state);
                true
            }
            None => false,
        }
    }

    /// Make `id` the only current job. Unknown ids clear every marker.
    pub fn mark_current(&mut self, id: JobId) {
        for job in &mut self.jobs {
            job.current = job.id == id;
        }
    }

    /// The current job, or the last entry if nothing is marked.
    pub fn most_recent(&self) -> Option<&Job> {
        self.jobs
            .iter()
            .find(|j| j.current)
            .or_else(|| self.jobs.last())
    }

    /// `jobs` output, one line per job that is not Done.
    ///
    /// Each call starts a fresh iteration over the current contents.
    pub fn list(&self) -> impl Iterator<Item = String> + '_ {
        self.jobs
            .iter()
            .filter(|j| j.state != JobState::Done)
            .map(Job::listing_line)
    }

    /// Take every Done job that has not been reported yet, marking it
    /// notified and removing it from the table. Lines are returned in table
    /// order and already formatted.
    pub fn take_finished(&mut self) -> Vec<String> {
        let mut lines = Vec::new();

        while let Some(index) = self
            .jobs
            .iter()
            .position(|j| j.state == JobState::Done && !j.notified)
        {
            let job = &mut self.jobs[index];
            job.notified = true;
            lines.push(job.done_line());
            let id = job.id;
            self.remove(id);
        }

        lines
    }
}

/// Announcement printed when a job is registered: `[1] 12345`.
pub fn added_line(id: JobId, pgid: Pid) -> String {
    format!("[{}] {}", id, pgid)
}
