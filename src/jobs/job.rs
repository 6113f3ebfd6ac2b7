// src/jobs/job.rs

use std::fmt;

use nix::unistd::Pid;

/// Session-unique job number, starting at 1 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(pub u32);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a job.
///
/// `Running <-> Stopped`, and either may move to `Done`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Stopped,
    Done,
}

impl JobState {
    pub fn word(self) -> &'static str {
        match self {
            JobState::Running => "Running",
            JobState::Stopped => "Stopped",
            JobState::Done => "Done",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word())
    }
}

/// One process of a job, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub pid: Pid,
    /// Exited or killed, and already reaped.
    pub finished: bool,
}

/// Width the state word is padded to in `jobs` listings, before the
/// separating space.
const STATE_FIELD_WIDTH: usize = 12;

/// A unit of background or suspended work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub(crate) id: JobId,
    pub(crate) pgid: Pid,
    pub(crate) command: String,
    pub(crate) state: JobState,
    pub(crate) members: Vec<Member>,
    pub(crate) current: bool,
    pub(crate) notified: bool,
}

impl Job {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn pgid(&self) -> Pid {
        self.pgid
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn is_current(&self) -> bool {
        self.current
    }

    pub fn is_notified(&self) -> bool {
        self.notified
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member_pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.members.iter().map(|m| m.pid)
    }

    /// Members not yet reaped.
    pub fn unfinished_pids(&self) -> Vec<Pid> {
        self.members
            .iter()
            .filter(|m| !m.finished)
            .map(|m| m.pid)
            .collect()
    }

    pub fn has_member(&self, pid: Pid) -> bool {
        self.members.iter().any(|m| m.pid == pid)
    }

    /// Record that `pid` has exited or been killed.
    ///
    /// Returns true once every member has finished.
    pub fn mark_finished(&mut self, pid: Pid) -> bool {
        if let Some(member) = self.members.iter_mut().find(|m| m.pid == pid) {
            member.finished = true;
        }
        self.all_finished()
    }

    pub fn all_finished(&self) -> bool {
        self.members.iter().all(|m| m.finished)
    }

    pub(crate) fn set_state(&mut self, state: JobState) {
        self.state = state;
    }

    fn marker(&self, other: char) -> char {
        if self.current { '+' } else { other }
    }

    /// `jobs` line: `[1]+ Running      sleep 5 &`.
    pub fn listing_line(&self) -> String {
        let word = self.state.word();
        let suffix = if self.state == JobState::Running { " &" } else { "" };
        format!(
            "[{}]{} {:<width$} {}{}",
            self.id,
            self.marker('-'),
            word,
            self.command,
            suffix,
            width = STATE_FIELD_WIDTH
        )
    }

    /// Completion notice: `[1]+ Done        sleep 5`.
    pub fn done_line(&self) -> String {
        format!("[{}]{} Done        {}", self.id, self.marker(' '), self.command)
    }

    /// Suspension notice: `[1]+ Stopped         sleep 5`.
    pub fn stopped_line(&self) -> String {
        format!(
            "[{}]{} Stopped         {}",
            self.id,
            self.marker(' '),
            self.command
        )
    }

    /// `bg` notice: `[1]+ sleep 5 &`.
    pub fn resumed_line(&self) -> String {
        format!("[{}]{} {} &", self.id, self.marker(' '), self.command)
    }
}
