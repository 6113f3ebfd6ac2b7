// src/reaper/event.rs

//! Raw child status changes and their packed ring representation.

use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;

/// What happened to a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Exited(i32),
    Signaled(i32),
    Stopped(i32),
    Continued,
}

impl StatusChange {
    /// Exited or killed: the process is gone.
    pub fn is_terminal(self) -> bool {
        matches!(self, StatusChange::Exited(_) | StatusChange::Signaled(_))
    }
}

/// One status change observed by `waitpid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEvent {
    pub pid: Pid,
    pub change: StatusChange,
}

const KIND_EXITED: u64 = 1;
const KIND_SIGNALED: u64 = 2;
const KIND_STOPPED: u64 = 3;
const KIND_CONTINUED: u64 = 4;

impl StatusEvent {
    pub fn new(pid: Pid, change: StatusChange) -> Self {
        Self { pid, change }
    }

    /// Translate a `waitpid` result. Ptrace and still-alive statuses yield
    /// `None`.
    pub fn from_wait_status(status: WaitStatus) -> Option<Self> {
        let event = match status {
            WaitStatus::Exited(pid, code) => Self::new(pid, StatusChange::Exited(code)),
            WaitStatus::Signaled(pid, signal, _) => {
                Self::new(pid, StatusChange::Signaled(signal as i32))
            }
            WaitStatus::Stopped(pid, signal) => {
                Self::new(pid, StatusChange::Stopped(signal as i32))
            }
            WaitStatus::Continued(pid) => Self::new(pid, StatusChange::Continued),
            _ => return None,
        };
        Some(event)
    }

    /// Pack into one word: pid in the high half, then an 8-bit kind and a
    /// 24-bit payload. A packed event is never zero.
    pub(crate) fn pack(self) -> u64 {
        let (kind, payload) = match self.change {
            StatusChange::Exited(code) => (KIND_EXITED, code as u32 as u64),
            StatusChange::Signaled(sig) => (KIND_SIGNALED, sig as u32 as u64),
            StatusChange::Stopped(sig) => (KIND_STOPPED, sig as u32 as u64),
            StatusChange::Continued => (KIND_CONTINUED, 0),
        };
        ((self.pid.as_raw() as u32 as u64) << 32) | (kind << 24) | (payload & 0x00ff_ffff)
    }

    pub(crate) fn unpack(word: u64) -> Option<Self> {
        let pid = Pid::from_raw((word >> 32) as u32 as i32);
        let payload = (word & 0x00ff_ffff) as i32;
        let change = match (word >> 24) & 0xff {
            KIND_EXITED => StatusChange::Exited(payload),
            KIND_SIGNALED => StatusChange::Signaled(payload),
            KIND_STOPPED => StatusChange::Stopped(payload),
            KIND_CONTINUED => StatusChange::Continued,
            _ => return None,
        };
        Some(Self { pid, change })
    }
}
