// src/exec/wait.rs

//! Synchronous wait for a foreground job.

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::{trace, warn};

use super::control::{ExitStatus, WaitOutcome};

/// Wait on the group until every pid in `members` is gone or one stops.
///
/// The job's status is the status of its last member. SIGCHLD should be
/// blocked by the caller so the reaper does not collect these statuses.
pub fn wait_for_group(pgid: Pid, members: &[Pid]) -> WaitOutcome {
    let mut pending: Vec<Pid> = members.to_vec();
    let last = members.last().copied();
    let mut reaped = Vec::with_capacity(members.len());
    let mut status = ExitStatus::Exited(0);

    let group = Pid::from_raw(-pgid.as_raw());

    while !pending.is_empty() {
        let finished = match waitpid(group, Some(WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::Exited(pid, code)) => (pid, ExitStatus::Exited(code)),
            Ok(WaitStatus::Signaled(pid, signal, _)) => (pid, ExitStatus::Signaled(signal as i32)),
            Ok(WaitStatus::Stopped(pid, signal)) => {
                trace!(pid = pid.as_raw(), signal = ?signal, "foreground job stopped");
                return WaitOutcome::Stopped {
                    signal: signal as i32,
                    reaped,
                };
            }
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => {
                trace!(pgid = pgid.as_raw(), "no children left in group");
                break;
            }
            Err(e) => {
                warn!(pgid = pgid.as_raw(), error = %e, "waitpid failed");
                break;
            }
        };

        let (pid, member_status) = finished;
        pending.retain(|&p| p != pid);
        reaped.push(pid);
        if Some(pid) == last {
            status = member_status;
        }
    }

    WaitOutcome::Completed { status, reaped }
}
