// src/reaper/handler.rs

//! The SIGCHLD handler.

use std::sync::OnceLock;

use nix::errno::Errno;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use tracing::debug;

use super::event::StatusEvent;
use super::ring::EventRing;
use crate::errors::Result;

static REAPER: OnceLock<EventRing> = OnceLock::new();

/// Allocate the process-wide event ring and install the SIGCHLD handler.
///
/// Calling this again returns the existing ring; the capacity of the first
/// call wins.
pub fn install(capacity: usize) -> Result<&'static EventRing> {
    let ring = REAPER.get_or_init(|| EventRing::with_capacity(capacity));

    let action = SigAction::new(
        SigHandler::Handler(on_sigchld),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    // SAFETY: the handler only calls waitpid and touches atomics.
    unsafe { sigaction(Signal::SIGCHLD, &action) }?;

    debug!(capacity = ring.capacity(), "SIGCHLD reaper installed");
    Ok(ring)
}

/// The installed ring, if any.
pub fn installed() -> Option<&'static EventRing> {
    REAPER.get()
}

extern "C" fn on_sigchld(_signal: libc::c_int) {
    let saved = Errno::last_raw();
    if let Some(ring) = REAPER.get() {
        reap_into(ring);
    }
    Errno::set_raw(saved);
}

/// Collect every pending child status change without blocking.
///
/// Retries only on EINTR; stops when no child has anything to report
/// (`StillAlive`) or there are no children left (`ECHILD`). Returns the
/// number of events recorded.
pub fn reap_into(ring: &EventRing) -> usize {
    let flags = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED | WaitPidFlag::WCONTINUED;
    let mut recorded = 0;

    loop {
        match waitpid(None, Some(flags)) {
            Ok(WaitStatus::StillAlive) => break,
            Ok(status) => {
                if let Some(event) = StatusEvent::from_wait_status(status) {
                    ring.push(event);
                    recorded += 1;
                }
            }
            Err(Errno::EINTR) => continue,
            Err(_) => break,
        }
    }

    recorded
}
