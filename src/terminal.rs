// src/terminal.rs

//! Controlling-terminal ownership and the shell's signal dispositions.

use std::io::IsTerminal;
use std::os::fd::{BorrowedFd, RawFd};

use nix::sys::signal::{
    killpg, sigaction, sigprocmask, SaFlags, SigAction, SigHandler, SigSet, SigmaskHow, Signal,
};
use nix::unistd::{getpgrp, getpid, setpgid, tcgetpgrp, tcsetpgrp, Pid};
use tracing::{debug, trace, warn};

use crate::errors::Result;

/// Signals the shell changes and every child must restore before exec.
pub const CHILD_RESET_SIGNALS: [Signal; 6] = [
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGTSTP,
    Signal::SIGTTIN,
    Signal::SIGTTOU,
    Signal::SIGCHLD,
];

/// The shell's view of its controlling terminal, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct TerminalState {
    fd: RawFd,
    shell_pgid: Pid,
    interactive: bool,
}

impl TerminalState {
    /// Take over the terminal if stdin is one.
    ///
    /// Waits (by stopping itself with SIGTTIN) until the shell's group is
    /// in the foreground, installs the shell's signal dispositions, moves
    /// the shell into its own process group and claims the terminal.
    pub fn init() -> Result<Self> {
        let fd = libc::STDIN_FILENO;
        if !std::io::stdin().is_terminal() {
            debug!("stdin is not a terminal; job control without terminal handoff");
            return Ok(Self::detached());
        }

        let tty = borrow(fd);
        loop {
            let pgid = getpgrp();
            if tcgetpgrp(tty)? == pgid {
                break;
            }
            trace!(pgid = pgid.as_raw(), "shell not in foreground; stopping until it is");
            killpg(pgid, Signal::SIGTTIN)?;
        }

        install_shell_dispositions()?;

        let pid = getpid();
        if getpgrp() != pid {
            setpgid(pid, pid)?;
        }
        tcsetpgrp(tty, pid)?;

        debug!(shell_pgid = pid.as_raw(), "terminal claimed");
        Ok(Self {
            fd,
            shell_pgid: pid,
            interactive: true,
        })
    }

    /// No terminal: jobs still get their own process groups, but nothing
    /// is ever handed over.
    pub fn detached() -> Self {
        Self {
            fd: libc::STDIN_FILENO,
            shell_pgid: getpgrp(),
            interactive: false,
        }
    }

    pub fn fd(&self) -> RawFd {
        self.fd
    }

    pub fn shell_pgid(&self) -> Pid {
        self.shell_pgid
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Make `pgid` the terminal's foreground group.
    pub fn give_to(&self, pgid: Pid) {
        if !self.interactive {
            return;
        }
        if let Err(e) = tcsetpgrp(borrow(self.fd), pgid) {
            warn!(pgid = pgid.as_raw(), error = %e, "failed to hand terminal to job");
        } else {
            trace!(pgid = pgid.as_raw(), "terminal handed to job");
        }
    }

    /// Give the terminal back to the shell's own group.
    pub fn reclaim(&self) {
        self.give_to(self.shell_pgid);
    }
}

/// stdin stays open for the life of the process.
pub(crate) fn borrow(fd: RawFd) -> BorrowedFd<'static> {
    // SAFETY: `fd` is one of the standard descriptors, never closed by the shell.
    unsafe { BorrowedFd::borrow_raw(fd) }
}

extern "C" fn ignore_keyboard_signal(_signal: libc::c_int) {}

/// Shell-side dispositions.
///
/// SIGINT and SIGTSTP get a no-op handler rather than SIG_IGN, so the
/// kernel still delivers them to the terminal's foreground group and exec
/// resets them in children regardless.
pub fn install_shell_dispositions() -> Result<()> {
    let noop = SigAction::new(
        SigHandler::Handler(ignore_keyboard_signal),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());

    // SAFETY: the installed handler does nothing.
    unsafe {
        sigaction(Signal::SIGINT, &noop)?;
        sigaction(Signal::SIGTSTP, &noop)?;
        sigaction(Signal::SIGQUIT, &ignore)?;
        sigaction(Signal::SIGTTIN, &ignore)?;
        sigaction(Signal::SIGTTOU, &ignore)?;
    }
    Ok(())
}

/// Restore default dispositions in a freshly forked child and unblock
/// SIGCHLD. Errors are ignored; this runs between fork and exec.
pub fn reset_child_dispositions() {
    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    for signal in CHILD_RESET_SIGNALS {
        // SAFETY: restoring SIG_DFL.
        let _ = unsafe { sigaction(signal, &default) };
    }

    let mut set = SigSet::empty();
    set.add(Signal::SIGCHLD);
    let _ = sigprocmask(SigmaskHow::SIG_UNBLOCK, Some(&set), None);
}

/// Keeps SIGCHLD blocked while alive.
///
/// Held around a synchronous foreground wait so the reaper cannot collect
/// the statuses the shell is waiting for. Dropping it restores the previous
/// mask, which delivers any SIGCHLD that arrived meanwhile.
#[derive(Debug)]
pub struct ChildSignalBlock {
    previous: SigSet,
}

impl ChildSignalBlock {
    pub fn new() -> Result<Self> {
        let mut set = SigSet::empty();
        set.add(Signal::SIGCHLD);
        let mut previous = SigSet::empty();
        sigprocmask(SigmaskHow::SIG_BLOCK, Some(&set), Some(&mut previous))?;
        Ok(Self { previous })
    }
}

impl Drop for ChildSignalBlock {
    fn drop(&mut self) {
        if let Err(e) = sigprocmask(SigmaskHow::SIG_SETMASK, Some(&self.previous), None) {
            warn!(error = %e, "failed to restore signal mask");
        }
    }
}
