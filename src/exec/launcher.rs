// src/exec/launcher.rs

//! Forking and exec'ing the stages of a job into one process group.
//!
//! Everything the children need (argument vectors, redirection paths,
//! pipes) is built before the first `fork`. Between `fork` and `exec` a
//! child only makes raw system calls and exits through `_exit`.

use std::ffi::{CStr, CString};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

use anyhow::anyhow;
use nix::fcntl::OFlag;
use nix::sys::signal::{killpg, Signal};
use nix::sys::wait::waitpid;
use nix::unistd::{close, fork, getpid, pipe2, setpgid, tcsetpgrp, ForkResult, Pid};
use tracing::{debug, trace, warn};

use crate::errors::{ChildFailure, Result, ShellError};
use crate::terminal::{borrow, reset_child_dispositions, ChildSignalBlock, TerminalState};

use super::argv::ArgvBuffer;
use super::control::{LaunchRequest, Launched, StagePlan};
use super::pipes::PipeSet;
use super::redirect::PreparedRedirects;

/// One stage with everything the child will touch already allocated.
#[derive(Debug)]
struct PreparedStage {
    path: Option<CString>,
    argv: ArgvBuffer,
    redirects: PreparedRedirects,
}

impl PreparedStage {
    fn from_plan(plan: &StagePlan) -> Result<Self> {
        let path = plan
            .program
            .as_ref()
            .map(|path| {
                CString::new(path.as_os_str().as_encoded_bytes()).map_err(|_| {
                    ShellError::Other(anyhow!("program path contains a NUL byte: {:?}", path))
                })
            })
            .transpose()?;

        Ok(Self {
            path,
            argv: ArgvBuffer::from_args(&plan.command.args)?,
            redirects: PreparedRedirects::prepare(&plan.command.redirects)?,
        })
    }
}

/// Shared state every child of one launch reads.
struct ChildContext<'a> {
    terminal: TerminalState,
    foreground: bool,
    pipes: &'a PipeSet,
    barrier: RawFd,
}

/// Fork every stage of `request` into a fresh process group.
///
/// The first child's pid becomes the group id. Returns only after every
/// child has joined the group, so the caller may signal or hand the
/// terminal to it right away.
///
/// SIGCHLD stays blocked until then. A leader that dies early remains an
/// unreaped zombie, which keeps its group alive for the later stages.
pub fn launch(request: &LaunchRequest, terminal: &TerminalState) -> Result<Launched> {
    if request.stages.is_empty() {
        return Err(ShellError::Other(anyhow!("cannot launch an empty job")));
    }

    let _held = ChildSignalBlock::new()?;

    let stages = request
        .stages
        .iter()
        .map(PreparedStage::from_plan)
        .collect::<Result<Vec<_>>>()?;

    let pipes = PipeSet::for_stages(stages.len()).map_err(ShellError::PipeCreationFailure)?;
    let (barrier_read, barrier_write) =
        pipe2(OFlag::O_CLOEXEC).map_err(ShellError::PipeCreationFailure)?;

    // Anything buffered would otherwise be written once per child.
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();

    let ctx = ChildContext {
        terminal: *terminal,
        foreground: request.foreground,
        pipes: &pipes,
        barrier: barrier_write.as_raw_fd(),
    };

    let mut pids = Vec::with_capacity(stages.len());
    let mut group: Option<Pid> = None;

    for (index, stage) in stages.iter().enumerate() {
        // SAFETY: the child branch only issues async-signal-safe calls on
        // pre-allocated data and leaves through exec or `_exit`.
        match unsafe { fork() } {
            Ok(ForkResult::Child) => run_child(&ctx, index, group, stage),
            Ok(ForkResult::Parent { child }) => {
                let pgid = *group.get_or_insert(child);
                // Also done by the child; whichever runs first wins, and
                // EACCES after the child's exec is harmless.
                if let Err(e) = setpgid(child, pgid) {
                    trace!(pid = child.as_raw(), error = %e, "parent-side setpgid");
                }
                pids.push(child);
            }
            Err(errno) => {
                warn!(stage = index, error = %errno, "fork failed; abandoning job");
                abandon(group, &pids);
                return Err(ShellError::ForkFailure(errno));
            }
        }
    }

    drop(pipes);
    drop(barrier_write);
    await_group_join(barrier_read);

    let Some(pgid) = group else {
        return Err(ShellError::Other(anyhow!("no stage was forked")));
    };

    debug!(
        pgid = pgid.as_raw(),
        stages = pids.len(),
        foreground = request.foreground,
        "job launched"
    );
    Ok(Launched { pgid, pids })
}

/// Block until every child has closed its copy of the barrier's write end,
/// which each does right after joining the group.
fn await_group_join(barrier: OwnedFd) {
    let mut reader = File::from(barrier);
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(_) => continue,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(error = %e, "process group barrier read failed");
                break;
            }
        }
    }
}

/// Kill and reap the stages already forked when a later fork fails.
fn abandon(group: Option<Pid>, pids: &[Pid]) {
    let Some(pgid) = group else {
        return;
    };
    let _ = killpg(pgid, Signal::SIGKILL);
    for &pid in pids {
        // ECHILD when the reaper got there first.
        let _ = waitpid(pid, None);
    }
}

fn run_child(ctx: &ChildContext<'_>, index: usize, leader: Option<Pid>, stage: &PreparedStage) -> ! {
    let own = Pid::from_raw(0);
    let pgid = leader.unwrap_or(own);
    // Exiting releases the barrier too, but the job then sees a failed
    // member instead of one running outside its group.
    if setpgid(own, pgid).is_err() {
        child_exit(ChildFailure::GroupJoinFailure, None);
    }
    let _ = close(ctx.barrier);

    // SIGTTOU is still ignored here, so a background group may take the
    // terminal.
    if ctx.foreground && ctx.terminal.is_interactive() {
        let target = leader.unwrap_or_else(getpid);
        let _ = tcsetpgrp(borrow(ctx.terminal.fd()), target);
    }

    reset_child_dispositions();
    ctx.pipes.wire_child(index);

    if let Err(failure) = stage.redirects.apply() {
        child_exit(failure, None);
    }

    let Some(path) = &stage.path else {
        child_exit(ChildFailure::CommandNotFound, Some(stage.argv.program()));
    };

    let _ = stage.argv.exec(path);
    child_exit(ChildFailure::ExecFailure, Some(stage.argv.program()))
}

fn child_exit(failure: ChildFailure, program: Option<&CStr>) -> ! {
    write_stderr(failure.message());
    if failure.names_program() {
        if let Some(program) = program {
            write_stderr(program.to_bytes());
        }
        write_stderr(b"\n");
    }
    // SAFETY: `_exit` skips atexit handlers and stdio flushing, which
    // belong to the parent.
    unsafe { libc::_exit(failure.exit_code()) }
}

fn write_stderr(bytes: &[u8]) {
    // SAFETY: plain write(2) of a borrowed buffer.
    unsafe {
        libc::write(libc::STDERR_FILENO, bytes.as_ptr().cast(), bytes.len());
    }
}
