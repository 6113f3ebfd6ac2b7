// src/exec/pipes.rs

//! Inter-stage pipes for an N-stage pipeline.

use std::os::fd::{AsRawFd, OwnedFd, RawFd};

use nix::fcntl::OFlag;
use nix::unistd::{close, dup2, pipe2};

/// The N-1 pipes connecting N stages, all created before the first fork.
///
/// Created close-on-exec, so only the descriptors a stage dup2s onto its
/// stdin/stdout survive into the exec'd program.
///
/// Pipe `i` carries stage `i`'s stdout to stage `i + 1`'s stdin. The parent
/// closes everything by dropping the set once every stage is forked.
#[derive(Debug)]
pub struct PipeSet {
    /// `(read end, write end)` per pipe.
    pipes: Vec<(OwnedFd, OwnedFd)>,
}

impl PipeSet {
    pub fn for_stages(stages: usize) -> nix::Result<Self> {
        let count = stages.saturating_sub(1);
        let mut pipes = Vec::with_capacity(count);
        for _ in 0..count {
            pipes.push(pipe2(OFlag::O_CLOEXEC)?);
        }
        Ok(Self { pipes })
    }

    /// Number of pipes.
    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Descriptor stage `stage` reads from, unless it is the first.
    pub fn stdin_for(&self, stage: usize) -> Option<RawFd> {
        let index = stage.checked_sub(1)?;
        self.pipes.get(index).map(|(read, _)| read.as_raw_fd())
    }

    /// Descriptor stage `stage` writes to, unless it is the last.
    pub fn stdout_for(&self, stage: usize) -> Option<RawFd> {
        self.pipes.get(stage).map(|(_, write)| write.as_raw_fd())
    }

    /// Child side: connect this stage's stdin/stdout, then close every pipe
    /// descriptor so writers see end-of-input once their peers exit.
    pub(crate) fn wire_child(&self, stage: usize) {
        if let Some(fd) = self.stdin_for(stage) {
            let _ = dup2(fd, libc::STDIN_FILENO);
        }
        if let Some(fd) = self.stdout_for(stage) {
            let _ = dup2(fd, libc::STDOUT_FILENO);
        }
        for (read, write) in &self.pipes {
            let _ = close(read.as_raw_fd());
            let _ = close(write.as_raw_fd());
        }
    }
}
