// src/errors.rs

//! Crate-wide error types.
//!
//! [`ShellError`] covers failures the shell itself reports and survives.
//! [`ChildFailure`] covers failures that only ever happen inside a forked
//! child, where the only channel back to the shell is the exit status.

use nix::errno::Errno;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("fork failed: {0}")]
    ForkFailure(Errno),

    #[error("pipe failed: {0}")]
    PipeCreationFailure(Errno),

    #[error("{builtin}: {jobspec}: no such job")]
    JobLookupFailure { builtin: &'static str, jobspec: String },

    #[error("{builtin}: job {job_id} already in background")]
    InvalidJobState { builtin: &'static str, job_id: u32 },

    #[error("system call failed: {0}")]
    Sys(#[from] Errno),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ShellError>;

/// Which standard stream a failed redirection was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Input,
    Output,
    Error,
}

/// Failure inside a forked child before or at `exec`.
///
/// Messages are static byte strings because the child must not allocate
/// between `fork` and `exec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildFailure {
    CommandNotFound,
    RedirectionFailure(RedirectTarget),
    GroupJoinFailure,
    ExecFailure,
}

impl ChildFailure {
    pub const fn exit_code(self) -> i32 {
        match self {
            ChildFailure::CommandNotFound => 127,
            ChildFailure::RedirectionFailure(_)
            | ChildFailure::GroupJoinFailure
            | ChildFailure::ExecFailure => 1,
        }
    }

    pub const fn message(self) -> &'static [u8] {
        match self {
            ChildFailure::CommandNotFound => b"tinysh: command not found: ",
            ChildFailure::RedirectionFailure(RedirectTarget::Input) => {
                b"tinysh: cannot open input file\n"
            }
            ChildFailure::RedirectionFailure(RedirectTarget::Output) => {
                b"tinysh: cannot open output file\n"
            }
            ChildFailure::RedirectionFailure(RedirectTarget::Error) => {
                b"tinysh: cannot open error file\n"
            }
            ChildFailure::GroupJoinFailure => b"tinysh: cannot join the job's process group\n",
            ChildFailure::ExecFailure => b"tinysh: execve failed: ",
        }
    }

    /// Whether the message is followed by the program name and a newline.
    pub const fn names_program(self) -> bool {
        matches!(self, ChildFailure::CommandNotFound | ChildFailure::ExecFailure)
    }
}
