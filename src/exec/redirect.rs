// src/exec/redirect.rs

//! File redirections, prepared in the parent and applied in the child.

use std::ffi::{CStr, CString};
use std::os::fd::RawFd;

use anyhow::anyhow;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2};

use crate::errors::{ChildFailure, RedirectTarget, Result, ShellError};
use crate::parse::{OutputTarget, Redirections};

#[derive(Debug, Clone, PartialEq, Eq)]
struct PreparedOutput {
    path: CString,
    append: bool,
}

/// A command's redirections with paths already converted to C strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedRedirects {
    input: Option<CString>,
    output: Option<PreparedOutput>,
    error: Option<PreparedOutput>,
}

impl PreparedRedirects {
    pub fn prepare(redirects: &Redirections) -> Result<Self> {
        Ok(Self {
            input: redirects.input.as_deref().map(c_path).transpose()?,
            output: redirects.output.as_ref().map(prepare_output).transpose()?,
            error: redirects.error.as_ref().map(prepare_output).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none() && self.error.is_none()
    }

    /// Rewire stdin/stdout/stderr. Child side, after pipe wiring, so a
    /// file redirection overrides a pipe end.
    pub fn apply(&self) -> std::result::Result<(), ChildFailure> {
        if let Some(path) = &self.input {
            redirect(path, OFlag::O_RDONLY, libc::STDIN_FILENO)
                .map_err(|_| ChildFailure::RedirectionFailure(RedirectTarget::Input))?;
        }

        if let Some(output) = &self.output {
            redirect(&output.path, output_flags(output.append), libc::STDOUT_FILENO)
                .map_err(|_| ChildFailure::RedirectionFailure(RedirectTarget::Output))?;
        }

        if let Some(error) = &self.error {
            redirect(&error.path, output_flags(error.append), libc::STDERR_FILENO)
                .map_err(|_| ChildFailure::RedirectionFailure(RedirectTarget::Error))?;
        }

        Ok(())
    }
}

fn c_path(path: &str) -> Result<CString> {
    CString::new(path)
        .map_err(|_| ShellError::Other(anyhow!("redirection path contains a NUL byte: {:?}", path)))
}

fn prepare_output(target: &OutputTarget) -> Result<PreparedOutput> {
    Ok(PreparedOutput {
        path: c_path(&target.path)?,
        append: target.append,
    })
}

fn output_flags(append: bool) -> OFlag {
    let mode = if append { OFlag::O_APPEND } else { OFlag::O_TRUNC };
    OFlag::O_WRONLY | OFlag::O_CREAT | mode
}

fn redirect(path: &CStr, flags: OFlag, target: RawFd) -> nix::Result<()> {
    let mode = Mode::from_bits_truncate(0o644);
    let fd = open(path, flags, mode)?;
    if fd != target {
        dup2(fd, target)?;
        close(fd)?;
    }
    Ok(())
}
