// src/exec/argv.rs

//! Owned, NUL-terminated argument vectors for `execv`.

use std::ffi::{CStr, CString};
use std::ptr;

use anyhow::anyhow;
use nix::errno::Errno;

use crate::errors::{Result, ShellError};

/// Argument vector built in the parent before `fork`.
///
/// Holds both the strings and the NULL-terminated pointer array `execv`
/// wants, so the child execs without allocating. The parent's copy is
/// dropped with the launch on every path.
#[derive(Debug)]
pub struct ArgvBuffer {
    args: Vec<CString>,
    /// Points into `args`; moving the `CString`s does not move their heap
    /// buffers.
    ptrs: Vec<*const libc::c_char>,
}

impl ArgvBuffer {
    pub fn from_args(args: &[String]) -> Result<Self> {
        if args.is_empty() {
            return Err(ShellError::Other(anyhow!("empty argument vector")));
        }

        let args = args
            .iter()
            .map(|arg| {
                CString::new(arg.as_bytes()).map_err(|_| {
                    ShellError::Other(anyhow!("argument contains a NUL byte: {:?}", arg))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let ptrs = args
            .iter()
            .map(|arg| arg.as_ptr())
            .chain(std::iter::once(ptr::null()))
            .collect();

        Ok(Self { args, ptrs })
    }

    /// `argv[0]`.
    pub fn program(&self) -> &CStr {
        &self.args[0]
    }

    pub fn args(&self) -> &[CString] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Replace the process image with `path`. Only returns on failure.
    pub fn exec(&self, path: &CStr) -> Errno {
        // SAFETY: `ptrs` is NULL-terminated and every entry points into a
        // live `CString` owned by `self`.
        unsafe {
            libc::execv(path.as_ptr(), self.ptrs.as_ptr());
        }
        Errno::last()
    }
}
