// src/console.rs

//! The shell's user-facing output streams.

use std::io::{self, Write};

use crate::types::ColorMode;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Prefix on every shell-level error line.
pub const ERROR_PREFIX: &str = "tinysh: ";

/// stdout/stderr pair every banner, listing and error goes through.
///
/// Write failures are ignored: a shell whose terminal went away has
/// nowhere left to report them.
pub struct Console {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    color: bool,
}

impl Console {
    pub fn stdio(mode: ColorMode) -> Self {
        Self::with_writers(
            Box::new(io::stdout()),
            Box::new(io::stderr()),
            mode.enabled(),
        )
    }

    pub fn with_writers(out: Box<dyn Write>, err: Box<dyn Write>, color: bool) -> Self {
        Self { out, err, color }
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// A plain line on stdout. Job banners always go through here.
    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }

    /// `tinysh: <message>` on stderr.
    pub fn error(&mut self, message: &str) {
        if self.color {
            let _ = writeln!(self.err, "{RED}{ERROR_PREFIX}{message}{RESET}");
        } else {
            let _ = writeln!(self.err, "{ERROR_PREFIX}{message}");
        }
        let _ = self.err.flush();
    }

    /// Informational line on stdout, e.g. a foreground job's exit report.
    pub fn info(&mut self, text: &str) {
        if self.color {
            let _ = writeln!(self.out, "{CYAN}{text}{RESET}");
        } else {
            let _ = writeln!(self.out, "{text}");
        }
        let _ = self.out.flush();
    }

    /// The prompt, without a trailing newline.
    pub fn prompt(&mut self, text: &str) {
        if self.color {
            let _ = write!(self.out, "{GREEN}{text}{RESET}");
        } else {
            let _ = write!(self.out, "{text}");
        }
        let _ = self.out.flush();
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").field("color", &self.color).finish()
    }
}
