// src/repl.rs

//! The interactive read-eval loop.

use std::io::{BufRead, ErrorKind};

use tracing::{debug, trace};

use crate::exec::ProcessControl;
use crate::parse::parse_line;
use crate::session::{LineOutcome, Session};

const BANNER: &str = "\
+----------------------------------------------+
|  Welcome to TinySh                           |
|  Job control: jobs, fg [%N], bg [%N]         |
|  Type 'exit' or press Ctrl+D to quit         |
+----------------------------------------------+";

/// Prompt and banner behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplOptions {
    /// Prompt template; `{cwd}` expands to the working directory.
    pub prompt: String,
    pub banner: bool,
}

/// Expand `{cwd}` in a prompt template.
pub fn render_prompt(template: &str) -> String {
    if !template.contains("{cwd}") {
        return template.to_owned();
    }
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "?".to_owned());
    template.replace("{cwd}", &cwd)
}

/// Read lines from `input` until EOF or `exit`, reporting finished jobs
/// before every prompt. Returns the shell's exit status.
pub fn run_loop<P, R>(session: &mut Session<P>, options: &ReplOptions, mut input: R) -> i32
where
    P: ProcessControl,
    R: BufRead,
{
    if options.banner {
        session.console_mut().line(BANNER);
    }

    let mut raw = Vec::new();
    loop {
        session.report_status_changes();
        let prompt = render_prompt(&options.prompt);
        session.console_mut().prompt(&prompt);

        raw.clear();
        match input.read_until(b'\n', &mut raw) {
            Ok(0) => {
                session.console_mut().line("\nExiting TinySh...");
                return session.last_status();
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(error = %e, "failed to read input; leaving");
                return session.last_status();
            }
        }

        // Arguments are passed on as text; invalid bytes become U+FFFD.
        let line = String::from_utf8_lossy(&raw);
        trace!(line = line.trim_end(), "read line");
        if let LineOutcome::Exit(code) = run_line(session, &line) {
            session.console_mut().line("Exiting TinySh...");
            return code;
        }
    }
}

/// Parse and execute one line.
pub fn run_line<P: ProcessControl>(session: &mut Session<P>, line: &str) -> LineOutcome {
    let pipeline = parse_line(line);
    session.execute(&pipeline)
}
