// src/lib.rs

pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod exec;
pub mod jobs;
pub mod logging;
pub mod lookup;
pub mod parse;
pub mod reaper;
pub mod repl;
pub mod session;
pub mod terminal;
pub mod types;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_for_cli, ConfigFile};
use crate::console::Console;
use crate::exec::RealProcessControl;
use crate::repl::{run_line, run_loop, ReplOptions};
use crate::session::{LineOutcome, Session, SessionSettings};
use crate::terminal::TerminalState;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - terminal takeover (interactive mode only)
/// - the SIGCHLD reaper
/// - the session and its read loop, or a single `-c` line
///
/// Returns the status the process should exit with.
pub fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_for_cli(args.config.as_deref()).context("loading configuration")?;
    debug!(?cfg, "configuration loaded");

    let terminal = if args.command.is_some() {
        TerminalState::detached()
    } else {
        TerminalState::init().context("taking control of the terminal")?
    };
    info!(
        interactive = terminal.is_interactive(),
        shell_pgid = terminal.shell_pgid().as_raw(),
        "terminal ready"
    );

    let ring = reaper::install(cfg.jobs().event_capacity).context("installing SIGCHLD handler")?;
    let control = RealProcessControl::new(terminal).with_reaper(ring);
    let console = Console::stdio(cfg.shell().color);
    let mut session = Session::new(control, console, SessionSettings::from(&cfg));

    if let Some(line) = args.command.as_deref() {
        let status = match run_line(&mut session, line) {
            LineOutcome::Continue(status) | LineOutcome::Exit(status) => status,
        };
        session.report_status_changes();
        return Ok(status);
    }

    let options = repl_options(&cfg, args.no_banner);
    let stdin = std::io::stdin();
    Ok(run_loop(&mut session, &options, stdin.lock()))
}

fn repl_options(cfg: &ConfigFile, no_banner: bool) -> ReplOptions {
    ReplOptions {
        prompt: cfg.shell().prompt.clone(),
        banner: cfg.shell().banner && !no_banner,
    }
}
