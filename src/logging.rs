// src/logging.rs

//! Diagnostics for the shell itself, written to stderr.
//!
//! `--log-level` sets one level for every module. Without it, `TINYSH_LOG`
//! is read as a filter and may name modules, e.g.
//! `warn,tinysh::exec=trace,tinysh::session::notifier=debug`. An unset or
//! unparsable variable falls back to `warn`, which keeps an interactive
//! session quiet.
//!
//! Interactive sessions get short lines without module paths so they don't
//! drown the prompt. With `-c` the output is meant for scripts and keeps
//! targets but never colours.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "TINYSH_LOG";
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber. Call once, before the session starts.
pub fn init_logging(cli_level: Option<LogLevel>, one_shot: bool) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env.as_deref());

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_ids(false)
        .with_thread_names(false);

    if one_shot {
        builder.with_target(true).with_ansi(false).init();
    } else {
        builder.with_target(false).compact().init();
    }

    Ok(())
}

/// Filter for a flag level and the raw `TINYSH_LOG` value.
pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level_directive(level));
    }

    env.map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

