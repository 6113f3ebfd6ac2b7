// tests/reaper_sigchld.rs
//
// Installs the process-wide SIGCHLD handler, which reaps every child of the
// test process. Runs without the libtest harness so the handler can only
// fire on this (the only) thread, the way it does in the shell.

mod common;
use crate::common::builders::TestSession;
use crate::common::init_tracing;

use std::error::Error;
use std::time::{Duration, Instant};

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;

use tinysh::exec::RealProcessControl;
use tinysh::parse::parse_line;
use tinysh::reaper;
use tinysh::session::LineOutcome;
use tinysh::terminal::TerminalState;

type TestResult = Result<(), Box<dyn Error>>;

fn main() {
    if let Err(e) = reaper_reports_background_completion_and_leaves_foreground_waits_alone() {
        panic!("reaper test failed: {e}");
    }
    if let Err(e) = background_pipeline_members_join_group_when_leader_dies_at_once() {
        panic!("process group test failed: {e}");
    }
    println!("reaper_sigchld: ok");
}

fn reaper_reports_background_completion_and_leaves_foreground_waits_alone() -> TestResult {
    init_tracing();
    let ring = reaper::install(64)?;
    assert!(reaper::installed().is_some());
    assert_eq!(ring.capacity(), 64);

    let control = RealProcessControl::new(TerminalState::detached()).with_reaper(ring);
    let mut t = TestSession::new(control);

    assert_eq!(
        t.session.execute(&parse_line("sleep 0 &")),
        LineOutcome::Continue(0)
    );
    let pgid = t
        .session
        .jobs()
        .iter()
        .next()
        .map(|j| j.pgid())
        .ok_or("job not registered")?;
    assert_eq!(t.out.lines(), vec![format!("[1] {pgid}")]);
    t.out.clear();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !t.session.jobs().is_empty() {
        assert!(Instant::now() < deadline, "background job never reported");
        std::thread::sleep(Duration::from_millis(20));
        t.session.report_status_changes();
    }
    assert_eq!(t.out.lines(), vec!["[1]+ Done        sleep 0"]);
    t.out.clear();

    // Foreground statuses must reach the synchronous wait, not the ring.
    assert_eq!(
        t.session.execute(&parse_line("false")),
        LineOutcome::Continue(1)
    );
    assert_eq!(
        t.session.execute(&parse_line("echo hi | cat > /dev/null")),
        LineOutcome::Continue(0)
    );
    assert_eq!(t.out.lines(), vec!["[Process exited with code: 1]"]);

    t.session.report_status_changes();
    assert!(t.session.jobs().is_empty());
    Ok(())
}

/// Process group of `pid` as reported by `/proc/<pid>/stat`.
fn proc_pgid(pid: Pid) -> Result<i32, Box<dyn Error>> {
    let stat = std::fs::read_to_string(format!("/proc/{pid}/stat"))?;
    let after_comm = stat.rfind(')').ok_or("malformed stat")?;
    let pgrp = stat[after_comm + 1..]
        .split_whitespace()
        .nth(2)
        .ok_or("stat has no pgrp field")?;
    Ok(pgrp.parse()?)
}

fn background_pipeline_members_join_group_when_leader_dies_at_once() -> TestResult {
    init_tracing();
    let ring = reaper::installed().ok_or("reaper not installed")?;
    let control = RealProcessControl::new(TerminalState::detached()).with_reaper(ring);
    let mut t = TestSession::new(control);

    let mut strays = Vec::new();
    for round in 0..100 {
        assert_eq!(
            t.session
                .execute(&parse_line("tinysh-no-such-program-xyz | sleep 5 &")),
            LineOutcome::Continue(0)
        );
        let job = t.session.jobs().iter().last().ok_or("job not registered")?;
        let pgid = job.pgid();

        for pid in job.member_pids().skip(1) {
            match proc_pgid(pid) {
                Ok(group) if group == pgid.as_raw() => {}
                other => strays.push((round, pid, other.map_err(|e| e.to_string()))),
            }
        }
        killpg(pgid, Signal::SIGKILL)?;
        t.session.report_status_changes();
    }
    assert!(strays.is_empty(), "members outside their job's group: {strays:?}");

    let deadline = Instant::now() + Duration::from_secs(10);
    while !t.session.jobs().is_empty() {
        assert!(Instant::now() < deadline, "killed pipelines never reported");
        std::thread::sleep(Duration::from_millis(20));
        t.session.report_status_changes();
    }
    Ok(())
}
