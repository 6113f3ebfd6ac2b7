// tests/job_table.rs

use nix::unistd::Pid;
use proptest::prelude::*;

use tinysh::jobs::{added_line, JobId, JobState, JobTable};

fn pid(raw: i32) -> Pid {
    Pid::from_raw(raw)
}

fn table_with(commands: &[&str]) -> JobTable {
    let mut table = JobTable::new();
    for (i, command) in commands.iter().enumerate() {
        let leader = pid(100 + i as i32);
        table.add(leader, *command, JobState::Running, &[leader]);
    }
    table
}

fn current_ids(table: &JobTable) -> Vec<u32> {
    table
        .iter()
        .filter(|j| j.is_current())
        .map(|j| j.id().0)
        .collect()
}

#[test]
fn add_assigns_increasing_ids_and_makes_new_job_current() {
    let mut table = JobTable::new();
    let a = table.add(pid(10), "sleep 1", JobState::Running, &[pid(10)]);
    let b = table.add(pid(20), "sleep 2", JobState::Running, &[pid(20)]);

    assert_eq!((a, b), (JobId(1), JobId(2)));
    assert_eq!(current_ids(&table), vec![2]);
    assert_eq!(added_line(b, pid(20)), "[2] 20");
}

#[test]
fn ids_are_not_reused_after_removal() {
    let mut table = table_with(&["a", "b"]);
    table.remove(JobId(2));
    let c = table.add(pid(300), "c", JobState::Running, &[pid(300)]);
    assert_eq!(c, JobId(3));
}

#[test]
fn remove_promotes_the_last_remaining_entry() {
    let mut table = table_with(&["a", "b", "c"]);
    table.mark_current(JobId(1));

    table.remove(JobId(1));
    assert_eq!(current_ids(&table), vec![3]);

    table.remove(JobId(3));
    assert_eq!(current_ids(&table), vec![2]);

    assert!(table.remove(JobId(2)).is_some());
    assert!(table.is_empty());
    assert!(table.remove(JobId(2)).is_none());
}

#[test]
fn mark_current_is_idempotent_and_exclusive() {
    let mut table = table_with(&["a", "b", "c"]);
    table.mark_current(JobId(2));
    table.mark_current(JobId(2));
    assert_eq!(current_ids(&table), vec![2]);
    assert_eq!(table.most_recent().map(|j| j.id()), Some(JobId(2)));
}

#[test]
fn lookups_by_id_pgid_and_member_pid() {
    let mut table = JobTable::new();
    let id = table.add(
        pid(500),
        "cat | wc",
        JobState::Running,
        &[pid(500), pid(501)],
    );

    assert_eq!(table.get(id).map(|j| j.pgid()), Some(pid(500)));
    assert!(table.by_pgid_mut(pid(500)).is_some());
    assert!(table.by_pgid_mut(pid(501)).is_none());
    assert_eq!(table.by_pid_mut(pid(501)).map(|j| j.id()), Some(id));
    assert!(table.by_pid_mut(pid(999)).is_none());
    assert!(table.get(JobId(42)).is_none());
}

#[test]
fn set_state_is_plain_assignment() {
    let mut table = table_with(&["a"]);
    assert!(table.set_state(JobId(1), JobState::Stopped));
    assert_eq!(table.get(JobId(1)).map(|j| j.state()), Some(JobState::Stopped));
    assert!(!table.set_state(JobId(9), JobState::Done));
}

#[test]
fn listing_format_pads_state_and_marks_running_with_ampersand() {
    let mut table = table_with(&["sleep 5", "vim notes"]);
    table.set_state(JobId(2), JobState::Stopped);

    let lines: Vec<String> = table.list().collect();
    assert_eq!(
        lines,
        vec!["[1]- Running      sleep 5 &", "[2]+ Stopped      vim notes"]
    );

    // Restartable.
    assert_eq!(table.list().count(), 2);
}

#[test]
fn list_skips_done_jobs_and_take_finished_reports_them_once() {
    let mut table = table_with(&["a", "b"]);
    table.set_state(JobId(1), JobState::Done);
    assert!(table.iter().all(|j| !j.is_notified()));

    let lines: Vec<String> = table.list().collect();
    assert_eq!(lines, vec!["[2]+ Running      b &"]);

    assert_eq!(table.take_finished(), vec!["[1]  Done        a"]);
    assert!(table.take_finished().is_empty());
    assert_eq!(table.len(), 1);
}

#[test]
fn member_tracking_finishes_job_only_when_all_members_finish() {
    let mut table = JobTable::new();
    let id = table.add(pid(7), "a | b", JobState::Running, &[pid(7), pid(8)]);
    let job = table.get_mut(id).unwrap();
    assert_eq!(job.member_pids().collect::<Vec<_>>(), vec![pid(7), pid(8)]);

    assert!(!job.mark_finished(pid(7)));
    assert_eq!(job.unfinished_pids(), vec![pid(8)]);
    assert!(job.mark_finished(pid(8)));
    assert!(job.all_finished());
}

#[test]
fn banner_formats() {
    let mut table = table_with(&["sleep 5"]);
    let job = table.get(JobId(1)).unwrap();
    assert_eq!(job.done_line(), "[1]+ Done        sleep 5");
    assert_eq!(job.stopped_line(), "[1]+ Stopped         sleep 5");
    assert_eq!(job.resumed_line(), "[1]+ sleep 5 &");

    table.add(pid(200), "other", JobState::Running, &[pid(200)]);
    let job = table.get(JobId(1)).unwrap();
    assert_eq!(job.done_line(), "[1]  Done        sleep 5");
}

#[derive(Debug, Clone)]
enum Op {
    Add,
    Remove(usize),
    MarkCurrent(usize),
    Finish(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Add),
        2 => any::<usize>().prop_map(Op::Remove),
        1 => any::<usize>().prop_map(Op::MarkCurrent),
        1 => any::<usize>().prop_map(Op::Finish),
    ]
}

proptest! {
    #[test]
    fn table_invariants_hold_under_any_sequence(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut table = JobTable::new();
        let mut last_id = 0u32;
        let mut next_pid = 1000;

        for op in ops {
            let ids: Vec<JobId> = table.iter().map(|j| j.id()).collect();
            match op {
                Op::Add => {
                    let leader = Pid::from_raw(next_pid);
                    next_pid += 1;
                    let id = table.add(leader, "job", JobState::Running, &[leader]);
                    prop_assert!(id.0 > last_id, "ids must strictly increase");
                    last_id = id.0;
                }
                Op::Remove(i) if !ids.is_empty() => {
                    table.remove(ids[i % ids.len()]);
                }
                Op::MarkCurrent(i) if !ids.is_empty() => {
                    table.mark_current(ids[i % ids.len()]);
                }
                Op::Finish(i) if !ids.is_empty() => {
                    table.set_state(ids[i % ids.len()], JobState::Done);
                }
                _ => {}
            }

            if !table.is_empty() {
                let current = table.iter().filter(|j| j.is_current()).count();
                prop_assert_eq!(current, 1, "exactly one current job");
            }

            let listed = table.list().count();
            let not_done = table.iter().filter(|j| j.state() != JobState::Done).count();
            prop_assert_eq!(listed, not_done, "list never shows Done jobs");

            if table.iter().any(|j| j.state() == JobState::Done) && table.len() % 2 == 0 {
                table.take_finished();
                prop_assert!(table.iter().all(|j| j.state() != JobState::Done));
            }
        }
    }
}
