// tests/lookup.rs

mod common;
use crate::common::write_file;

use std::error::Error;
use std::ffi::OsString;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tinysh::lookup::find_in;

type TestResult = Result<(), Box<dyn Error>>;

fn make_executable(path: &str) -> std::io::Result<()> {
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

fn search_path(dirs: &[&Path]) -> OsString {
    std::env::join_paths(dirs).unwrap()
}

#[test]
fn finds_first_executable_match_in_order() -> TestResult {
    let first = tempfile::tempdir()?;
    let second = tempfile::tempdir()?;
    let a = write_file(first.path(), "tool", "#!/bin/sh\n");
    let b = write_file(second.path(), "tool", "#!/bin/sh\n");
    make_executable(&a)?;
    make_executable(&b)?;

    let path = search_path(&[first.path(), second.path()]);
    assert_eq!(find_in("tool", Some(&path)), Some(PathBuf::from(a)));
    Ok(())
}

#[test]
fn skips_non_executable_candidates() -> TestResult {
    let first = tempfile::tempdir()?;
    let second = tempfile::tempdir()?;
    write_file(first.path(), "tool", "not runnable");
    let b = write_file(second.path(), "tool", "#!/bin/sh\n");
    make_executable(&b)?;

    let path = search_path(&[first.path(), second.path()]);
    assert_eq!(find_in("tool", Some(&path)), Some(PathBuf::from(b)));
    Ok(())
}

#[test]
fn directories_are_not_executables() -> TestResult {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir(dir.path().join("tool"))?;

    let path = search_path(&[dir.path()]);
    assert_eq!(find_in("tool", Some(&path)), None);
    Ok(())
}

#[test]
fn empty_path_entries_are_ignored() -> TestResult {
    let dir = tempfile::tempdir()?;
    let tool = write_file(dir.path(), "tool", "#!/bin/sh\n");
    make_executable(&tool)?;

    let mut path = OsString::from("::");
    path.push(dir.path());
    path.push(":");
    assert_eq!(find_in("tool", Some(&path)), Some(PathBuf::from(tool)));
    Ok(())
}

#[test]
fn names_with_slash_are_checked_directly() -> TestResult {
    let dir = tempfile::tempdir()?;
    let tool = write_file(dir.path(), "tool", "#!/bin/sh\n");
    make_executable(&tool)?;

    // Never searched, even with an empty PATH.
    assert_eq!(find_in(&tool, None), Some(PathBuf::from(&tool)));

    let missing = dir.path().join("missing");
    assert_eq!(find_in(&missing.to_string_lossy(), None), None);
    Ok(())
}

#[test]
fn missing_command_or_path_resolves_to_nothing() {
    assert_eq!(find_in("", Some(&OsString::from("/bin"))), None);
    assert_eq!(find_in("ls", None), None);
    assert_eq!(
        find_in("tinysh-no-such-program-xyz", Some(&OsString::from("/bin:/usr/bin"))),
        None
    );
}
