// src/lookup.rs

//! PATH-based executable lookup.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use nix::unistd::{access, AccessFlags};

/// Resolve `command` against the process's `PATH`.
pub fn find_in_path(command: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH");
    find_in(command, path_var.as_deref())
}

/// Resolve `command` against an explicit search path.
///
/// - A name containing `/` is checked for executability directly and never
///   searched.
/// - Otherwise each non-empty `:`-separated entry is tried in order.
pub fn find_in(command: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    if command.is_empty() {
        return None;
    }

    if command.contains('/') {
        let candidate = PathBuf::from(command);
        return is_executable(&candidate).then_some(candidate);
    }

    let search_path = search_path?;
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(command))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}
