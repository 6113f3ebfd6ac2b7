// tests/common/mod.rs

#![allow(dead_code)]

pub use tinysh_test_utils::builders;
pub use tinysh_test_utils::init_tracing;

use std::path::Path;

/// Write `contents` to `dir/name` and return its path as a string.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}
