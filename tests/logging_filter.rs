// tests/logging_filter.rs

use tracing::level_filters::LevelFilter;

use tinysh::cli::LogLevel;
use tinysh::logging::build_filter;

#[test]
fn flag_wins_over_environment() {
    let filter = build_filter(Some(LogLevel::Debug), Some("error"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
}

#[test]
fn environment_may_raise_single_modules() {
    let filter = build_filter(None, Some("warn,tinysh::exec=trace"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
}

#[test]
fn unusable_environment_falls_back_to_warn() {
    for env in [None, Some(""), Some("   "), Some("tinysh=loud")] {
        let filter = build_filter(None, env);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN), "{env:?}");
    }
}
