// tests/config_loading.rs

mod common;
use crate::common::write_file;

use std::error::Error;

use tinysh::config::{load_and_validate, load_for_cli, ConfigFile, RawConfigFile};
use tinysh::errors::ShellError;
use tinysh::session::SessionSettings;
use tinysh::types::ColorMode;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn defaults_are_valid() -> TestResult {
    let cfg = ConfigFile::try_from(RawConfigFile::default())?;
    assert_eq!(cfg.shell().prompt, "tinysh:{cwd}$ ");
    assert_eq!(cfg.shell().color, ColorMode::Auto);
    assert!(cfg.shell().banner);
    assert!(cfg.shell().report_exit_status);
    assert_eq!(cfg.jobs().event_capacity, 256);
    Ok(())
}

#[test]
fn full_file_is_loaded() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_file(
        dir.path(),
        "tinysh.toml",
        r#"
[shell]
prompt = "> "
color = "never"
banner = false
report_exit_status = false

[jobs]
event_capacity = 1024
"#,
    );

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.shell().prompt, "> ");
    assert_eq!(cfg.shell().color, ColorMode::Never);
    assert!(!cfg.shell().banner);
    assert_eq!(cfg.jobs().event_capacity, 1024);
    assert!(!SessionSettings::from(&cfg).report_exit_status);
    Ok(())
}

#[test]
fn partial_file_keeps_other_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "tinysh.toml", "[shell]\ncolor = \"always\"\n");

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.shell().color, ColorMode::Always);
    assert_eq!(cfg.shell().prompt, "tinysh:{cwd}$ ");
    assert_eq!(cfg.jobs().event_capacity, 256);
    Ok(())
}

#[test]
fn empty_prompt_is_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "tinysh.toml", "[shell]\nprompt = \"\"\n");

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, ShellError::ConfigError(ref m) if m.contains("prompt")));
    Ok(())
}

#[test]
fn event_capacity_must_be_a_power_of_two_within_bounds() -> TestResult {
    let dir = tempfile::tempdir()?;

    for bad in ["8", "100", "8192"] {
        let path = write_file(
            dir.path(),
            "tinysh.toml",
            &format!("[jobs]\nevent_capacity = {bad}\n"),
        );
        let err = load_and_validate(&path).unwrap_err();
        assert!(
            matches!(err, ShellError::ConfigError(ref m) if m.contains("event_capacity")),
            "capacity {bad} should be rejected, got {err}"
        );
    }

    for good in ["16", "4096"] {
        let path = write_file(
            dir.path(),
            "tinysh.toml",
            &format!("[jobs]\nevent_capacity = {good}\n"),
        );
        load_and_validate(&path)?;
    }
    Ok(())
}

#[test]
fn unknown_keys_and_bad_values_are_toml_errors() -> TestResult {
    let dir = tempfile::tempdir()?;

    let path = write_file(dir.path(), "tinysh.toml", "[shell]\nprompt = \"$ \"\nshout = true\n");
    assert!(matches!(
        load_and_validate(&path).unwrap_err(),
        ShellError::TomlError(_)
    ));

    let path = write_file(dir.path(), "tinysh.toml", "[shell]\ncolor = \"sometimes\"\n");
    assert!(matches!(
        load_and_validate(&path).unwrap_err(),
        ShellError::TomlError(_)
    ));
    Ok(())
}

#[test]
fn explicit_missing_path_is_an_io_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("nope.toml");

    let err = load_for_cli(Some(&missing.to_string_lossy())).unwrap_err();
    assert!(matches!(err, ShellError::IoError(_)));
    Ok(())
}

#[test]
fn color_mode_parses_from_strings() {
    assert_eq!("Always".parse::<ColorMode>(), Ok(ColorMode::Always));
    assert_eq!(" never ".parse::<ColorMode>(), Ok(ColorMode::Never));
    assert!("loud".parse::<ColorMode>().is_err());
    assert!(ColorMode::Always.enabled());
    assert!(!ColorMode::Never.enabled());
}
