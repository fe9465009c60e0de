//! Tests for config file discovery and CLI precedence
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use filter_docstring_lint::config::{Args, Config, OutputFormat, PROJECT_CONFIG_FILE};

fn args(extra: &[&str]) -> Args {
    let mut argv = vec!["filter-docstring-lint"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).expect("parse args")
}

#[test]
fn test_project_config_is_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(PROJECT_CONFIG_FILE);
    fs::write(
        &path,
        "disable = [\"E7693\"]\nexclude = [\"migrations\"]\nformat = \"json\"\n",
    )
    .expect("write config");

    let config = Config::from_args(args(&[]), dir.path()).expect("create config");

    assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    assert_eq!(config.disabled, vec!["E7693"]);
    assert_eq!(config.exclude, vec!["migrations"]);
    assert_eq!(config.format, OutputFormat::Json);
    assert_eq!(config.paths, vec![PathBuf::from(".")]);
}

#[test]
fn test_cli_overrides_and_extends_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(PROJECT_CONFIG_FILE),
        "disable = [\"E7693\"]\nformat = \"json\"\n",
    )
    .expect("write config");

    let config = Config::from_args(
        args(&["--format", "text", "--disable", "E7691", "pkg"]),
        dir.path(),
    )
    .expect("create config");

    assert_eq!(config.format, OutputFormat::Text);
    assert_eq!(config.disabled, vec!["E7693", "E7691"]);
    assert_eq!(config.paths, vec![PathBuf::from("pkg")]);
}

#[test]
fn test_explicit_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("lint.toml");
    fs::write(&path, "disable = [\"filter-docstring-missing-purpose\"]\n").expect("write config");

    let config = Config::from_args(
        args(&["--config", path.to_str().expect("utf-8 path")]),
        dir.path(),
    )
    .expect("create config");

    assert_eq!(config.disabled, vec!["filter-docstring-missing-purpose"]);
    assert_eq!(config.format, OutputFormat::Text);
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");
    let result = Config::from_args(
        args(&["--config", missing.to_str().expect("utf-8 path")]),
        dir.path(),
    );
    assert!(result.is_err());
}

#[test]
fn test_invalid_toml_names_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(PROJECT_CONFIG_FILE), "disable = [unterminated").expect("write");

    let err = Config::from_args(args(&[]), dir.path()).expect_err("invalid toml");
    assert!(format!("{:#}", err).contains(PROJECT_CONFIG_FILE));
}
