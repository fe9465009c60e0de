//! Configuration management for the filter docstring linter.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project and user TOML config files
//! - Merging with CLI taking precedence

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".filter-docstring-lint.toml";

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Command-line arguments for the filter docstring linter
#[derive(Debug, Default, Parser)]
#[command(name = "filter-docstring-lint")]
#[command(about = "Checks filter class docstrings and translation calls")]
#[command(version)]
pub struct Args {
    /// Files or directories to lint
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Messages to disable, by symbol or msgid
    #[arg(long, value_delimiter = ',', help = "Disable messages (symbol or msgid, comma separated)")]
    pub disable: Vec<String>,

    /// Directory or file names to skip while walking directories
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Explicit config file
    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    /// Print the available messages and exit
    #[arg(long)]
    pub list_msgs: bool,
}

/// Settings read from a TOML config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub disable: Vec<String>,
    pub exclude: Vec<String>,
    pub format: Option<OutputFormat>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML: {}", path.display()))
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub paths: Vec<PathBuf>,
    pub format: OutputFormat,
    pub disabled: Vec<String>,
    pub exclude: Vec<String>,
    pub log_level: String,
    pub list_msgs: bool,
    /// Config file that was applied, if any
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        let project_dir = std::env::current_dir()?;
        Self::from_args(Args::parse(), &project_dir)
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args, project_dir: &Path) -> Result<Self> {
        let config_path = match args.config {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file not found: {}", path.display());
                }
                Some(path)
            }
            None => Self::find_config_file(project_dir),
        };

        let file = match &config_path {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };

        let mut disabled = file.disable;
        disabled.extend(args.disable);
        let mut exclude = file.exclude;
        exclude.extend(args.exclude);

        let paths = if args.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            args.paths
        };

        Ok(Config {
            paths,
            format: args.format.or(file.format).unwrap_or_default(),
            disabled,
            exclude,
            log_level: args.log_level,
            list_msgs: args.list_msgs,
            config_path,
        })
    }

    /// Project config in `project_dir`, else the user-level config
    fn find_config_file(project_dir: &Path) -> Option<PathBuf> {
        let project = project_dir.join(PROJECT_CONFIG_FILE);
        if project.is_file() {
            return Some(project);
        }

        dirs::config_dir()
            .map(|dir| dir.join("filter-docstring-lint").join("config.toml"))
            .filter(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_args() {
        let args = Args::try_parse_from([
            "filter-docstring-lint",
            "--format",
            "json",
            "--disable",
            "E7691,filter-docstring-missing-type",
            "--exclude",
            "migrations",
            "src",
        ])
        .expect("parse args");

        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.disable, vec!["E7691", "filter-docstring-missing-type"]);
        assert_eq!(args.exclude, vec!["migrations"]);
        assert_eq!(args.paths, vec![PathBuf::from("src")]);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_file_config_rejects_unknown_keys() {
        assert!(toml::from_str::<FileConfig>("enable = [\"x\"]").is_err());
    }

    #[test]
    fn test_file_config_parses() {
        let config: FileConfig =
            toml::from_str("disable = [\"E7693\"]\nformat = \"json\"\n").expect("parse");
        assert_eq!(config.disable, vec!["E7693"]);
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert!(config.exclude.is_empty());
    }
}
