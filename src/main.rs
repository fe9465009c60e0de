use std::process::ExitCode;

use anyhow::Result;

use filter_docstring_lint::config::{Config, OutputFormat};
use filter_docstring_lint::lint::{LintReport, PythonLinter};

fn init_logging(config: &Config) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&config.log_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn list_messages(linter: &PythonLinter) {
    for (checker, message) in linter.messages() {
        println!(
            ":{} ({}): [{}]\n  {}",
            message.symbol,
            message.msgid(),
            checker,
            message.description
        );
    }
}

fn print_report(report: &LintReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for diagnostic in &report.diagnostics {
                println!("{}", diagnostic);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report.diagnostics)?);
        }
    }

    eprintln!(
        "Checked {} file(s), skipped {}, found {} problem(s)",
        report.files_scanned,
        report.files_skipped,
        report.diagnostics.len()
    );
    Ok(())
}

fn main() -> Result<ExitCode> {
    // Parse configuration from command line and project files
    let config = Config::from_args_and_env()?;
    init_logging(&config);

    if let Some(path) = &config.config_path {
        log::info!("Using config file {}", path.display());
    }

    let linter =
        PythonLinter::with_default_checkers(config.disabled.clone(), config.exclude.clone());

    if config.list_msgs {
        list_messages(&linter);
        return Ok(ExitCode::SUCCESS);
    }

    let report = linter.lint_paths(&config.paths)?;
    print_report(&report, config.format)?;

    Ok(ExitCode::from(report.exit_code()))
}
