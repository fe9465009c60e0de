use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context, Result};
use filter_docstring_lint::validation::validate;

// Usage: check-docstring [FILE]   (reads stdin without FILE)
fn main() -> Result<ExitCode> {
    env_logger::init();

    let docstring = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read docstring file: {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read docstring from stdin")?;
            buf
        }
    };

    let violations = validate(&docstring);
    if violations.is_empty() {
        println!("ok");
        return Ok(ExitCode::SUCCESS);
    }

    for kind in &violations {
        println!("{} ({} section)", kind, kind.section());
    }
    Ok(ExitCode::from(2))
}
