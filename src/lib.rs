//! Filter Docstring Lint
//!
//! A lint rule that checks the docstrings of publishable filter classes for
//! the required Purpose, Filter Type and Trigger sections, plus a companion
//! rule that translation functions are called with literal strings.
//!
//! This library provides:
//! - The pure docstring validator
//! - Checker adapters for host linters
//! - A reference host that scans Python source trees
//! - Configuration management

pub mod checker;
pub mod config;
pub mod index;
pub mod lint;
pub mod parser;
pub mod validation;

// Re-exports for clean public API
pub use checker::{register_checkers, FiltersDocstringChecker, TranslationStringChecker};
pub use config::Config;
pub use lint::{Diagnostic, LintReport, PythonLinter, Severity};
pub use validation::{validate, validate_docstring, ViolationKind};
