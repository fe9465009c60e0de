//! Validation Engine
//!
//! Pure docstring validation, independent of any host linter.

pub mod engine;

pub use engine::{validate, validate_docstring, ViolationKind};
