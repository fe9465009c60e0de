//! Checker Plugin Layer
//!
//! Thin adapters between a host linter and the rules: the filter docstring
//! checker over the docstring validator, and the translation call checker.

pub mod filters;
pub mod host;
pub mod i18n;
pub mod messages;

pub use filters::{FiltersDocstringChecker, PUBLIC_FILTER_NAME, PUBLIC_FILTER_QUALNAME};
pub use host::{ArgKind, CallNode, Checker, ClassNode, Linter, MessageSink, Node};
pub use i18n::{TranslationStringChecker, TRANSLATION_FUNCTIONS};
pub use messages::{Category, MessageDef, BASE_ID};

/// Register every checker this crate provides
pub fn register_checkers(linter: &mut impl Linter) {
    linter.register_checker(Box::new(FiltersDocstringChecker::new()));
    linter.register_checker(Box::new(TranslationStringChecker::new()));
}
