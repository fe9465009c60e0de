//! Filter Docstring Checker
//!
//! Checks that every publishable filter documents its purpose, its filter
//! type and what triggers it.

use super::host::{Checker, ClassNode, MessageSink};
use super::messages::{message_for, MessageDef, FILTER_DOCSTRING_MESSAGES};
use crate::validation::validate_docstring;

/// Fully-qualified name of the publishable filter base class
pub const PUBLIC_FILTER_QUALNAME: &str = "openedx_filters.tooling.OpenEdxPublicFilter";

/// Declared name of the publishable filter base class
pub const PUBLIC_FILTER_NAME: &str = "OpenEdxPublicFilter";

#[derive(Debug, Default)]
pub struct FiltersDocstringChecker;

impl FiltersDocstringChecker {
    pub fn new() -> Self {
        Self
    }

    /// Whether a class is subject to docstring validation
    pub fn applies_to(node: &dyn ClassNode) -> bool {
        node.is_subtype_of(PUBLIC_FILTER_QUALNAME) && node.name() != PUBLIC_FILTER_NAME
    }
}

impl Checker for FiltersDocstringChecker {
    fn name(&self) -> &'static str {
        "docstring-format-checker"
    }

    fn messages(&self) -> &'static [MessageDef] {
        &FILTER_DOCSTRING_MESSAGES
    }

    fn visit_classdef(&self, node: &dyn ClassNode, sink: &mut dyn MessageSink) {
        if !self.is_required(&*sink) || !Self::applies_to(node) {
            return;
        }

        let violations = validate_docstring(node.docstring());
        log::debug!(
            "Filter {} at line {}: {} docstring violation(s)",
            node.name(),
            node.lineno(),
            violations.len()
        );

        for kind in violations {
            sink.add_message(message_for(kind), node, &[node.name()]);
        }
    }
}
