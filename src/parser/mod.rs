//! Python Source Scanner
//!
//! Just enough of Python to find class statements, their bases, their
//! docstrings, the import bindings needed to resolve those bases, and calls
//! to plain names.
//! Focused solely on structure; no validation happens here.

pub mod ast;
pub mod lexer;

pub use ast::{CallSite, ClassDef, Module};
pub use lexer::{logical_lines, LogicalLine};

/// Scan a module's source text
///
/// This is the main entry point for parsing. Any input yields a module,
/// possibly without classes.
pub fn parse_module(name: &str, is_package: bool, source: &str) -> Module {
    let lines = lexer::logical_lines(source);
    ast::build_module(name, is_package, &lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILTERS: &str = r#"
"""Filters for the learning subdomain."""
from openedx_filters.tooling import OpenEdxPublicFilter


class CertificateRenderStarted(OpenEdxPublicFilter):
    """
    Purpose:
        Filter used to modify the certificate rendering process.

    Filter Type:
        org.openedx.learning.certificate.render.started.v1

    Trigger:
        - Repository: openedx/edx-platform
        - Path: lms/djangoapps/certificates/views/webview.py
        - Function or Method: render_html_view
    """

    filter_type = "org.openedx.learning.certificate.render.started.v1"

    @classmethod
    def run_filter(cls, context, custom_template):
        data = super().run_pipeline(context=context)
        return data.get("context")


class CohortChangeRequested(OpenEdxPublicFilter):
    filter_type = "org.openedx.learning.cohort.change.requested.v1"
"#;

    #[test]
    fn test_parse_filters_module() {
        let module = parse_module("openedx_filters.learning.filters", false, FILTERS);

        assert_eq!(
            module.imports["OpenEdxPublicFilter"],
            "openedx_filters.tooling.OpenEdxPublicFilter"
        );
        assert_eq!(module.classes.len(), 2);

        let first = &module.classes[0];
        assert_eq!(first.name, "CertificateRenderStarted");
        assert_eq!(first.bases, vec!["OpenEdxPublicFilter"]);
        assert_eq!(first.line, 6);
        let doc = first.docstring.as_deref().expect("docstring");
        assert!(doc.contains("Purpose:\n"));
        assert!(doc.contains("- Function or Method: render_html_view"));

        let second = &module.classes[1];
        assert_eq!(second.name, "CohortChangeRequested");
        assert_eq!(second.docstring, None);
    }

    #[test]
    fn test_parse_garbage() {
        let module = parse_module("junk", false, "class (\n\"\"\"\x00\u{fffd}");
        assert!(module.classes.is_empty());
    }
}
