//! Validation Engine
//!
//! Structural checks for publishable filter docstrings, separated from
//! scanning and reporting concerns.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// A required docstring section that is missing or badly formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    MissingPurpose,
    MissingType,
    MissingTrigger,
}

impl ViolationKind {
    /// All kinds, in rule evaluation order
    pub const ALL: [ViolationKind; 3] = [
        ViolationKind::MissingPurpose,
        ViolationKind::MissingType,
        ViolationKind::MissingTrigger,
    ];

    /// Stable message symbol reported for this kind
    pub fn symbol(self) -> &'static str {
        match self {
            ViolationKind::MissingPurpose => "filter-docstring-missing-purpose",
            ViolationKind::MissingType => "filter-docstring-missing-type",
            ViolationKind::MissingTrigger => "filter-docstring-missing-trigger",
        }
    }

    /// Human name of the section this kind refers to
    pub fn section(self) -> &'static str {
        match self {
            ViolationKind::MissingPurpose => "purpose",
            ViolationKind::MissingType => "type",
            ViolationKind::MissingTrigger => "trigger",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A section pattern paired with the violation it produces when absent
struct Rule {
    pattern: Regex,
    kind: ViolationKind,
}

/// `\s` widened to every character Python's `str.isspace` accepts; the
/// Unicode `White_Space` set lacks the separators U+001C to U+001F
const WHITESPACE_CLASS: &str = r"[\s\x1c-\x1f]";

impl Rule {
    fn new(pattern: &str, kind: ViolationKind) -> Self {
        let pattern = pattern.replace(r"\s", WHITESPACE_CLASS);
        // Patterns are literals below; a failure here is a programming error.
        let pattern = Regex::new(&pattern)
            .unwrap_or_else(|e| panic!("invalid rule pattern for {}: {}", kind, e));
        Self { pattern, kind }
    }
}

// The trigger list fields may be separated by any whitespace, on one line or several.
static RULES: LazyLock<[Rule; 3]> = LazyLock::new(|| {
    [
        Rule::new(r"(?m)Purpose:\s*.*\n", ViolationKind::MissingPurpose),
        Rule::new(r"(?m)Filter Type:\s*.*\n", ViolationKind::MissingType),
        Rule::new(
            r"(?m)Trigger:\s*(NA|-\s*Repository:\s*[^\n]+\s*-\s*Path:\s*[^\n]+\s*-\s*Function\s*or\s*Method:\s*[^\n]+)",
            ViolationKind::MissingTrigger,
        ),
    ]
});

/// Validate a docstring, returning the missing sections in rule order
///
/// Every rule is always evaluated; the result holds at most one entry per
/// rule and is empty when the docstring is well formed.
pub fn validate(docstring: &str) -> Vec<ViolationKind> {
    RULES
        .iter()
        .filter(|rule| !rule.pattern.is_match(docstring))
        .map(|rule| rule.kind)
        .collect()
}

/// Validate an optional docstring; an absent docstring is treated as empty
pub fn validate_docstring(docstring: Option<&str>) -> Vec<ViolationKind> {
    validate(docstring.unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "Purpose:\nDoes X.\n\nFilter Type:\n  org.example.v1\n\nTrigger:\nNA\n";

    #[test]
    fn test_well_formed_docstring() {
        assert!(validate(WELL_FORMED).is_empty());
    }

    #[test]
    fn test_empty_docstring_misses_everything() {
        assert_eq!(validate(""), ViolationKind::ALL.to_vec());
        assert_eq!(validate_docstring(None), ViolationKind::ALL.to_vec());
    }

    #[test]
    fn test_purpose_needs_trailing_newline() {
        let doc = "Filter Type: a\nTrigger: NA\nPurpose: at the very end";
        assert_eq!(validate(doc), vec![ViolationKind::MissingPurpose]);
    }

    #[test]
    fn test_trigger_list_on_one_line() {
        let doc = "Purpose: p\nFilter Type: t\nTrigger: - Repository: r - Path: p - Function or Method: f";
        assert!(validate(doc).is_empty());
    }

    #[test]
    fn test_trigger_list_missing_function() {
        let doc = "Purpose: p\nFilter Type: t\nTrigger:\n- Repository: r\n- Path: p\n";
        assert_eq!(validate(doc), vec![ViolationKind::MissingTrigger]);
    }

    #[test]
    fn test_information_separators_count_as_whitespace() {
        let doc = "Purpose:\x1cp\nFilter Type:\x1ft\nTrigger:\x1dNA";
        assert!(validate(doc).is_empty());

        let doc = "Purpose: p\nFilter Type: t\nTrigger:\x1e- Repository:\x1cr\x1f- Path: p - Function\x1dor\x1eMethod: f";
        assert!(validate(doc).is_empty());
    }

    #[test]
    fn test_symbols_are_stable() {
        let symbols: Vec<_> = ViolationKind::ALL.iter().map(|k| k.symbol()).collect();
        assert_eq!(
            symbols,
            vec![
                "filter-docstring-missing-purpose",
                "filter-docstring-missing-type",
                "filter-docstring-missing-trigger",
            ]
        );
    }
}
