//! Message Definitions
//!
//! Diagnostic codes declared by this crate's checkers.

use crate::validation::ViolationKind;

/// Numeric namespace shared by every message this crate declares
pub const BASE_ID: u32 = 76;

/// Category letter prefixed to a message id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Error,
    Warning,
    Convention,
}

impl Category {
    pub fn letter(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Convention => 'C',
        }
    }
}

/// A diagnostic the host can report on behalf of a checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDef {
    pub category: Category,
    /// Two-digit suffix appended to [`BASE_ID`]
    pub suffix: u32,
    pub symbol: &'static str,
    /// Message text; `{}` is replaced by the first argument
    pub template: &'static str,
    pub description: &'static str,
}

impl MessageDef {
    /// Full message id, e.g. `E7691`
    pub fn msgid(&self) -> String {
        format!("{}{}{:02}", self.category.letter(), BASE_ID, self.suffix)
    }

    /// Render the template with `args` substituted in order
    pub fn format(&self, args: &[&str]) -> String {
        let mut rendered = String::with_capacity(self.template.len());
        let mut args = args.iter();
        let mut pieces = self.template.split("{}").peekable();
        while let Some(piece) = pieces.next() {
            rendered.push_str(piece);
            if pieces.peek().is_some() {
                rendered.push_str(args.next().copied().unwrap_or(""));
            }
        }
        rendered
    }

    /// Whether `name` refers to this message by symbol or by msgid
    pub fn matches(&self, name: &str) -> bool {
        self.symbol == name || self.msgid().eq_ignore_ascii_case(name)
    }
}

pub static FILTER_DOCSTRING_MESSAGES: [MessageDef; 3] = [
    MessageDef {
        category: Category::Error,
        suffix: 91,
        symbol: "filter-docstring-missing-purpose",
        template: "Filter's ({}) docstring is missing the required purpose section or is badly formatted",
        description: "filters docstring is missing the required purpose section or is badly formatted",
    },
    MessageDef {
        category: Category::Error,
        suffix: 92,
        symbol: "filter-docstring-missing-type",
        template: "Filter's ({}) docstring is missing the required type section or is badly formatted",
        description: "filters docstring is missing the required type section or is badly formatted",
    },
    MessageDef {
        category: Category::Error,
        suffix: 93,
        symbol: "filter-docstring-missing-trigger",
        template: "Filter's ({}) docstring is missing the required trigger section or is badly formatted",
        description: "filters docstring is missing the required trigger section or is badly formatted",
    },
];

pub static TRANSLATION_MESSAGES: [MessageDef; 1] = [MessageDef {
    category: Category::Error,
    suffix: 10,
    symbol: "translation-of-non-string",
    template: "i18n function {}() must be called with a literal string",
    description: "i18n functions must be called with a literal string",
}];

/// The message reported for a given violation
pub fn message_for(kind: ViolationKind) -> &'static MessageDef {
    match kind {
        ViolationKind::MissingPurpose => &FILTER_DOCSTRING_MESSAGES[0],
        ViolationKind::MissingType => &FILTER_DOCSTRING_MESSAGES[1],
        ViolationKind::MissingTrigger => &FILTER_DOCSTRING_MESSAGES[2],
    }
}
