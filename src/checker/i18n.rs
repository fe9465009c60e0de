//! Translation Call Checker
//!
//! Translation functions must receive a literal string so that message
//! extraction can find it.

use super::host::{ArgKind, CallNode, Checker, MessageSink};
use super::messages::{MessageDef, TRANSLATION_MESSAGES};

/// Names treated as translation functions when called directly
pub const TRANSLATION_FUNCTIONS: &[&str] = &[
    "_",
    "gettext",
    "ngettext",
    "ngettext_lazy",
    "npgettext",
    "npgettext_lazy",
    "pgettext",
    "pgettext_lazy",
    "ugettext",
    "ugettext_lazy",
    "ugettext_noop",
    "ungettext",
    "ungettext_lazy",
];

#[derive(Debug, Default)]
pub struct TranslationStringChecker;

impl TranslationStringChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Checker for TranslationStringChecker {
    fn name(&self) -> &'static str {
        "translation-string-checker"
    }

    fn messages(&self) -> &'static [MessageDef] {
        &TRANSLATION_MESSAGES
    }

    fn visit_call(&self, node: &dyn CallNode, sink: &mut dyn MessageSink) {
        // Attribute calls such as `obj._(x)` cannot be identified.
        let Some(func) = node.func_name() else {
            return;
        };
        if !TRANSLATION_FUNCTIONS.contains(&func) || !self.is_required(&*sink) {
            return;
        }

        if node.first_arg() == Some(ArgKind::ConstString) {
            return;
        }
        log::debug!("Non-literal argument to {}() at line {}", func, node.lineno());
        sink.add_message(&TRANSLATION_MESSAGES[0], node, &[func]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::host::Node;

    struct FakeCall {
        func: Option<&'static str>,
        arg: Option<ArgKind>,
    }

    impl Node for FakeCall {
        fn lineno(&self) -> usize {
            3
        }
    }

    impl CallNode for FakeCall {
        fn func_name(&self) -> Option<&str> {
            self.func
        }

        fn first_arg(&self) -> Option<ArgKind> {
            self.arg
        }
    }

    #[derive(Default)]
    struct Collected {
        enabled: bool,
        messages: Vec<String>,
    }

    impl MessageSink for Collected {
        fn add_message(&mut self, message: &MessageDef, _node: &dyn Node, args: &[&str]) {
            self.messages.push(message.format(args));
        }

        fn is_message_enabled(&self, _message: &MessageDef) -> bool {
            self.enabled
        }
    }

    fn visit(func: Option<&'static str>, arg: Option<ArgKind>) -> Vec<String> {
        let mut sink = Collected {
            enabled: true,
            ..Collected::default()
        };
        TranslationStringChecker::new().visit_call(&FakeCall { func, arg }, &mut sink);
        sink.messages
    }

    #[test]
    fn test_literal_argument_is_accepted() {
        assert!(visit(Some("_"), Some(ArgKind::ConstString)).is_empty());
        assert!(visit(Some("ungettext_lazy"), Some(ArgKind::ConstString)).is_empty());
    }

    #[test]
    fn test_non_literal_argument_is_reported() {
        assert_eq!(
            visit(Some("ugettext"), Some(ArgKind::Other)),
            vec!["i18n function ugettext() must be called with a literal string"]
        );
    }

    #[test]
    fn test_missing_argument_is_reported() {
        assert_eq!(visit(Some("_"), None).len(), 1);
    }

    #[test]
    fn test_other_calls_are_ignored() {
        assert!(visit(Some("print"), Some(ArgKind::Other)).is_empty());
        assert!(visit(None, Some(ArgKind::Other)).is_empty());
    }

    #[test]
    fn test_disabled_message_skips_the_check() {
        let mut sink = Collected::default();
        let call = FakeCall {
            func: Some("gettext"),
            arg: Some(ArgKind::Other),
        };
        TranslationStringChecker::new().visit_call(&call, &mut sink);
        assert!(sink.messages.is_empty());
    }
}
