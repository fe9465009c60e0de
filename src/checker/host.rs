//! Host Contract
//!
//! The seams between a checker and the linter that drives it. A host
//! supplies class and call nodes while it traverses source, collects the
//! messages checkers add, and decides which messages are enabled.

use super::messages::MessageDef;

/// Anything a message can be attached to
pub trait Node {
    /// 1-based line of the node
    fn lineno(&self) -> usize;

    /// 0-based column of the node
    fn col_offset(&self) -> usize {
        0
    }
}

/// A class definition as seen by a checker
pub trait ClassNode: Node {
    /// Declared (unqualified) class name
    fn name(&self) -> &str;

    /// Whether the class is, or transitively derives from, `qualified_name`
    fn is_subtype_of(&self, qualified_name: &str) -> bool;

    /// Raw docstring text, if the class has one
    fn docstring(&self) -> Option<&str>;
}

/// Shape of a call's first positional argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// A string constant, possibly several adjacent literals
    ConstString,
    Other,
}

/// A call expression as seen by a checker
pub trait CallNode: Node {
    /// Callee name when the callee is a plain name, `None` for attribute
    /// access and other expressions
    fn func_name(&self) -> Option<&str>;

    /// First positional argument, `None` when there is none
    fn first_arg(&self) -> Option<ArgKind>;
}

/// Receives the messages a checker reports
pub trait MessageSink {
    fn add_message(&mut self, message: &MessageDef, node: &dyn Node, args: &[&str]);

    fn is_message_enabled(&self, _message: &MessageDef) -> bool {
        true
    }
}

/// A checker invoked by the host as it traverses source
///
/// Every visit method defaults to doing nothing, so a checker implements
/// only the nodes it cares about.
pub trait Checker {
    /// Stable namespace the checker's messages belong to
    fn name(&self) -> &'static str;

    fn messages(&self) -> &'static [MessageDef];

    fn visit_classdef(&self, _node: &dyn ClassNode, _sink: &mut dyn MessageSink) {}

    fn visit_call(&self, _node: &dyn CallNode, _sink: &mut dyn MessageSink) {}

    /// Whether any of this checker's messages would be reported
    fn is_required(&self, sink: &dyn MessageSink) -> bool {
        self.messages()
            .iter()
            .any(|message| sink.is_message_enabled(message))
    }
}

/// A linter that checkers can be registered with
pub trait Linter {
    fn register_checker(&mut self, checker: Box<dyn Checker>);
}
