//! Module Model
//!
//! The slice of a Python module the checkers need: import bindings, class
//! definitions with their bases and docstrings, and calls to plain names.
//! Pure data plus the statement-level recognisers that build it from
//! logical lines.

use std::collections::HashMap;

use crate::parser::lexer::LogicalLine;

/// A scanned Python module
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    /// Dotted module name, e.g. `openedx_filters.learning.filters`
    pub name: String,
    /// Whether the module is a package `__init__`
    pub is_package: bool,
    /// Local binding -> fully-qualified target, from import statements
    pub imports: HashMap<String, String>,
    /// Class definitions in source order
    pub classes: Vec<ClassDef>,
    /// Calls whose callee is a plain name, in source order
    pub calls: Vec<CallSite>,
}

/// A class statement
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    /// Declared name
    pub name: String,
    /// Name within the module, e.g. `Outer.Inner` or `factory.<locals>.Local`
    pub qualname: String,
    /// Qualified names of the enclosing classes, innermost first
    pub enclosing_classes: Vec<String>,
    /// Base class expressions as written, subscripts removed
    pub bases: Vec<String>,
    /// 1-based line of the `class` keyword
    pub line: usize,
    /// 0-based column of the `class` keyword
    pub column: usize,
    pub docstring: Option<String>,
}

/// A call such as `_("text")`
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite {
    /// Callee name
    pub func: String,
    /// Enclosing function or class, dotted; empty at module level
    pub scope: String,
    pub line: usize,
    pub column: usize,
    /// Source text of the first positional argument, if any
    pub first_arg: Option<String>,
}

impl Module {
    /// The package relative imports resolve against
    pub fn package(&self) -> &str {
        if self.is_package {
            &self.name
        } else {
            self.name.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
        }
    }

    /// Look up a class by its name within this module
    pub fn class(&self, qualname: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.qualname == qualname)
    }
}

/// An open block used to compute qualified names
struct Scope {
    indent: usize,
    name: String,
    is_class: bool,
}

/// Build a module from its logical lines
pub fn build_module(name: &str, is_package: bool, lines: &[LogicalLine]) -> Module {
    let mut module = Module {
        name: name.to_string(),
        is_package,
        ..Module::default()
    };
    let mut scopes: Vec<Scope> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        while scopes.last().is_some_and(|s| s.indent >= line.indent) {
            scopes.pop();
        }

        find_calls(line, &scope_name(&scopes), &mut module.calls);

        let text = line.text.as_str();
        if let Some(rest) = keyword(text, "import") {
            parse_import(rest, &mut module.imports);
        } else if let Some(rest) = keyword(text, "from") {
            let package = module.package().to_string();
            parse_from_import(rest, &package, &mut module.imports);
        } else if let Some(rest) = keyword(text, "class") {
            let Some(header) = parse_class_header(rest) else {
                continue;
            };
            let prefix = qualname_prefix(&scopes);
            let enclosing_classes = enclosing_classes(&scopes);

            let docstring = if header.inline_body.is_empty() {
                lines
                    .get(idx + 1)
                    .filter(|next| next.indent > line.indent)
                    .and_then(|next| string_statement(&next.text))
            } else {
                string_statement(header.inline_body)
            };

            module.classes.push(ClassDef {
                qualname: format!("{}{}", prefix, header.name),
                name: header.name.to_string(),
                enclosing_classes,
                bases: header.bases,
                line: line.line,
                column: line.column,
                docstring,
            });
            scopes.push(Scope {
                indent: line.indent,
                name: header.name.to_string(),
                is_class: true,
            });
        } else if let Some(name) = function_name(text) {
            scopes.push(Scope {
                indent: line.indent,
                name: name.to_string(),
                is_class: false,
            });
        }
    }

    module
}

/// Strip a leading keyword that must be followed by whitespace
fn keyword<'a>(text: &'a str, kw: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(kw)?;
    if rest.starts_with(|c: char| c.is_whitespace()) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn function_name(text: &str) -> Option<&str> {
    let rest = keyword(text, "async")
        .and_then(|rest| keyword(rest, "def"))
        .or_else(|| keyword(text, "def"))?;
    let end = rest
        .find(|c: char| !is_ident_char(c))
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

fn qualname_prefix(scopes: &[Scope]) -> String {
    let mut prefix = String::new();
    for scope in scopes {
        prefix.push_str(&scope.name);
        prefix.push('.');
        if !scope.is_class {
            prefix.push_str("<locals>.");
        }
    }
    prefix
}

fn scope_name(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(|scope| scope.name.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

fn enclosing_classes(scopes: &[Scope]) -> Vec<String> {
    let mut found = Vec::new();
    for (i, scope) in scopes.iter().enumerate() {
        if scope.is_class {
            found.push(format!("{}{}", qualname_prefix(&scopes[..i]), scope.name));
        }
    }
    found.reverse();
    found
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `import a.b, c.d as e`
fn parse_import(rest: &str, imports: &mut HashMap<String, String>) {
    for item in rest.split(',') {
        let mut parts = item.split_whitespace();
        let Some(target) = parts.next() else {
            continue;
        };
        match (parts.next(), parts.next()) {
            (Some("as"), Some(alias)) => {
                imports.insert(alias.to_string(), target.to_string());
            }
            _ => {
                let head = target.split('.').next().unwrap_or(target);
                imports.insert(head.to_string(), head.to_string());
            }
        }
    }
}

/// `from a.b import (C, D as E)`, with relative forms resolved against `package`
fn parse_from_import(rest: &str, package: &str, imports: &mut HashMap<String, String>) {
    let Some((source, names)) = rest.split_once(" import") else {
        return;
    };
    let source = source.trim();
    let Some(source) = resolve_relative(source, package) else {
        return;
    };

    let names = names.trim().trim_start_matches('(').trim_end_matches(')');
    for item in names.split(',') {
        let mut parts = item.split_whitespace();
        let Some(name) = parts.next() else {
            continue;
        };
        if name == "*" {
            continue;
        }
        let binding = match (parts.next(), parts.next()) {
            (Some("as"), Some(alias)) => alias,
            _ => name,
        };
        let target = if source.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", source, name)
        };
        imports.insert(binding.to_string(), target);
    }
}

/// Resolve leading dots of a `from` source against the importing package
fn resolve_relative(source: &str, package: &str) -> Option<String> {
    let dots = source.chars().take_while(|&c| c == '.').count();
    if dots == 0 {
        return Some(source.to_string());
    }

    let mut base: Vec<&str> = if package.is_empty() {
        Vec::new()
    } else {
        package.split('.').collect()
    };
    for _ in 1..dots {
        base.pop()?;
    }

    let tail = &source[dots..];
    if !tail.is_empty() {
        base.push(tail);
    }
    Some(base.join("."))
}

struct ClassHeader<'a> {
    name: &'a str,
    bases: Vec<String>,
    inline_body: &'a str,
}

/// Parse what follows `class`: name, optional type parameters, bases, colon
fn parse_class_header(rest: &str) -> Option<ClassHeader<'_>> {
    let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let name = &rest[..end];
    let mut tail = rest[end..].trim_start();

    if tail.starts_with('[') {
        let close = matching_close(tail)?;
        tail = tail[close + 1..].trim_start();
    }

    let mut bases = Vec::new();
    if tail.starts_with('(') {
        let close = matching_close(tail)?;
        bases = split_bases(&tail[1..close]);
        tail = tail[close + 1..].trim_start();
    }

    let inline_body = tail.strip_prefix(':')?.trim();
    Some(ClassHeader {
        name,
        bases,
        inline_body,
    })
}

/// Byte index of the bracket closing the one `text` starts with
fn matching_close(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a base list on top-level commas, dropping keywords and unpacking
fn split_bases(list: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for ch in list.chars() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    items.push(current);

    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty() && !item.starts_with('*'))
        .filter(|item| !is_keyword_argument(item))
        .map(|item| {
            let base = item.split('[').next().unwrap_or(item);
            base.chars().filter(|c| !c.is_whitespace()).collect()
        })
        .collect()
}

fn is_keyword_argument(item: &str) -> bool {
    let Some(idx) = item.find('=') else {
        return false;
    };
    let name = item[..idx].trim();
    !name.is_empty() && name.chars().all(is_ident_char) && !item[idx + 1..].starts_with('=')
}

/// Words that may precede `(` without making a call
const NOT_CALLABLE: &[&str] = &[
    "and", "as", "assert", "await", "case", "class", "def", "del", "elif", "else", "except",
    "for", "from", "global", "if", "import", "in", "is", "lambda", "match", "nonlocal", "not",
    "or", "raise", "return", "while", "with", "yield",
];

/// Record every `name(...)` call on a logical line
///
/// Attribute calls (`obj.name(...)`) and definitions (`def name(...)`) are
/// not calls to a plain name and are skipped. String contents are never
/// searched.
fn find_calls(line: &LogicalLine, scope: &str, calls: &mut Vec<CallSite>) {
    let text = line.text.as_str();
    let mut idx = 0;
    let mut prev_word = "";
    let mut prev_char: Option<char> = None;

    while let Some(ch) = text[idx..].chars().next() {
        if ch == '"' || ch == '\'' {
            idx += literal_bounds(&text[idx..]).map_or(text.len() - idx, |(_, _, end)| end);
            prev_word = "";
            prev_char = Some(ch);
            continue;
        }

        if ch.is_alphabetic() || ch == '_' {
            let end = text[idx..]
                .find(|c: char| !is_ident_char(c))
                .map_or(text.len(), |len| idx + len);
            let word = &text[idx..end];

            if text[end..].starts_with(['"', '\'']) && is_string_prefix(word) {
                idx = end;
                continue;
            }

            let after = text[end..].trim_start();
            let is_call = after.starts_with('(')
                && prev_char != Some('.')
                && !matches!(prev_word, "def" | "class")
                && !NOT_CALLABLE.contains(&word);
            if is_call {
                let open = text.len() - after.len();
                let (line_no, column) = line.position(idx);
                calls.push(CallSite {
                    func: word.to_string(),
                    scope: scope.to_string(),
                    line: line_no,
                    column,
                    first_arg: first_argument(&text[open + 1..]),
                });
            }

            prev_word = word;
            prev_char = word.chars().last();
            idx = end;
            continue;
        }

        if !ch.is_whitespace() {
            prev_word = "";
            prev_char = Some(ch);
        }
        idx += ch.len_utf8();
    }
}

fn is_string_prefix(word: &str) -> bool {
    word.len() <= 2
        && word
            .chars()
            .all(|c| matches!(c.to_ascii_lowercase(), 'r' | 'u' | 'b' | 'f'))
}

/// Text of the first positional argument of an argument list starting just
/// after its `(`
fn first_argument(args: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut idx = 0;
    let mut end = args.len();

    while let Some(ch) = args[idx..].chars().next() {
        match ch {
            '"' | '\'' => {
                idx += literal_bounds(&args[idx..]).map_or(args.len() - idx, |(_, _, close)| close);
                continue;
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' if depth == 0 => {
                end = idx;
                break;
            }
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                end = idx;
                break;
            }
            _ => {}
        }
        idx += ch.len_utf8();
    }

    let arg = args[..end].trim();
    if arg.is_empty() || is_keyword_argument(arg) || arg.starts_with("**") {
        return None;
    }
    Some(arg.to_string())
}

/// The value of a statement consisting solely of a plain string literal
///
/// Adjacent literals are concatenated. Bytes and f-strings do not count.
pub fn string_statement(text: &str) -> Option<String> {
    let mut rest = text.trim();
    if rest.starts_with('(') && matching_close(rest) == Some(rest.len() - 1) {
        rest = rest[1..rest.len() - 1].trim();
    }

    let mut value = String::new();
    let mut literals = 0;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() || rest.starts_with(';') {
            break;
        }
        let (literal, remaining) = string_literal(rest)?;
        value.push_str(&literal);
        literals += 1;
        rest = remaining;
    }

    (literals > 0).then_some(value)
}

/// Whether an expression is a string constant: one or more adjacent `str`
/// or bytes literals, optionally parenthesised. f-strings are not constant.
pub fn is_constant_string(text: &str) -> bool {
    let mut rest = text.trim();
    if rest.starts_with('(') && matching_close(rest) == Some(rest.len() - 1) {
        rest = rest[1..rest.len() - 1].trim();
    }

    let mut literals = 0;
    while !rest.is_empty() {
        let prefix_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let prefix = &rest[..prefix_len];
        if prefix.contains(['f', 'F']) || !is_string_prefix(prefix) {
            return false;
        }
        let Some((_, _, end)) = literal_bounds(&rest[prefix_len..]) else {
            return false;
        };
        rest = rest[prefix_len + end..].trim_start();
        literals += 1;
    }

    literals > 0
}

/// Parse one string literal at the start of `text`
fn string_literal(text: &str) -> Option<(String, &str)> {
    let prefix_len = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    let prefix = text[..prefix_len].to_ascii_lowercase();
    if prefix_len > 2 || !prefix.chars().all(|c| c == 'r' || c == 'u') {
        return None;
    }
    let raw = prefix.contains('r');

    let body = &text[prefix_len..];
    let (open, close, end) = literal_bounds(body)?;
    let inner = &body[open..close];
    let value = if raw {
        inner.to_string()
    } else {
        decode_escapes(inner)
    };
    Some((value, &body[end..]))
}

/// Bounds of a quoted literal at the start of `body`: where its content
/// starts, where the closing delimiter starts, and the index past it
fn literal_bounds(body: &str) -> Option<(usize, usize, usize)> {
    let quote = body.chars().next().filter(|&c| c == '"' || c == '\'')?;
    let triple: String = std::iter::repeat_n(quote, 3).collect();
    let delimiter = if body.starts_with(&triple) {
        triple.as_str()
    } else {
        &body[..1]
    };

    let open = delimiter.len();
    let content = &body[open..];
    let mut escaped = false;
    for (idx, ch) in content.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if content[idx..].starts_with(delimiter) {
            return Some((open, open + idx, open + idx + delimiter.len()));
        }
    }

    None
}

/// Decode the escapes of a non-raw `str` literal
///
/// Malformed `\x`, `\u` and `\U` escapes and named `\N{...}` escapes are
/// kept verbatim, as are unrecognised escapes.
fn decode_escapes(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };
        match escape {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '\\' | '\'' | '"' => out.push(escape),
            '\n' => {}
            '0'..='7' => {
                let mut code = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(code));
            }
            'x' | 'u' | 'U' => {
                let width = match escape {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(width).collect();
                let decoded = (digits.len() == width && digits.chars().all(|c| c.is_ascii_hexdigit()))
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(decoded) => {
                        out.push(decoded);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('\\');
                        out.push(escape);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}
