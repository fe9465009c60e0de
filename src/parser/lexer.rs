//! Python Line Lexer
//!
//! Joins physical source lines into logical lines: bracketed expressions and
//! backslash continuations are folded into one line, string literals
//! (including multi-line triple-quoted ones) are kept verbatim, and comments
//! are dropped. Nothing here fails; unterminated constructs end at EOF.

/// One Python logical line
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalLine {
    /// 1-based line number of the first physical line
    pub line: usize,
    /// Indentation width, tabs advancing to the next multiple of 8
    pub indent: usize,
    /// Number of indentation characters, i.e. the column of the first token
    pub column: usize,
    /// Code text without indentation or comments
    pub text: String,
    /// Byte offsets in `text` where a physical line ended
    pub breaks: Vec<usize>,
}

impl LogicalLine {
    /// Physical line and column of a byte offset in `text`
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let crossed = self.breaks.iter().take_while(|&&b| b < offset).count();
        match crossed {
            0 => (self.line, self.column + offset),
            n => (self.line + n, offset - self.breaks[n - 1] - 1),
        }
    }
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Cursor {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    /// Measure indentation of the current physical line, leaving the cursor
    /// on its first non-blank character. Returns the width and the
    /// character count.
    fn indentation(&mut self) -> (usize, usize) {
        let start = self.pos;
        let mut width = 0;
        while let Some(ch) = self.peek() {
            match ch {
                ' ' => width += 1,
                '\t' => width = (width / 8 + 1) * 8,
                '\x0c' => width = 0,
                _ => break,
            }
            self.pos += 1;
        }
        (width, self.pos - start)
    }

    fn skip_to_eol(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    /// Copy a string literal starting at an opening quote into `out`
    fn string_literal(&mut self, out: &mut String, breaks: &mut Vec<usize>) {
        let Some(quote) = self.bump() else {
            return;
        };
        out.push(quote);

        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.bump();
            self.bump();
            out.push(quote);
            out.push(quote);
        }

        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.bump();
                out.push(ch);
                if let Some(escaped) = self.bump() {
                    if escaped == '\n' {
                        breaks.push(out.len());
                    }
                    out.push(escaped);
                }
                continue;
            }
            if ch == '\n' && !triple {
                // Unterminated single-quoted literal; the newline ends the line.
                return;
            }
            if ch == quote {
                if !triple {
                    self.bump();
                    out.push(ch);
                    return;
                }
                if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                    for _ in 0..3 {
                        self.bump();
                        out.push(quote);
                    }
                    return;
                }
            }
            if ch == '\n' {
                breaks.push(out.len());
            }
            self.bump();
            out.push(ch);
        }
    }
}

/// Split Python source into logical lines
pub fn logical_lines(source: &str) -> Vec<LogicalLine> {
    let mut cursor = Cursor {
        chars: source.chars().filter(|&c| c != '\r').collect(),
        pos: 0,
        line: 1,
    };
    let mut lines = Vec::new();

    while cursor.peek().is_some() {
        let (indent, column) = cursor.indentation();
        let start_line = cursor.line;

        match cursor.peek() {
            None => break,
            Some('\n') => {
                cursor.bump();
                continue;
            }
            Some('#') => {
                cursor.skip_to_eol();
                cursor.bump();
                continue;
            }
            Some(_) => {}
        }

        let mut text = String::new();
        let mut breaks = Vec::new();
        let mut depth = 0usize;

        while let Some(ch) = cursor.peek() {
            match ch {
                '#' => cursor.skip_to_eol(),
                '\'' | '"' => cursor.string_literal(&mut text, &mut breaks),
                '\\' if cursor.peek_at(1) == Some('\n') => {
                    cursor.bump();
                    cursor.bump();
                    breaks.push(text.len());
                    text.push(' ');
                }
                '\n' => {
                    cursor.bump();
                    if depth == 0 {
                        break;
                    }
                    breaks.push(text.len());
                    text.push(' ');
                }
                '(' | '[' | '{' => {
                    depth += 1;
                    cursor.bump();
                    text.push(ch);
                }
                ')' | ']' | '}' => {
                    depth = depth.saturating_sub(1);
                    cursor.bump();
                    text.push(ch);
                }
                _ => {
                    cursor.bump();
                    text.push(ch);
                }
            }
        }

        let text = text.trim_end().to_string();
        if !text.is_empty() {
            lines.push(LogicalLine {
                line: start_line,
                indent,
                column,
                text,
                breaks,
            });
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_lines() {
        let lines = logical_lines("import os\n\nclass A:\n    pass\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text, "class A:");
        assert_eq!(lines[1].line, 3);
        assert_eq!(lines[2].indent, 4);
    }

    #[test]
    fn test_comments_are_dropped() {
        let lines = logical_lines("# header\nx = 1  # trailing\n    # indented comment\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "x = 1");
    }

    #[test]
    fn test_bracket_continuation() {
        let lines = logical_lines("class A(\n    Base,\n    Mixin,\n):\n    pass\n");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].text.starts_with("class A("));
        assert!(lines[0].text.ends_with("):"));
        assert_eq!(lines[1].line, 5);
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let src = "class A:\n    \"\"\"\n    Purpose: x\n\n    # not a comment\n    \"\"\"\n    y = 1\n";
        let lines = logical_lines(src);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].text.contains("# not a comment"));
        assert!(lines[1].text.contains("\n\n"));
        assert_eq!(lines[2].line, 7);
    }

    #[test]
    fn test_hash_inside_string_is_kept() {
        let lines = logical_lines("x = '#not comment'  # comment\n");
        assert_eq!(lines[0].text, "x = '#not comment'");
    }

    #[test]
    fn test_backslash_continuation_and_tabs() {
        let lines = logical_lines("x = 1 + \\\n    2\n\ty = 3\n");
        let words: Vec<_> = lines[0].text.split_whitespace().collect();
        assert_eq!(words, vec!["x", "=", "1", "+", "2"]);
        assert_eq!(lines[1].indent, 8);
    }

    #[test]
    fn test_column_counts_indent_characters() {
        let lines = logical_lines("class A:\n\tclass B:\n\t\tpass\n");
        assert_eq!(lines[1].indent, 8);
        assert_eq!(lines[1].column, 1);
        assert_eq!(lines[2].column, 2);
    }

    #[test]
    fn test_position_follows_physical_lines() {
        let src = "x = call(\n    a,\n    _(b),\n)\ny = '''one\ntwo''' + f(1)\n";
        let lines = logical_lines(src);

        let first = &lines[0];
        assert_eq!(first.position(0), (1, 0));
        let inner = first.text.find("_(").expect("inner call");
        assert_eq!(first.position(inner), (3, 4));

        let second = &lines[1];
        let call = second.text.find("f(").expect("trailing call");
        assert_eq!(second.position(call), (6, 9));
    }

    #[test]
    fn test_unterminated_string_does_not_panic() {
        let lines = logical_lines("x = \"\"\"never closed\nmore\n");
        assert_eq!(lines.len(), 1);
    }
}
