//! Character cursor used by the hand-written lexers
//!
//! Tracks byte offset, line and column while scanning, and collects emitted
//! tokens and recognition errors. Lexers drive it with small `eat_*` helpers
//! and call [`Scanner::emit`] once a lexeme is complete.

use super::token::{Channel, Lexed, SymbolId, SyntaxError, Token, EOF};

/// Saved scanner position marking the start of a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub pos: usize,
    pub line: u32,
    pub column: u32,
}

pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    line_start: usize,
    tokens: Vec<Token>,
    errors: Vec<SyntaxError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            line_start: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub fn at_str(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Case-insensitive prefix test for ASCII keywords.
    pub fn at_str_ignore_case(&self, s: &str) -> bool {
        self.rest()
            .get(..s.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(s))
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(c)
    }

    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn eat_str(&mut self, s: &str) -> bool {
        if !self.at_str(s) {
            return false;
        }
        for _ in s.chars() {
            self.bump();
        }
        true
    }

    /// Consumes characters while `pred` holds; returns how many were consumed.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
            count += 1;
        }
        count
    }

    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: (self.pos - self.line_start) as u32,
        }
    }

    /// Rewinds to a previously taken mark. Only valid when no token was
    /// emitted since the mark.
    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.line = mark.line;
        self.line_start = mark.pos - mark.column as usize;
    }

    pub fn slice(&self, mark: Mark) -> &'a str {
        &self.source[mark.pos..self.pos]
    }

    pub fn emit(&mut self, mark: Mark, symbol: SymbolId) {
        self.push(mark, symbol, Channel::Default);
    }

    pub fn emit_hidden(&mut self, mark: Mark, symbol: SymbolId) {
        self.push(mark, symbol, Channel::Hidden);
    }

    fn push(&mut self, mark: Mark, symbol: SymbolId, channel: Channel) {
        self.tokens.push(Token {
            symbol,
            start: mark.pos,
            stop: self.pos,
            line: mark.line,
            column: mark.column,
            channel,
        });
    }

    /// Records a recognition failure for the text scanned since `mark`.
    /// Consumes one character when nothing was scanned yet so lexing always
    /// makes progress.
    pub fn reject(&mut self, mark: Mark) {
        if self.pos == mark.pos {
            self.bump();
        }
        let text = self.slice(mark);
        self.errors.push(SyntaxError {
            offending: None,
            line: mark.line,
            column: mark.column,
            message: format!("token recognition error at: '{}'", text),
        });
    }

    pub fn skip_whitespace(&mut self) {
        self.eat_while(char::is_whitespace);
    }

    /// Scans a quoted literal starting at the opening quote. A doubled quote
    /// is an escaped quote; `backslash_escapes` additionally honours `\x`.
    /// Returns `false` when input ends before the closing quote.
    pub fn eat_quoted(&mut self, quote: char, backslash_escapes: bool) -> bool {
        if !self.eat(quote) {
            return false;
        }
        while let Some(c) = self.bump() {
            if backslash_escapes && c == '\\' {
                self.bump();
            } else if c == quote {
                if self.peek() == Some(quote) {
                    self.bump();
                } else {
                    return true;
                }
            }
        }
        false
    }

    /// Scans a `X{ ... }` span whose opener has length two (`#{`, `${`),
    /// honouring nested braces and quoted strings. Returns `false` when the
    /// closing brace is missing.
    pub fn eat_braced(&mut self) -> bool {
        self.bump();
        if !self.eat('{') {
            return false;
        }
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            match c {
                '\'' | '"' => {
                    if !self.eat_quoted(c, false) {
                        return false;
                    }
                }
                '{' => {
                    depth += 1;
                    self.bump();
                }
                '}' => {
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
        false
    }

    /// Scans digits with an optional fraction and exponent. Returns whether
    /// the literal has a fractional part or exponent.
    pub fn eat_number(&mut self) -> bool {
        let mut decimal = false;
        self.eat_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            decimal = true;
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                decimal = true;
                self.bump();
                if signed {
                    self.bump();
                }
                self.eat_while(|c| c.is_ascii_digit());
            }
        }
        decimal
    }

    pub fn finish(mut self) -> Lexed {
        let mark = self.mark();
        self.push(mark, EOF, Channel::Default);
        Lexed {
            tokens: self.tokens,
            errors: self.errors,
        }
    }
}

pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column_tracking() {
        let mut scanner = Scanner::new("ab\ncd");
        scanner.bump();
        scanner.bump();
        scanner.bump();
        let mark = scanner.mark();
        assert_eq!(mark.line, 2);
        assert_eq!(mark.column, 0);
        assert_eq!(mark.pos, 3);
    }

    #[test]
    fn test_quoted_with_doubled_quote() {
        let mut scanner = Scanner::new("'it''s' rest");
        assert!(scanner.eat_quoted('\'', false));
        assert_eq!(scanner.pos(), 7);
    }

    #[test]
    fn test_unterminated_quote() {
        let mut scanner = Scanner::new("'open");
        assert!(!scanner.eat_quoted('\'', false));
        assert!(scanner.is_eof());
    }

    #[test]
    fn test_braced_span_with_nested_braces() {
        let mut scanner = Scanner::new("#{ {1, 2} + '}' } tail");
        assert!(scanner.eat_braced());
        assert_eq!(scanner.rest(), " tail");
    }

    #[test]
    fn test_reject_records_error_without_token() {
        let mut scanner = Scanner::new("\u{00a7}x");
        let mark = scanner.mark();
        scanner.reject(mark);
        let lexed = scanner.finish();
        assert_eq!(lexed.errors.len(), 1);
        assert!(lexed.errors[0].offending.is_none());
        assert_eq!(lexed.errors[0].message, "token recognition error at: '\u{00a7}'");
        assert_eq!(lexed.tokens.len(), 1, "Only EOF should be emitted");
    }

    #[test]
    fn test_number_forms() {
        for (input, decimal) in [("42", false), ("4.2", true), ("4e10", true), ("4.", false)] {
            let mut scanner = Scanner::new(input);
            assert_eq!(scanner.eat_number(), decimal, "decimal flag for {}", input);
        }
    }
}
