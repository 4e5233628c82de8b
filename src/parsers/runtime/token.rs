//! Lexical tokens shared by every grammar

/// Grammar-local numeric identifier of a lexical symbol.
///
/// Every grammar lays out its symbols in contiguous ranges (operators,
/// literals, keyword groups) so that classification can be expressed as a
/// `range -> type` lookup instead of one branch per symbol.
pub type SymbolId = u16;

/// End of input. Identical in every grammar.
pub const EOF: SymbolId = 0;

/// Token channel. Hidden tokens (comments) are skipped by parsers but still
/// visible to semantic classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Default,
    Hidden,
}

/// A lexical token. Offsets are byte offsets into the snippet text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub symbol: SymbolId,
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive stop offset
    pub stop: usize,
    /// 1-based line
    pub line: u32,
    /// 0-based byte column within the line
    pub column: u32,
    pub channel: Channel,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        self.symbol == EOF
    }

    /// Literal text of the token. `None` for the synthetic end-of-input token.
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        if self.is_eof() {
            return None;
        }
        source.get(self.start..self.stop)
    }

    /// Text used in error messages (`<EOF>` for end of input).
    pub fn display_text<'a>(&self, source: &'a str) -> &'a str {
        self.text(source).unwrap_or("<EOF>")
    }

    pub fn len(&self) -> usize {
        self.stop.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A syntax error reported by a lexer or parser, still in snippet-local
/// coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// The offending token. Lexer recognition failures carry none.
    pub offending: Option<Token>,
    /// 1-based line of the error
    pub line: u32,
    /// 0-based byte column of the error
    pub column: u32,
    pub message: String,
}

/// Output of a lexer run: the full token stream terminated by an EOF token,
/// plus any recognition errors.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<SyntaxError>,
}

impl Lexed {
    /// Tokens on the default channel, including the trailing EOF.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Token)> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.channel == Channel::Default)
    }

    pub fn hidden(&self) -> impl Iterator<Item = (usize, &Token)> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.channel == Channel::Hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_token_has_no_text() {
        let eof = Token { symbol: EOF, start: 3, stop: 3, line: 1, column: 3, channel: Channel::Default };
        assert_eq!(eof.text("abc"), None);
        assert_eq!(eof.display_text("abc"), "<EOF>");
    }

    #[test]
    fn test_token_text_slices_source() {
        let token = Token { symbol: 7, start: 4, stop: 9, line: 1, column: 4, channel: Channel::Default };
        assert_eq!(token.text("FROM Owner o"), Some("Owner"));
        assert_eq!(token.len(), 5);
    }
}
