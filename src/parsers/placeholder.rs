//! Property placeholders: the `key.path:default` body of `${...}`

use once_cell::sync::Lazy;

use super::runtime::{Lexed, Parsed, Recognizer, Scanner, SymbolId, Token, Vocabulary};
use super::RuleKind;
use crate::analysis::classifier::{Classifier, NodeKind, RangeTable, SymbolRange};
use crate::analysis::TokenType;

pub const BACKSLASH: SymbolId = 10;
pub const COLON: SymbolId = 11;
pub const EQUALS: SymbolId = 12;
pub const EXCLAMATION: SymbolId = 13;
pub const DOT: SymbolId = 14;
pub const IDENTIFIER: SymbolId = 60;
pub const NUMBER: SymbolId = 61;

/// Placeholders have no keywords.
static VOCABULARY: Lazy<Vocabulary> = Lazy::new(|| Vocabulary::new(&[]));

pub fn vocabulary() -> &'static Vocabulary {
    &VOCABULARY
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderRule {
    /// Everything after the first `:`
    DefaultValue,
}

fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '\\' | ':' | '=' | '!' | '.')
}

pub fn tokenize(source: &str, _vocabulary: &Vocabulary) -> Lexed {
    let mut s = Scanner::new(source);
    loop {
        s.skip_whitespace();
        let Some(c) = s.peek() else { break };
        let mark = s.mark();
        let symbol = match c {
            '\\' => BACKSLASH,
            ':' => COLON,
            '=' => EQUALS,
            '!' => EXCLAMATION,
            '.' => DOT,
            _ => {
                s.eat_while(is_name_char);
                let symbol = if s.slice(mark).bytes().all(|b| b.is_ascii_digit()) { NUMBER } else { IDENTIFIER };
                s.emit(mark, symbol);
                continue;
            }
        };
        s.bump();
        s.emit(mark, symbol);
    }
    s.finish()
}

/// `key ('.' key)* (':' value?)?`
pub fn parse(source: &str, tokens: &[Token], vocabulary: &Vocabulary) -> Parsed {
    let mut p = Recognizer::new(source, tokens, vocabulary);
    loop {
        if p.at_any(&[IDENTIFIER, NUMBER]) {
            p.consume();
        } else {
            p.mismatch("Identifier");
            break;
        }
        if p.eat(DOT).is_none() {
            break;
        }
    }
    if p.eat(COLON).is_some() && !p.at_eof() {
        let first = p.current_index();
        let mut last = first;
        while !p.at_eof() {
            last = p.consume();
        }
        p.rule_span(RuleKind::Placeholder(PlaceholderRule::DefaultValue), first, last);
    }
    p.expect_eof();
    p.finish()
}

static TERMINALS: RangeTable = RangeTable(&[
    SymbolRange::new(BACKSLASH, DOT, TokenType::Operator),
    SymbolRange::single(IDENTIFIER, TokenType::Property),
    SymbolRange::single(NUMBER, TokenType::Number),
]);

static LEGEND: &[TokenType] = &[TokenType::Operator, TokenType::Property, TokenType::Number, TokenType::String];

pub struct PlaceholderClassifier;

impl Classifier for PlaceholderClassifier {
    fn classify(&self, node: NodeKind, _token: &Token, _source: &str) -> Option<TokenType> {
        match node {
            NodeKind::Terminal(symbol) => TERMINALS.lookup(symbol),
            NodeKind::Rule(RuleKind::Placeholder(PlaceholderRule::DefaultValue)) => Some(TokenType::String),
            NodeKind::Rule(_) => None,
        }
    }

    fn legend(&self) -> &'static [TokenType] {
        LEGEND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::runtime::ParseEvent;

    #[test]
    fn test_key_with_default() {
        let source = "server.port:8080 or so";
        let lexed = tokenize(source, vocabulary());
        let parsed = parse(source, &lexed.tokens, vocabulary());
        assert!(parsed.errors.is_empty());
        let span = parsed.events.iter().find_map(|e| match e {
            ParseEvent::Rule { first, last, .. } => Some((lexed.tokens[*first].start, lexed.tokens[*last].stop)),
            _ => None,
        });
        assert_eq!(span, Some((12, 22)), "Default value spans to the end");
    }

    #[test]
    fn test_empty_key_is_an_error() {
        let lexed = tokenize(":x", vocabulary());
        let parsed = parse(":x", &lexed.tokens, vocabulary());
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].message, "mismatched input ':' expecting Identifier");
    }
}
