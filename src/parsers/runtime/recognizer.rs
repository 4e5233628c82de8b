//! Recursive-descent parser core
//!
//! Grammar parsers drive a [`Recognizer`] over the visible token stream. It
//! records one [`ParseEvent`] per visited terminal plus rule-level
//! reclassification events, and collects syntax errors with single-token
//! error recovery: after one report, further reports are suppressed until a
//! token is matched successfully. Tokens that cannot be matched are skipped
//! and visited as error terminals, so every token is visited exactly once.

use super::token::{SymbolId, SyntaxError, Token, EOF};
use super::vocabulary::Vocabulary;
use crate::parsers::RuleKind;

/// Nesting limit for grammar rules. Deeper input is abandoned and surfaces as
/// an internal failure rather than exhausting the stack.
pub const MAX_RULE_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseEvent {
    /// A terminal was visited. `token` indexes the full token stream.
    Terminal { token: usize, error: bool },
    /// A grammar rule identified the role of tokens `first..=last`.
    Rule { rule: RuleKind, first: usize, last: usize },
}

#[derive(Debug, Clone, Default)]
pub struct Parsed {
    pub events: Vec<ParseEvent>,
    pub errors: Vec<SyntaxError>,
    pub depth_exceeded: bool,
}

pub struct Recognizer<'a> {
    source: &'a str,
    tokens: &'a [Token],
    vocabulary: &'a Vocabulary,
    visible: Vec<usize>,
    cursor: usize,
    events: Vec<ParseEvent>,
    errors: Vec<SyntaxError>,
    recovering: bool,
    depth: usize,
    depth_exceeded: bool,
}

impl<'a> Recognizer<'a> {
    pub fn new(source: &'a str, tokens: &'a [Token], vocabulary: &'a Vocabulary) -> Self {
        let mut visible: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.channel == super::Channel::Default)
            .map(|(i, _)| i)
            .collect();
        if visible.is_empty() {
            // Lexers always terminate with EOF; keep the invariant for
            // hand-built streams.
            visible.push(tokens.len().saturating_sub(1));
        }
        Self {
            source,
            tokens,
            vocabulary,
            visible,
            cursor: 0,
            events: Vec::new(),
            errors: Vec::new(),
            recovering: false,
            depth: 0,
            depth_exceeded: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn vocabulary(&self) -> &'a Vocabulary {
        self.vocabulary
    }

    fn visible_at(&self, n: usize) -> usize {
        let last = self.visible.len() - 1;
        self.visible[(self.cursor + n).min(last)]
    }

    /// Lookahead token `n` positions ahead (0 is the current token).
    pub fn la(&self, n: usize) -> Token {
        self.tokens
            .get(self.visible_at(n))
            .copied()
            .unwrap_or(Token {
                symbol: EOF,
                start: self.source.len(),
                stop: self.source.len(),
                line: 1,
                column: 0,
                channel: super::Channel::Default,
            })
    }

    pub fn la_symbol(&self, n: usize) -> SymbolId {
        self.la(n).symbol
    }

    /// Index of the current token in the full token stream.
    pub fn current_index(&self) -> usize {
        self.visible_at(0)
    }

    /// Position in the visible stream, used to build "no viable
    /// alternative" messages.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn text(&self, n: usize) -> &'a str {
        self.la(n).text(self.source).unwrap_or("")
    }

    pub fn at(&self, symbol: SymbolId) -> bool {
        self.la_symbol(0) == symbol
    }

    pub fn at_any(&self, symbols: &[SymbolId]) -> bool {
        symbols.contains(&self.la_symbol(0))
    }

    pub fn at_eof(&self) -> bool {
        self.at(EOF)
    }

    /// Whether lookahead `n` is a keyword spelled `kw` (upper case).
    pub fn la_kw(&self, n: usize, kw: &str) -> bool {
        self.vocabulary.word(self.la_symbol(n)) == Some(kw)
    }

    pub fn at_kw(&self, kw: &str) -> bool {
        self.la_kw(0, kw)
    }

    pub fn at_any_kw(&self, kws: &[&str]) -> bool {
        self.vocabulary
            .word(self.la_symbol(0))
            .is_some_and(|w| kws.contains(&w))
    }

    pub fn is_keyword(&self, n: usize) -> bool {
        self.vocabulary.is_keyword(self.la_symbol(n))
    }

    /// Stop offset of the last visible token before the cursor.
    pub fn la_previous_stop(&self) -> Option<usize> {
        let previous = self.cursor.checked_sub(1)?;
        self.visible.get(previous).map(|&i| self.tokens[i].stop)
    }

    /// Whether lookahead `n` starts exactly where lookahead `n - 1` stops.
    pub fn adjacent(&self, n: usize) -> bool {
        n > 0 && self.la(n).start == self.la(n - 1).stop
    }

    /// Matches the current token. Returns its stream index.
    pub fn consume(&mut self) -> usize {
        let index = self.current_index();
        if self.at_eof() {
            return index;
        }
        self.events.push(ParseEvent::Terminal { token: index, error: false });
        self.cursor += 1;
        self.recovering = false;
        index
    }

    pub fn eat(&mut self, symbol: SymbolId) -> Option<usize> {
        if self.at(symbol) { Some(self.consume()) } else { None }
    }

    pub fn eat_kw(&mut self, kw: &str) -> Option<usize> {
        if self.at_kw(kw) { Some(self.consume()) } else { None }
    }

    /// Matches `symbol`, recovering by single-token deletion when the token
    /// after the current one matches, otherwise reporting it as missing.
    pub fn expect(&mut self, symbol: SymbolId, display: &str) -> Option<usize> {
        if self.at(symbol) {
            return Some(self.consume());
        }
        if !self.at_eof() && self.la_symbol(1) == symbol {
            let message = format!("extraneous input '{}' expecting {}", self.text(0), display);
            self.report(message);
            self.skip();
            return Some(self.consume());
        }
        let message = format!("missing {} at '{}'", display, self.la(0).display_text(self.source));
        self.report(message);
        None
    }

    pub fn expect_kw(&mut self, kw: &str) -> Option<usize> {
        if self.at_kw(kw) {
            return Some(self.consume());
        }
        let display = format!("'{}'", kw);
        if !self.at_eof() && self.la_kw(1, kw) {
            let message = format!("extraneous input '{}' expecting {}", self.text(0), display);
            self.report(message);
            self.skip();
            return Some(self.consume());
        }
        let message = format!("missing {} at '{}'", display, self.la(0).display_text(self.source));
        self.report(message);
        None
    }

    /// Reports an error at the current token unless already recovering.
    pub fn report(&mut self, message: String) {
        if self.recovering {
            return;
        }
        let offending = self.la(0);
        self.errors.push(SyntaxError {
            offending: Some(offending),
            line: offending.line,
            column: offending.column,
            message,
        });
        self.recovering = true;
    }

    pub fn mismatch(&mut self, expecting: &str) {
        let message = format!(
            "mismatched input '{}' expecting {}",
            self.la(0).display_text(self.source),
            expecting
        );
        self.report(message);
    }

    /// Reports that no alternative matched the input between the visible
    /// position `start` and the current token.
    pub fn no_viable(&mut self, start: usize) {
        let last = self.visible.len() - 1;
        let text: String = (start.min(self.cursor)..=self.cursor.min(last))
            .map(|i| self.tokens[self.visible[i]].display_text(self.source))
            .collect();
        self.report(format!("no viable alternative at input '{}'", text));
    }

    /// Visits the current token as an error node and moves past it.
    pub fn skip(&mut self) {
        if self.at_eof() {
            return;
        }
        let index = self.current_index();
        self.events.push(ParseEvent::Terminal { token: index, error: true });
        self.cursor += 1;
    }

    pub fn skip_until(&mut self, stop: impl Fn(&Self) -> bool) {
        while !self.at_eof() && !stop(self) {
            self.skip();
        }
    }

    pub fn rule(&mut self, rule: RuleKind, token: usize) {
        self.rule_span(rule, token, token);
    }

    pub fn rule_span(&mut self, rule: RuleKind, first: usize, last: usize) {
        self.events.push(ParseEvent::Rule { rule, first, last });
    }

    /// Enters a nested rule. Returns `false` once the nesting limit is hit;
    /// the caller must then return without consuming.
    pub fn enter(&mut self) -> bool {
        if self.depth >= MAX_RULE_DEPTH {
            self.depth_exceeded = true;
            return false;
        }
        self.depth += 1;
        true
    }

    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn halted(&self) -> bool {
        self.depth_exceeded
    }

    /// Requires end of input, skipping whatever is left as error nodes.
    pub fn expect_eof(&mut self) {
        if self.at_eof() {
            return;
        }
        let message = format!("extraneous input '{}' expecting <EOF>", self.text(0));
        self.report(message);
        self.skip_until(|_| false);
    }

    pub fn finish(self) -> Parsed {
        Parsed {
            events: self.events,
            errors: self.errors,
            depth_exceeded: self.depth_exceeded,
        }
    }
}
