//! Syntax errors to host-document problems

use once_cell::unsync::OnceCell;

use super::model::{ProblemSink, ProblemSeverity, ReconcileProblem};
use crate::config::QueryAnalysisConfig;
use crate::parsers::position_utils::{to_host, LineIndex};
use crate::parsers::runtime::SyntaxError;
use crate::parsers::GrammarId;

/// Maps errors of one snippet. The line index is only built when a lexer
/// error without a token needs it.
pub struct DiagnosticMapper<'a> {
    grammar: GrammarId,
    text: &'a str,
    host_start: usize,
    lines: OnceCell<LineIndex>,
}

impl<'a> DiagnosticMapper<'a> {
    pub fn new(grammar: GrammarId, text: &'a str, host_start: usize) -> Self {
        Self { grammar, text, host_start, lines: OnceCell::new() }
    }

    fn lines(&self) -> &LineIndex {
        self.lines.get_or_init(|| LineIndex::new(self.text))
    }

    /// Start of the last character, for errors at end of input.
    fn last_char(&self) -> (usize, usize) {
        match self.text.char_indices().next_back() {
            Some((i, c)) => (i, c.len_utf8()),
            None => (0, 0),
        }
    }

    /// Local `(offset, length)`, always inside the snippet when it is not
    /// empty.
    fn local_span(&self, error: &SyntaxError) -> (usize, usize) {
        let (offset, length) = match error.offending {
            Some(token) if !token.is_eof() => (token.start, token.len().max(1)),
            Some(_) => self.last_char(),
            None => {
                let offset = self.lines().offset(error.line, error.column).unwrap_or(self.text.len());
                let end = self.lines().end_of_line(offset);
                (offset, (end - offset).max(1))
            }
        };
        if offset >= self.text.len() {
            return self.last_char();
        }
        (offset, length.min(self.text.len() - offset))
    }

    pub fn map(&self, error: &SyntaxError) -> ReconcileProblem {
        let (offset, length) = self.local_span(error);
        ReconcileProblem::new(
            self.grammar.problem_kind(),
            format!("{}: {}", self.grammar.display_name(), error.message),
            to_host(self.host_start, offset),
            length,
        )
    }
}

/// Applies configured severities and drops ignored problems.
pub struct SeveritySink<'a> {
    config: &'a QueryAnalysisConfig,
    inner: &'a mut dyn ProblemSink,
}

impl<'a> SeveritySink<'a> {
    pub fn new(config: &'a QueryAnalysisConfig, inner: &'a mut dyn ProblemSink) -> Self {
        Self { config, inner }
    }
}

impl ProblemSink for SeveritySink<'_> {
    fn accept(&mut self, mut problem: ReconcileProblem) {
        problem.severity = self.config.severity(problem.kind);
        if problem.severity != ProblemSeverity::Ignore {
            self.inner.accept(problem);
        }
    }
}
