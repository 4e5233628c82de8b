//! Value types produced by one reconcile or token pass

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Semantic token types, in legend order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Keyword,
    Type,
    Class,
    String,
    Number,
    Operator,
    Variable,
    Method,
    Regexp,
    Parameter,
    Comment,
    Property,
    Namespace,
}

impl TokenType {
    /// Full legend in its published order.
    pub const ALL: [TokenType; 13] = [
        TokenType::Keyword,
        TokenType::Type,
        TokenType::Class,
        TokenType::String,
        TokenType::Number,
        TokenType::Operator,
        TokenType::Variable,
        TokenType::Method,
        TokenType::Regexp,
        TokenType::Parameter,
        TokenType::Comment,
        TokenType::Property,
        TokenType::Namespace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Keyword => "keyword",
            TokenType::Type => "type",
            TokenType::Class => "class",
            TokenType::String => "string",
            TokenType::Number => "number",
            TokenType::Operator => "operator",
            TokenType::Variable => "variable",
            TokenType::Method => "method",
            TokenType::Regexp => "regexp",
            TokenType::Parameter => "parameter",
            TokenType::Comment => "comment",
            TokenType::Property => "property",
            TokenType::Namespace => "namespace",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merges legends, keeping the first occurrence of every type.
pub fn legend_union(legends: &[&[TokenType]]) -> Vec<TokenType> {
    let mut merged = Vec::new();
    for legend in legends {
        for token_type in legend.iter() {
            if !merged.contains(token_type) {
                merged.push(*token_type);
            }
        }
    }
    merged
}

/// One classified range in absolute document offsets (bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticTokenDatum {
    pub start: usize,
    pub end: usize,
    pub token_type: TokenType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

impl SemanticTokenDatum {
    pub fn new(start: usize, end: usize, token_type: TokenType) -> Self {
        Self { start, end, token_type, modifiers: Vec::new() }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn text<'a>(&self, document: &'a str) -> Option<&'a str> {
        document.get(self.start..self.end)
    }
}

/// Problem categories, one per grammar family plus internal failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProblemKind {
    #[serde(rename = "JPQL_SYNTAX")]
    JpqlSyntax,
    #[serde(rename = "HQL_SYNTAX")]
    HqlSyntax,
    #[serde(rename = "SQL_SYNTAX")]
    SqlSyntax,
    #[serde(rename = "SPEL_SYNTAX")]
    SpelSyntax,
    #[serde(rename = "ANALYSIS_FAILURE")]
    AnalysisFailure,
}

impl ProblemKind {
    pub const ALL: [ProblemKind; 5] = [
        ProblemKind::JpqlSyntax,
        ProblemKind::HqlSyntax,
        ProblemKind::SqlSyntax,
        ProblemKind::SpelSyntax,
        ProblemKind::AnalysisFailure,
    ];

    /// Identifier used in settings keys and diagnostic codes.
    pub fn id(self) -> &'static str {
        match self {
            ProblemKind::JpqlSyntax => "JPQL_SYNTAX",
            ProblemKind::HqlSyntax => "HQL_SYNTAX",
            ProblemKind::SqlSyntax => "SQL_SYNTAX",
            ProblemKind::SpelSyntax => "SPEL_SYNTAX",
            ProblemKind::AnalysisFailure => "ANALYSIS_FAILURE",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn default_severity(self) -> ProblemSeverity {
        match self {
            ProblemKind::AnalysisFailure => ProblemSeverity::Warning,
            _ => ProblemSeverity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProblemSeverity {
    Error,
    Warning,
    Info,
    Hint,
    Ignore,
}

impl ProblemSeverity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "ERROR" => Some(ProblemSeverity::Error),
            "WARNING" => Some(ProblemSeverity::Warning),
            "INFO" => Some(ProblemSeverity::Info),
            "HINT" => Some(ProblemSeverity::Hint),
            "IGNORE" => Some(ProblemSeverity::Ignore),
            _ => None,
        }
    }
}

/// A diagnostic in the outermost document's coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileProblem {
    pub kind: ProblemKind,
    pub message: String,
    pub offset: usize,
    pub length: usize,
    pub severity: ProblemSeverity,
}

impl ReconcileProblem {
    pub fn new(kind: ProblemKind, message: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            offset,
            length,
            severity: kind.default_severity(),
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Receives problems as they are found.
pub trait ProblemSink {
    fn accept(&mut self, problem: ReconcileProblem);
}

impl ProblemSink for Vec<ReconcileProblem> {
    fn accept(&mut self, problem: ReconcileProblem) {
        self.push(problem);
    }
}

impl<F: FnMut(ReconcileProblem)> ProblemSink for F {
    fn accept(&mut self, problem: ReconcileProblem) {
        self(problem)
    }
}

/// Which family a query site belongs to, as seen by the locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostLanguage {
    /// Plain JPQL
    ObjectQueryDialectA,
    /// HQL
    ObjectQueryDialectB,
    NativeSql,
}

/// Query text cut out of a host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedQuerySnippet {
    pub text: String,
    pub host_start_offset: usize,
    pub is_native: bool,
    pub host_language: HostLanguage,
}

impl EmbeddedQuerySnippet {
    pub fn new(text: impl Into<String>, host_start_offset: usize, is_native: bool) -> Self {
        Self {
            text: text.into(),
            host_start_offset,
            is_native,
            host_language: if is_native {
                HostLanguage::NativeSql
            } else {
                HostLanguage::ObjectQueryDialectA
            },
        }
    }

    pub fn host_range(&self) -> Range<usize> {
        self.host_start_offset..self.host_start_offset + self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_union_keeps_first_seen_order() {
        let a = [TokenType::Keyword, TokenType::Class];
        let b = [TokenType::Operator, TokenType::Keyword, TokenType::Comment];
        assert_eq!(
            legend_union(&[&a, &b]),
            vec![TokenType::Keyword, TokenType::Class, TokenType::Operator, TokenType::Comment]
        );
    }

    #[test]
    fn test_problem_kind_ids_round_trip() {
        for kind in ProblemKind::ALL {
            assert_eq!(ProblemKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(ProblemKind::from_id("NOPE"), None);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = 0;
        let mut sink = |_: ReconcileProblem| seen += 1;
        sink.accept(ReconcileProblem::new(ProblemKind::SqlSyntax, "x", 0, 1));
        assert_eq!(seen, 1);
    }
}
