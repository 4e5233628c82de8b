//! Grammars for embedded queries
//!
//! Every grammar is a hand-written lexer plus a recursive-descent parser
//! emitting flat [`runtime::ParseEvent`]s. [`GrammarId`] selects one at
//! compile time through a static dispatch table; nothing is looked up by
//! name at runtime.

pub mod hql;
pub mod jpql;
pub mod lexicon;
pub mod mysql;
pub mod native_sql;
pub mod object_query;
pub mod placeholder;
pub mod position_utils;
pub mod postgresql;
pub mod runtime;
pub mod spel;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::classifier::Classifier;
use crate::analysis::ProblemKind;
use native_sql::{SqlDialect, SqlLexerOptions, SqlRule};
use object_query::{QueryDialect, QueryRule};
use placeholder::PlaceholderRule;
use runtime::{Lexed, ParseEvent, Parsed, SymbolId, SyntaxError, Token};
use spel::SpelRule;

/// A reclassifying grammar rule, tagged by grammar family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Query(QueryRule),
    Sql(SqlRule),
    Spel(SpelRule),
    Placeholder(PlaceholderRule),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrammarId {
    Jpql,
    Hql,
    MySql,
    PostgreSql,
    Spel,
    PropertyPlaceholder,
}

impl GrammarId {
    pub const ALL: [GrammarId; 6] = [
        GrammarId::Jpql,
        GrammarId::Hql,
        GrammarId::MySql,
        GrammarId::PostgreSql,
        GrammarId::Spel,
        GrammarId::PropertyPlaceholder,
    ];

    fn entry(self) -> &'static GrammarEntry {
        &GRAMMARS[self as usize]
    }

    /// Human-readable name, also used as the diagnostic prefix.
    pub fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    pub fn problem_kind(self) -> ProblemKind {
        self.entry().problem_kind
    }

    pub fn classifier(self) -> &'static dyn Classifier {
        self.entry().classifier
    }

    /// The language nested inside this one, if any.
    pub fn nested(self) -> Option<NestedLanguage> {
        self.entry().nested
    }
}

impl fmt::Display for GrammarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A span of another language, lexed by the outer grammar as one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedLanguage {
    /// Symbol of the marker token in the outer grammar
    pub marker: SymbolId,
    /// Length of the opening delimiter (`#{`, `${`)
    pub opener_len: usize,
    /// Length of the closing delimiter
    pub closer_len: usize,
    pub grammar: GrammarId,
}

const SPEL_EXPRESSION: NestedLanguage = NestedLanguage {
    marker: lexicon::EMBEDDED_EXPRESSION,
    opener_len: 2,
    closer_len: 1,
    grammar: GrammarId::Spel,
};

const PROPERTY_PLACEHOLDER: NestedLanguage = NestedLanguage {
    marker: spel::PROPERTY_PLACEHOLDER,
    opener_len: 2,
    closer_len: 1,
    grammar: GrammarId::PropertyPlaceholder,
};

struct GrammarEntry {
    display_name: &'static str,
    problem_kind: ProblemKind,
    lex: fn(&str) -> Lexed,
    parse: fn(&str, &[Token]) -> Parsed,
    classifier: &'static dyn Classifier,
    nested: Option<NestedLanguage>,
}

/// Indexed by `GrammarId as usize`.
static GRAMMARS: [GrammarEntry; 6] = [
    GrammarEntry {
        display_name: "JPQL",
        problem_kind: ProblemKind::JpqlSyntax,
        lex: |source| object_query::tokenize(source, jpql::vocabulary()),
        parse: |source, tokens| object_query::parse(source, tokens, jpql::vocabulary(), QueryDialect::Jpql),
        classifier: &jpql::JpqlClassifier,
        nested: Some(SPEL_EXPRESSION),
    },
    GrammarEntry {
        display_name: "HQL",
        problem_kind: ProblemKind::HqlSyntax,
        lex: |source| object_query::tokenize(source, hql::vocabulary()),
        parse: |source, tokens| object_query::parse(source, tokens, hql::vocabulary(), QueryDialect::Hql),
        classifier: &hql::HqlClassifier,
        nested: Some(SPEL_EXPRESSION),
    },
    GrammarEntry {
        display_name: "MySQL",
        problem_kind: ProblemKind::SqlSyntax,
        lex: |source| native_sql::tokenize(source, mysql::vocabulary(), SqlLexerOptions::MYSQL),
        parse: |source, tokens| native_sql::parse(source, tokens, mysql::vocabulary(), SqlDialect::MySql),
        classifier: &mysql::MySqlClassifier,
        nested: Some(SPEL_EXPRESSION),
    },
    GrammarEntry {
        display_name: "PostgreSQL",
        problem_kind: ProblemKind::SqlSyntax,
        lex: |source| native_sql::tokenize(source, postgresql::vocabulary(), SqlLexerOptions::POSTGRESQL),
        parse: |source, tokens| native_sql::parse(source, tokens, postgresql::vocabulary(), SqlDialect::PostgreSql),
        classifier: &postgresql::PostgreSqlClassifier,
        nested: Some(SPEL_EXPRESSION),
    },
    GrammarEntry {
        display_name: "SpEL",
        problem_kind: ProblemKind::SpelSyntax,
        lex: |source| spel::tokenize(source, spel::vocabulary()),
        parse: |source, tokens| spel::parse(source, tokens, spel::vocabulary()),
        classifier: &spel::SpelClassifier,
        nested: Some(PROPERTY_PLACEHOLDER),
    },
    GrammarEntry {
        display_name: "Property placeholder",
        problem_kind: ProblemKind::SpelSyntax,
        lex: |source| placeholder::tokenize(source, placeholder::vocabulary()),
        parse: |source, tokens| placeholder::parse(source, tokens, placeholder::vocabulary()),
        classifier: &placeholder::PlaceholderClassifier,
        nested: None,
    },
];

/// A single-use lexer/parser pair for one snippet.
pub struct ParserHandle<'a> {
    grammar: GrammarId,
    source: &'a str,
    start_offset: usize,
}

/// Everything one parse produced, in snippet-local coordinates.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub grammar: GrammarId,
    pub tokens: Vec<Token>,
    pub events: Vec<ParseEvent>,
    /// Lexer errors first, then parser errors, each in report order
    pub errors: Vec<SyntaxError>,
    pub depth_exceeded: bool,
}

/// Creates the parser for `grammar` over `source`, which starts at
/// `start_offset` in the host document.
pub fn create_parser(grammar: GrammarId, source: &str, start_offset: usize) -> ParserHandle<'_> {
    ParserHandle { grammar, source, start_offset }
}

impl<'a> ParserHandle<'a> {
    pub fn grammar(&self) -> GrammarId {
        self.grammar
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// Lexes and parses. Consumes the handle.
    pub fn run(self) -> ParseOutcome {
        let entry = self.grammar.entry();
        let Lexed { tokens, mut errors } = (entry.lex)(self.source);
        let parsed = (entry.parse)(self.source, &tokens);
        errors.extend(parsed.errors);
        ParseOutcome {
            grammar: self.grammar,
            tokens,
            events: parsed.events,
            errors,
            depth_exceeded: parsed.depth_exceeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_table_order_matches_ids() {
        let names: Vec<_> = GrammarId::ALL.iter().map(|g| g.display_name()).collect();
        assert_eq!(names, vec!["JPQL", "HQL", "MySQL", "PostgreSQL", "SpEL", "Property placeholder"]);
    }

    #[test]
    fn test_every_grammar_accepts_its_own_trivial_input() {
        let samples = [
            (GrammarId::Jpql, "SELECT o FROM Owner o"),
            (GrammarId::Hql, "FROM Owner"),
            (GrammarId::MySql, "SELECT 1"),
            (GrammarId::PostgreSql, "SELECT 1;"),
            (GrammarId::Spel, "a.b"),
            (GrammarId::PropertyPlaceholder, "a.b:c"),
        ];
        for (grammar, source) in samples {
            let outcome = create_parser(grammar, source, 0).run();
            assert!(outcome.errors.is_empty(), "{}: {:?}", grammar, outcome.errors);
        }
    }

    #[test]
    fn test_lexer_errors_come_first() {
        let outcome = create_parser(GrammarId::Jpql, "SELECT o FROM Owner o WHERE o.x = 'open", 0).run();
        assert!(outcome.errors[0].offending.is_none(), "Lexer error has no token");
        assert!(outcome.errors[0].message.starts_with("token recognition error at: "));
    }
}
