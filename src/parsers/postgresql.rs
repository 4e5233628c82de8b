//! PostgreSQL native queries

use once_cell::sync::Lazy;

use super::lexicon::*;
use super::native_sql::{
    SqlRule, POSTGRES_RESERVED, POSTGRES_SOFT, SQL_FUNCTIONS, SQL_LITERAL_WORDS, SQL_RESERVED, SQL_SOFT,
    SQL_TYPES,
};
use super::runtime::{Token, Vocabulary};
use super::RuleKind;
use crate::analysis::classifier::{Classifier, NodeKind, RangeTable, SymbolRange};
use crate::analysis::TokenType;

static VOCABULARY: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        &SQL_LITERAL_WORDS,
        &SQL_RESERVED,
        &SQL_SOFT,
        &SQL_FUNCTIONS,
        &SQL_TYPES,
        &POSTGRES_RESERVED,
        &POSTGRES_SOFT,
    ])
});

pub fn vocabulary() -> &'static Vocabulary {
    &VOCABULARY
}

static TERMINALS: RangeTable = RangeTable(&[
    SymbolRange::new(LINE_COMMENT, BLOCK_COMMENT, TokenType::Comment),
    SymbolRange::new(OPERATOR_FIRST, OPERATOR_LAST, TokenType::Operator),
    SymbolRange::single(STRING_LITERAL, TokenType::String),
    SymbolRange::new(INTEGER_LITERAL, HEX_LITERAL, TokenType::Number),
    SymbolRange::new(IDENTIFIER, QUOTED_IDENTIFIER, TokenType::Variable),
    SymbolRange::single(SCHEMA_PLACEHOLDER, TokenType::Parameter),
    SymbolRange::single(POSITIONAL_PARAMETER, TokenType::Parameter),
    SymbolRange::new(SQL_LITERAL_WORDS.first, SQL_FUNCTIONS.last(), TokenType::Keyword),
    SymbolRange::new(SQL_TYPES.first, SQL_TYPES.last(), TokenType::Type),
    SymbolRange::new(POSTGRES_RESERVED.first, POSTGRES_SOFT.last(), TokenType::Keyword),
]);

static LEGEND: &[TokenType] = &[
    TokenType::Keyword,
    TokenType::Type,
    TokenType::String,
    TokenType::Number,
    TokenType::Operator,
    TokenType::Variable,
    TokenType::Regexp,
    TokenType::Comment,
    TokenType::Parameter,
    TokenType::Method,
    TokenType::Property,
];

pub struct PostgreSqlClassifier;

impl Classifier for PostgreSqlClassifier {
    fn classify(&self, node: NodeKind, _token: &Token, _source: &str) -> Option<TokenType> {
        match node {
            NodeKind::Terminal(symbol) => TERMINALS.lookup(symbol),
            NodeKind::Rule(RuleKind::Sql(rule)) => Some(match rule {
                SqlRule::Identifier => TokenType::Variable,
                SqlRule::MemberName => TokenType::Property,
                SqlRule::FunctionName => TokenType::Method,
                SqlRule::Parameter => TokenType::Parameter,
                SqlRule::DataType => TokenType::Type,
                SqlRule::RegexPattern => TokenType::Regexp,
            }),
            NodeKind::Rule(_) => None,
        }
    }

    fn legend(&self) -> &'static [TokenType] {
        LEGEND
    }
}
