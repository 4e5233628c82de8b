//! JPQL: the object-query dialect defined by the persistence specification

use once_cell::sync::Lazy;

use super::lexicon::*;
use super::object_query::{QueryRule, QUERY_FUNCTIONS, QUERY_RESERVED};
use super::runtime::{Token, Vocabulary};
use super::RuleKind;
use crate::analysis::classifier::{Classifier, NodeKind, RangeTable, SymbolRange};
use crate::analysis::TokenType;

static VOCABULARY: Lazy<Vocabulary> = Lazy::new(|| Vocabulary::new(&[&QUERY_RESERVED, &QUERY_FUNCTIONS]));

pub fn vocabulary() -> &'static Vocabulary {
    &VOCABULARY
}

static TERMINALS: RangeTable = RangeTable(&[
    SymbolRange::new(LINE_COMMENT, BLOCK_COMMENT, TokenType::Comment),
    SymbolRange::new(OPERATOR_FIRST, OPERATOR_LAST, TokenType::Operator),
    SymbolRange::single(STRING_LITERAL, TokenType::String),
    SymbolRange::new(INTEGER_LITERAL, HEX_LITERAL, TokenType::Number),
    SymbolRange::new(IDENTIFIER, QUOTED_IDENTIFIER, TokenType::Variable),
    // Double-quoted literals only ever name classes in JPQL.
    SymbolRange::single(JAVA_STRING_LITERAL, TokenType::Class),
    SymbolRange::new(QUERY_RESERVED.first, QUERY_FUNCTIONS.last(), TokenType::Keyword),
]);

static LEGEND: &[TokenType] = &[
    TokenType::Keyword,
    TokenType::Type,
    TokenType::Class,
    TokenType::String,
    TokenType::Number,
    TokenType::Operator,
    TokenType::Variable,
    TokenType::Method,
    TokenType::Parameter,
    TokenType::Comment,
];

pub struct JpqlClassifier;

/// Rule classification shared with HQL.
pub(crate) fn classify_query_rule(rule: QueryRule) -> TokenType {
    match rule {
        QueryRule::EntityName | QueryRule::ConstructorName => TokenType::Class,
        QueryRule::IdentificationVariable => TokenType::Variable,
        QueryRule::StateField | QueryRule::FunctionName => TokenType::Method,
        QueryRule::InputParameter => TokenType::Parameter,
        QueryRule::EntityTypeLiteral | QueryRule::CastTarget => TokenType::Type,
    }
}

impl Classifier for JpqlClassifier {
    fn classify(&self, node: NodeKind, _token: &Token, _source: &str) -> Option<TokenType> {
        match node {
            NodeKind::Terminal(symbol) => TERMINALS.lookup(symbol),
            NodeKind::Rule(RuleKind::Query(rule)) => Some(classify_query_rule(rule)),
            NodeKind::Rule(_) => None,
        }
    }

    fn legend(&self) -> &'static [TokenType] {
        LEGEND
    }
}
