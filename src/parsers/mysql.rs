//! MySQL native queries

use once_cell::sync::Lazy;

use super::lexicon::*;
use super::native_sql::{
    SqlRule, MYSQL_FUNCTIONS, MYSQL_RESERVED, NULL_WORD, SQL_FUNCTIONS, SQL_LITERAL_WORDS, SQL_RESERVED,
    SQL_SOFT, SQL_TYPES,
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
        &MYSQL_RESERVED,
        &MYSQL_FUNCTIONS,
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
    SymbolRange::single(NULL_WORD, TokenType::Number),
    SymbolRange::new(SQL_LITERAL_WORDS.first, SQL_FUNCTIONS.last(), TokenType::Keyword),
    SymbolRange::new(SQL_TYPES.first, SQL_TYPES.last(), TokenType::Type),
    SymbolRange::new(MYSQL_RESERVED.first, MYSQL_FUNCTIONS.last(), TokenType::Keyword),
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

pub struct MySqlClassifier;

impl Classifier for MySqlClassifier {
    fn classify(&self, node: NodeKind, token: &Token, _source: &str) -> Option<TokenType> {
        match node {
            NodeKind::Terminal(symbol) => TERMINALS.lookup(symbol),
            NodeKind::Rule(RuleKind::Sql(rule)) => match rule {
                SqlRule::Identifier => Some(TokenType::Variable),
                SqlRule::MemberName => Some(TokenType::Property),
                // Built-in functions keep their keyword colour.
                SqlRule::FunctionName if VOCABULARY.is_keyword(token.symbol) => None,
                SqlRule::FunctionName => Some(TokenType::Method),
                SqlRule::Parameter => Some(TokenType::Parameter),
                SqlRule::DataType => Some(TokenType::Type),
                SqlRule::RegexPattern => Some(TokenType::Regexp),
            },
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

    #[test]
    fn test_null_is_a_number() {
        assert_eq!(TERMINALS.lookup(NULL_WORD), Some(TokenType::Number));
        assert_eq!(TERMINALS.lookup(SQL_LITERAL_WORDS.first + 1), Some(TokenType::Keyword));
        assert_eq!(TERMINALS.lookup(SQL_TYPES.first), Some(TokenType::Type));
    }
}
