//! Spring Expression Language, as found inside `#{...}`
//!
//! SpEL has its own symbol layout. Property placeholders (`${...}`) inside
//! an expression are lexed as a single token and handed to the placeholder
//! grammar.

mod lexer;
mod parser;

pub use lexer::tokenize;
pub use parser::parse;

use once_cell::sync::Lazy;

use super::runtime::{KeywordGroup, SymbolId, Token, Vocabulary};
use super::RuleKind;
use crate::analysis::classifier::{Classifier, NodeKind, RangeTable, SymbolRange};
use crate::analysis::TokenType;

pub const SEMICOLON: SymbolId = 10;
pub const INC: SymbolId = 11;
pub const PLUS: SymbolId = 12;
pub const DEC: SymbolId = 13;
pub const MINUS: SymbolId = 14;
pub const COLON: SymbolId = 15;
pub const DOT: SymbolId = 16;
pub const COMMA: SymbolId = 17;
pub const STAR: SymbolId = 18;
pub const DIV: SymbolId = 19;
pub const MOD: SymbolId = 20;
pub const LPAREN: SymbolId = 21;
pub const RPAREN: SymbolId = 22;
pub const LSQUARE: SymbolId = 23;
pub const RSQUARE: SymbolId = 24;
pub const HASH: SymbolId = 25;
/// `@`
pub const BEAN_REF: SymbolId = 26;
/// `^[`
pub const SELECT_FIRST: SymbolId = 27;
pub const POWER: SymbolId = 28;
pub const NE: SymbolId = 29;
/// `![`
pub const PROJECT: SymbolId = 30;
pub const NOT: SymbolId = 31;
pub const EQ: SymbolId = 32;
pub const ASSIGN: SymbolId = 33;
pub const SYMBOLIC_AND: SymbolId = 34;
/// `&`
pub const FACTORY_BEAN_REF: SymbolId = 35;
pub const SYMBOLIC_OR: SymbolId = 36;
/// `?[`
pub const SELECT: SymbolId = 37;
/// `?:`
pub const ELVIS: SymbolId = 38;
/// `?.`
pub const SAFE_NAVI: SymbolId = 39;
pub const QMARK: SymbolId = 40;
/// `$[`
pub const SELECT_LAST: SymbolId = 41;
pub const GE: SymbolId = 42;
pub const GT: SymbolId = 43;
pub const LE: SymbolId = 44;
pub const LT: SymbolId = 45;
pub const LCURLY: SymbolId = 46;
pub const RCURLY: SymbolId = 47;
pub const OPERATOR_FIRST: SymbolId = SEMICOLON;
pub const OPERATOR_LAST: SymbolId = RCURLY;

pub const IDENTIFIER: SymbolId = 60;
pub const INTEGER_LITERAL: SymbolId = 61;
pub const REAL_LITERAL: SymbolId = 62;
pub const STRING_LITERAL: SymbolId = 63;
/// `${...}`
pub const PROPERTY_PLACEHOLDER: SymbolId = 64;

pub static SPEL_KEYWORDS: KeywordGroup = KeywordGroup::new(100, &[
    "AND", "OR", "NOT", "TRUE", "FALSE", "NEW", "NULL", "T", "MATCHES", "INSTANCEOF",
    "BETWEEN", "DIV", "MOD", "GT", "GE", "LT", "LE", "EQ", "NE",
]);

static VOCABULARY: Lazy<Vocabulary> = Lazy::new(|| Vocabulary::new(&[&SPEL_KEYWORDS]));

pub fn vocabulary() -> &'static Vocabulary {
    &VOCABULARY
}

/// Grammar rules that reclassify SpEL tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpelRule {
    /// `@name` or `&name`
    BeanReference,
    /// Identifier followed by arguments
    MethodName,
    /// Identifier navigated to with `.` or `?.`
    PropertyName,
    /// `#name(...)`
    FunctionName,
    /// Leading segment of a qualified type name
    Namespace,
    /// Final segment of a qualified type name
    TypeName,
    /// Class instantiated by `new`
    ConstructorName,
    /// `[0]`, spanning the brackets
    InputParameter,
}

static TERMINALS: RangeTable = RangeTable(&[
    SymbolRange::new(OPERATOR_FIRST, OPERATOR_LAST, TokenType::Operator),
    SymbolRange::single(IDENTIFIER, TokenType::Variable),
    SymbolRange::new(INTEGER_LITERAL, REAL_LITERAL, TokenType::Number),
    SymbolRange::single(STRING_LITERAL, TokenType::String),
    SymbolRange::new(SPEL_KEYWORDS.first, SPEL_KEYWORDS.last(), TokenType::Keyword),
]);

static LEGEND: &[TokenType] = &[
    TokenType::Operator,
    TokenType::Keyword,
    TokenType::Type,
    TokenType::String,
    TokenType::Number,
    TokenType::Method,
    TokenType::Property,
    TokenType::Parameter,
    TokenType::Variable,
    TokenType::Namespace,
];

pub struct SpelClassifier;

impl Classifier for SpelClassifier {
    fn classify(&self, node: NodeKind, _token: &Token, _source: &str) -> Option<TokenType> {
        match node {
            NodeKind::Terminal(symbol) => TERMINALS.lookup(symbol),
            NodeKind::Rule(RuleKind::Spel(rule)) => Some(match rule {
                SpelRule::BeanReference | SpelRule::TypeName => TokenType::Type,
                SpelRule::MethodName | SpelRule::FunctionName | SpelRule::ConstructorName => TokenType::Method,
                SpelRule::PropertyName => TokenType::Property,
                SpelRule::Namespace => TokenType::Namespace,
                SpelRule::InputParameter => TokenType::Parameter,
            }),
            NodeKind::Rule(_) => None,
        }
    }

    fn legend(&self) -> &'static [TokenType] {
        LEGEND
    }
}
