//! Token classification by symbol range
//!
//! Every grammar publishes a static table of contiguous symbol ranges and
//! the token type they map to, so a keyword block of a hundred words costs
//! one table row. Rule-level reclassification is a `match` over the
//! grammar's rule enum.

use super::model::TokenType;
use crate::parsers::runtime::{SymbolId, Token};
use crate::parsers::RuleKind;

/// What a classification callback is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Terminal(SymbolId),
    Rule(RuleKind),
}

/// `first..=last` maps to `token_type`.
#[derive(Debug, Clone, Copy)]
pub struct SymbolRange {
    pub first: SymbolId,
    pub last: SymbolId,
    pub token_type: TokenType,
}

impl SymbolRange {
    pub const fn new(first: SymbolId, last: SymbolId, token_type: TokenType) -> Self {
        Self { first, last, token_type }
    }

    pub const fn single(symbol: SymbolId, token_type: TokenType) -> Self {
        Self::new(symbol, symbol, token_type)
    }
}

/// Ordered range table. Earlier rows win where ranges overlap.
pub struct RangeTable(pub &'static [SymbolRange]);

impl RangeTable {
    pub fn lookup(&self, symbol: SymbolId) -> Option<TokenType> {
        self.0
            .iter()
            .find(|r| r.first <= symbol && symbol <= r.last)
            .map(|r| r.token_type)
    }
}

/// Per-grammar classification.
pub trait Classifier: Send + Sync {
    /// Token type for a terminal or a reclassifying rule. `token` is the
    /// first token the node covers.
    fn classify(&self, node: NodeKind, token: &Token, source: &str) -> Option<TokenType>;

    /// The token types this classifier can produce.
    fn legend(&self) -> &'static [TokenType];
}

#[cfg(test)]
mod tests {
    use super::*;

    static TABLE: RangeTable = RangeTable(&[
        SymbolRange::single(5, TokenType::String),
        SymbolRange::new(1, 9, TokenType::Operator),
        SymbolRange::new(100, 140, TokenType::Keyword),
    ]);

    #[test]
    fn test_first_matching_row_wins() {
        assert_eq!(TABLE.lookup(5), Some(TokenType::String));
        assert_eq!(TABLE.lookup(4), Some(TokenType::Operator));
        assert_eq!(TABLE.lookup(140), Some(TokenType::Keyword));
        assert_eq!(TABLE.lookup(50), None);
    }
}
