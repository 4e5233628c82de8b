//! Symbol layout shared by the object-query and native SQL grammars
//!
//! Punctuation, literals and names occupy fixed low ranges; each dialect
//! places its keyword groups from 100 upwards. The SpEL and placeholder
//! grammars have layouts of their own.

use super::runtime::SymbolId;

pub const LINE_COMMENT: SymbolId = 1;
pub const BLOCK_COMMENT: SymbolId = 2;

pub const OPERATOR_FIRST: SymbolId = 10;
pub const DOT: SymbolId = 10;
pub const COMMA: SymbolId = 11;
pub const LPAREN: SymbolId = 12;
pub const RPAREN: SymbolId = 13;
pub const LBRACKET: SymbolId = 14;
pub const RBRACKET: SymbolId = 15;
pub const LBRACE: SymbolId = 16;
pub const RBRACE: SymbolId = 17;
pub const EQ: SymbolId = 18;
/// `<>` or `!=`
pub const NE: SymbolId = 19;
pub const LT: SymbolId = 20;
pub const LE: SymbolId = 21;
pub const GT: SymbolId = 22;
pub const GE: SymbolId = 23;
pub const PLUS: SymbolId = 24;
pub const MINUS: SymbolId = 25;
pub const STAR: SymbolId = 26;
pub const SLASH: SymbolId = 27;
pub const PERCENT: SymbolId = 28;
/// `||`
pub const CONCAT: SymbolId = 29;
pub const COLON: SymbolId = 30;
pub const DOUBLE_COLON: SymbolId = 31;
pub const QUESTION: SymbolId = 32;
pub const SEMICOLON: SymbolId = 33;
pub const AMP: SymbolId = 34;
pub const PIPE: SymbolId = 35;
pub const CARET: SymbolId = 36;
pub const TILDE: SymbolId = 37;
pub const BANG: SymbolId = 38;
pub const AT: SymbolId = 39;
/// `->`
pub const ARROW: SymbolId = 40;
/// `->>`
pub const DOUBLE_ARROW: SymbolId = 41;
/// `~*`, `!~`, `!~*`
pub const REGEX_OP: SymbolId = 42;
/// `@>`
pub const CONTAINS: SymbolId = 43;
/// `<@`
pub const CONTAINED_BY: SymbolId = 44;
/// `<=>`
pub const NULL_SAFE_EQ: SymbolId = 45;
pub const OPERATOR_LAST: SymbolId = 45;

pub const STRING_LITERAL: SymbolId = 50;
pub const INTEGER_LITERAL: SymbolId = 51;
pub const DECIMAL_LITERAL: SymbolId = 52;
/// `10L`, `10BI`
pub const LONG_LITERAL: SymbolId = 53;
/// `1.5F`, `1.5D`, `1.5BD`
pub const FLOAT_LITERAL: SymbolId = 54;
pub const HEX_LITERAL: SymbolId = 55;

pub const IDENTIFIER: SymbolId = 60;
/// `"name"` in PostgreSQL, `` `name` `` in MySQL
pub const QUOTED_IDENTIFIER: SymbolId = 61;
/// `#{ ... }`, handed to the nested expression language
pub const EMBEDDED_EXPRESSION: SymbolId = 62;
/// `{h-schema}`, `{h-catalog}`, `{h-domain}`
pub const SCHEMA_PLACEHOLDER: SymbolId = 63;
/// Double-quoted literal in the object-query dialects
pub const JAVA_STRING_LITERAL: SymbolId = 64;
/// `$1` in PostgreSQL
pub const POSITIONAL_PARAMETER: SymbolId = 65;

/// Display form of a shared symbol, used in "missing X" messages.
pub fn display(symbol: SymbolId) -> &'static str {
    match symbol {
        DOT => "'.'",
        COMMA => "','",
        LPAREN => "'('",
        RPAREN => "')'",
        LBRACKET => "'['",
        RBRACKET => "']'",
        EQ => "'='",
        COLON => "':'",
        SEMICOLON => "';'",
        IDENTIFIER => "IDENTIFIER",
        STRING_LITERAL => "STRING",
        INTEGER_LITERAL => "INTEGER",
        _ => "<symbol>",
    }
}
