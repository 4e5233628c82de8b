//! Native SQL family: MySQL and PostgreSQL
//!
//! One lexer parameterised by [`SqlLexerOptions`] and one parser with a
//! handful of dialect switches. Keyword groups common to both dialects sit
//! below 500; each dialect adds its own groups above.

mod lexer;
mod parser;

pub use lexer::{tokenize, SqlLexerOptions};
pub use parser::parse;

use super::runtime::{KeywordGroup, SymbolId};

/// Literal words. `NULL` must stay first: MySQL highlights it as a number.
pub static SQL_LITERAL_WORDS: KeywordGroup = KeywordGroup::new(100, &["NULL", "TRUE", "FALSE"]);

pub const NULL_WORD: SymbolId = 100;

pub static SQL_RESERVED: KeywordGroup = KeywordGroup::new(110, &[
    "ALL", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CALL", "CASE", "CAST",
    "COLLATE", "CROSS", "DEFAULT", "DELETE", "DESC", "DISTINCT", "ELSE", "END",
    "ESCAPE", "EXCEPT", "EXISTS", "FETCH", "FOR", "FROM", "FULL", "GROUP", "HAVING",
    "IN", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "LEFT", "LIKE",
    "LIMIT", "NATURAL", "NOT", "OFFSET", "ON", "OR", "ORDER", "OUTER", "RIGHT",
    "SELECT", "SET", "SOME", "THEN", "UNION", "UPDATE", "USING", "VALUES", "WHEN",
    "WHERE", "WINDOW", "WITH",
]);

/// Keywords that may also name columns, tables and aliases.
pub static SQL_SOFT: KeywordGroup = KeywordGroup::new(200, &[
    "CONFLICT", "CURRENT", "DAY", "DO", "EXCLUDE", "FILTER", "FIRST", "FOLLOWING",
    "HOUR", "INTERVAL", "KEY", "LAST", "MINUTE", "MONTH", "NEXT", "NOTHING", "NULLS",
    "ONLY", "OVER", "PARTITION", "PERCENT", "PRECEDING", "RANGE", "RECURSIVE", "ROW",
    "ROWS", "SECOND", "TIES", "TOP", "UNBOUNDED", "WEEK", "YEAR",
]);

/// Built-in function names.
pub static SQL_FUNCTIONS: KeywordGroup = KeywordGroup::new(300, &[
    "ABS", "AVG", "CEIL", "COALESCE", "CONCAT", "COUNT", "CURRENT_DATE", "CURRENT_TIME",
    "CURRENT_TIMESTAMP", "EXTRACT", "FLOOR", "GREATEST", "LEAST", "LENGTH", "LOWER",
    "MAX", "MIN", "NOW", "NULLIF", "POSITION", "REPLACE", "ROUND", "SUBSTRING", "SUM",
    "TRIM", "UPPER",
]);

/// Data type names.
pub static SQL_TYPES: KeywordGroup = KeywordGroup::new(400, &[
    "BIGINT", "BINARY", "BIT", "BLOB", "BOOL", "BOOLEAN", "BYTEA", "CHAR", "CHARACTER",
    "DATE", "DATETIME", "DECIMAL", "DOUBLE", "FLOAT", "INT", "INTEGER", "JSON", "JSONB",
    "JSONPATH", "NUMERIC", "PRECISION", "REAL", "SERIAL", "SIGNED", "SMALLINT", "TEXT",
    "TIME", "TIMESTAMP", "TIMESTAMPTZ", "TINYINT", "UNSIGNED", "UUID", "VARCHAR",
    "VARYING",
]);

pub static MYSQL_RESERVED: KeywordGroup = KeywordGroup::new(500, &[
    "CONVERT", "DIV", "DUPLICATE", "HIGH_PRIORITY", "IGNORE", "LOW_PRIORITY", "MOD",
    "REGEXP", "RLIKE", "SQL_CALC_FOUND_ROWS", "STRAIGHT_JOIN", "XOR",
]);

pub static MYSQL_FUNCTIONS: KeywordGroup = KeywordGroup::new(550, &[
    "CHAR_LENGTH", "DATE_ADD", "DATE_FORMAT", "DATE_SUB", "GROUP_CONCAT", "IF", "IFNULL",
    "LOCATE", "RAND", "STR_TO_DATE", "UNIX_TIMESTAMP",
]);

pub static POSTGRES_RESERVED: KeywordGroup = KeywordGroup::new(600, &[
    "ARRAY", "ILIKE", "LATERAL", "RETURNING", "SIMILAR",
]);

pub static POSTGRES_SOFT: KeywordGroup = KeywordGroup::new(650, &[
    "EXCLUDED", "ORDINALITY", "TO", "ZONE",
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlDialect {
    MySql,
    PostgreSql,
}

/// Grammar rules that reclassify tokens in the SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlRule {
    /// A keyword used as a column, table or alias name
    Identifier,
    /// Name after `.` in a qualified reference
    MemberName,
    /// Called function or procedure name
    FunctionName,
    /// Name or ordinal after `:` / `?`
    Parameter,
    /// Target of `::`, `CAST(.. AS ..)` or `CONVERT(..)`
    DataType,
    /// String operand of a pattern-matching operator
    RegexPattern,
}

/// Non-reserved words for `dialect`: usable wherever a name is expected.
pub fn is_soft_keyword(dialect: SqlDialect, symbol: SymbolId) -> bool {
    SQL_SOFT.contains(symbol)
        || SQL_FUNCTIONS.contains(symbol)
        || SQL_TYPES.contains(symbol)
        || match dialect {
            SqlDialect::MySql => MYSQL_FUNCTIONS.contains(symbol),
            SqlDialect::PostgreSql => POSTGRES_SOFT.contains(symbol),
        }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keyword_groups_are_disjoint() {
        let groups = [
            &SQL_LITERAL_WORDS,
            &SQL_RESERVED,
            &SQL_SOFT,
            &SQL_FUNCTIONS,
            &SQL_TYPES,
            &MYSQL_RESERVED,
            &MYSQL_FUNCTIONS,
            &POSTGRES_RESERVED,
            &POSTGRES_SOFT,
        ];
        let mut words = HashSet::new();
        for group in groups {
            for word in group.words {
                assert!(words.insert(*word), "{} is listed twice", word);
            }
        }
        for pair in groups.windows(2) {
            assert!(pair[0].last() < pair[1].first, "Group starting at {} overflows", pair[0].first);
        }
        assert_eq!(SQL_LITERAL_WORDS.word(NULL_WORD), Some("NULL"));
    }
}
