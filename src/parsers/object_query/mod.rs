//! Object-query family: JPQL and its HQL superset
//!
//! Both dialects share one lexer and one recursive-descent parser. The
//! dialect decides the vocabulary (HQL adds two keyword groups) and how
//! strict the parser is about aliases, functions and clauses.

mod lexer;
mod parser;

pub use lexer::tokenize;
pub use parser::parse;

use super::runtime::{KeywordGroup, SymbolId};

/// Reserved words that end identifiers and clauses.
pub static QUERY_RESERVED: KeywordGroup = KeywordGroup::new(100, &[
    "ALL", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "DELETE", "DESC",
    "DISTINCT", "ELSE", "EMPTY", "END", "ESCAPE", "EXISTS", "FALSE", "FETCH", "FROM",
    "GROUP", "HAVING", "IN", "INNER", "IS", "JOIN", "LEFT", "LIKE", "MEMBER", "NEW",
    "NOT", "NULL", "OF", "ON", "OR", "ORDER", "OUTER", "SELECT", "SET", "SOME", "THEN",
    "TRUE", "UPDATE", "WHEN", "WHERE",
]);

/// Function names and other words that may still be used as identifiers.
pub static QUERY_FUNCTIONS: KeywordGroup = KeywordGroup::new(200, &[
    "ABS", "AVG", "BOTH", "CEILING", "COALESCE", "CONCAT", "COUNT", "CURRENT_DATE",
    "CURRENT_TIME", "CURRENT_TIMESTAMP", "ENTRY", "EXP", "FLOOR", "FUNCTION", "INDEX",
    "KEY", "LEADING", "LENGTH", "LN", "LOCATE", "LOWER", "MAX", "MIN", "MOD", "NULLIF",
    "OBJECT", "POWER", "ROUND", "SIGN", "SIZE", "SQRT", "SUBSTRING", "SUM", "TRAILING",
    "TREAT", "TRIM", "TYPE", "UPPER", "VALUE",
]);

/// Reserved words only HQL knows.
pub static HQL_RESERVED: KeywordGroup = KeywordGroup::new(300, &[
    "CROSS", "EXCEPT", "FULL", "ILIKE", "INSERT", "INTERSECT", "INTO", "LIMIT",
    "OFFSET", "RIGHT", "UNION", "VALUES", "WITH",
]);

/// Non-reserved HQL words.
pub static HQL_SOFT: KeywordGroup = KeywordGroup::new(400, &[
    "CAST", "DAY", "ELEMENTS", "EXTRACT", "FIRST", "FORMAT", "HOUR", "INDICES", "LAST",
    "LISTAGG", "MINUTE", "MONTH", "NEXT", "NULLS", "ONLY", "PERCENT", "ROW", "ROWS",
    "SECOND", "STR", "TIES", "YEAR",
]);

/// The two object-query dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryDialect {
    /// Plain JPQL
    Jpql,
    /// Hibernate's superset
    Hql,
}

impl QueryDialect {
    pub fn is_hql(self) -> bool {
        self == QueryDialect::Hql
    }
}

/// Grammar rules that reclassify tokens in the object-query dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryRule {
    /// Segment of an entity name (`FROM Owner o`)
    EntityName,
    /// Range variable, join alias or result variable
    IdentificationVariable,
    /// Field navigated from a path (`o.name`)
    StateField,
    /// Name or ordinal of `:name` / `?1`
    InputParameter,
    /// Entity literal compared against `TYPE(x)`
    EntityTypeLiteral,
    /// Segment of a `NEW a.b.Dto(...)` class name
    ConstructorName,
    /// Name of a non-built-in function call
    FunctionName,
    /// Target type of `CAST(x AS T)`
    CastTarget,
}

/// Words that may appear wherever an identifier is expected.
pub fn is_soft_keyword(symbol: SymbolId) -> bool {
    QUERY_FUNCTIONS.contains(symbol) || HQL_SOFT.contains(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keyword_groups_do_not_overlap() {
        let groups = [&QUERY_RESERVED, &QUERY_FUNCTIONS, &HQL_RESERVED, &HQL_SOFT];
        let mut seen = HashSet::new();
        for group in groups {
            for word in group.words {
                assert!(seen.insert(*word), "Keyword {} appears in two groups", word);
            }
        }
        for pair in groups.windows(2) {
            assert!(pair[0].last() < pair[1].first, "Symbol ranges must not overlap");
        }
    }
}
