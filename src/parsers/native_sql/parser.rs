use super::{is_soft_keyword, SqlDialect, SqlRule};
use crate::parsers::lexicon::*;
use crate::parsers::runtime::{Parsed, Recognizer, Token, Vocabulary};
use crate::parsers::RuleKind;

/// Parses a `;`-separated list of SQL statements.
pub fn parse(source: &str, tokens: &[Token], vocabulary: &Vocabulary, dialect: SqlDialect) -> Parsed {
    let mut parser = SqlParser {
        p: Recognizer::new(source, tokens, vocabulary),
        dialect,
    };
    parser.script();
    parser.p.finish()
}

struct SqlParser<'a> {
    p: Recognizer<'a>,
    dialect: SqlDialect,
}

impl SqlParser<'_> {
    fn mysql(&self) -> bool {
        self.dialect == SqlDialect::MySql
    }

    fn postgres(&self) -> bool {
        self.dialect == SqlDialect::PostgreSql
    }

    fn rule(&mut self, rule: SqlRule, token: usize) {
        self.p.rule(RuleKind::Sql(rule), token);
    }

    fn script(&mut self) {
        loop {
            while self.p.eat(SEMICOLON).is_some() {}
            if self.p.at_eof() || self.p.halted() {
                break;
            }
            self.statement();
            if self.p.eat(SEMICOLON).is_none() {
                break;
            }
        }
        self.p.expect_eof();
    }

    fn statement(&mut self) {
        if self.p.at_kw("WITH") {
            self.with_clause();
        }
        if self.p.at_kw("SELECT") || self.p.at(LPAREN) {
            self.select_statement();
        } else if self.p.at_kw("INSERT") || (self.mysql() && self.p.at_kw("REPLACE")) {
            self.insert_statement();
        } else if self.p.at_kw("UPDATE") {
            self.update_statement();
        } else if self.p.at_kw("DELETE") {
            self.delete_statement();
        } else if self.p.at_kw("CALL") {
            self.call_statement();
        } else {
            self.p.mismatch("{'SELECT', 'INSERT', 'UPDATE', 'DELETE', 'CALL', 'WITH'}");
        }
    }

    // ----- names -----

    fn at_identifier(&self) -> bool {
        let symbol = self.p.la_symbol(0);
        symbol == IDENTIFIER || symbol == QUOTED_IDENTIFIER || is_soft_keyword(self.dialect, symbol)
    }

    fn at_word(&self) -> bool {
        self.at_identifier() || self.p.is_keyword(0)
    }

    /// Consumes a name, marking keywords used as names.
    fn identifier(&mut self) -> Option<usize> {
        if !self.at_identifier() {
            self.p.mismatch("IDENTIFIER");
            return None;
        }
        let keyword = self.p.is_keyword(0);
        let token = self.p.consume();
        if keyword {
            self.rule(SqlRule::Identifier, token);
        }
        Some(token)
    }

    /// `[{h-schema}] name ('.' name)*`
    fn qualified_name(&mut self) {
        self.p.eat(SCHEMA_PLACEHOLDER);
        self.identifier();
        self.member_chain();
    }

    fn member_chain(&mut self) {
        while self.p.at(DOT) {
            self.p.consume();
            if self.p.eat(STAR).is_some() {
                return;
            }
            if self.at_word() {
                let token = self.p.consume();
                self.rule(SqlRule::MemberName, token);
            } else {
                self.p.mismatch("IDENTIFIER");
                return;
            }
        }
    }

    fn optional_alias(&mut self) {
        if self.p.eat_kw("AS").is_some() {
            self.identifier();
        } else if self.at_identifier() && !self.at_clause_word() {
            self.identifier();
        }
    }

    /// Soft keywords that still end an item when they follow it.
    fn at_clause_word(&self) -> bool {
        self.p.at_any_kw(&["OVER", "FILTER", "ROWS", "RANGE", "NULLS", "FIRST", "NEXT", "ONLY", "DO"])
    }

    // ----- statements -----

    fn with_clause(&mut self) {
        self.p.expect_kw("WITH");
        self.p.eat_kw("RECURSIVE");
        loop {
            self.identifier();
            if self.p.eat(LPAREN).is_some() {
                self.name_list();
                self.p.expect(RPAREN, "')'");
            }
            self.p.expect_kw("AS");
            self.p.expect(LPAREN, "'('");
            self.statement();
            self.p.expect(RPAREN, "')'");
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
    }

    fn name_list(&mut self) {
        loop {
            self.identifier();
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
    }

    fn select_statement(&mut self) {
        if !self.p.enter() {
            return;
        }
        self.select_core();
        while self.p.at_any_kw(&["UNION", "INTERSECT", "EXCEPT"]) {
            self.p.consume();
            if self.p.eat_kw("ALL").is_none() {
                self.p.eat_kw("DISTINCT");
            }
            self.select_core();
        }
        if self.p.at_kw("ORDER") {
            self.order_by();
        }
        self.limit_clauses();
        if self.p.eat_kw("FOR").is_some() {
            self.p.expect_kw("UPDATE");
        }
        self.p.exit();
    }

    fn select_core(&mut self) {
        if self.p.eat(LPAREN).is_some() {
            self.select_statement();
            self.p.expect(RPAREN, "')'");
            return;
        }
        self.p.expect_kw("SELECT");
        if self.p.eat_kw("DISTINCT").is_none() {
            self.p.eat_kw("ALL");
        }
        if self.mysql() {
            while self.p.at_any_kw(&["HIGH_PRIORITY", "STRAIGHT_JOIN", "SQL_CALC_FOUND_ROWS"]) {
                self.p.consume();
            }
        }
        if self.p.at_kw("TOP") && matches!(self.p.la_symbol(1), INTEGER_LITERAL | LPAREN) {
            self.p.consume();
            self.primary();
        }
        loop {
            self.select_item();
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
        if self.p.eat_kw("INTO").is_some() {
            self.qualified_name();
        }
        if self.p.eat_kw("FROM").is_some() {
            self.table_references();
        }
        if self.p.eat_kw("WHERE").is_some() {
            self.expression();
        }
        if self.p.at_kw("GROUP") {
            self.p.consume();
            self.p.expect_kw("BY");
            self.expression_list();
        }
        if self.p.eat_kw("HAVING").is_some() {
            self.expression();
        }
        if self.p.eat_kw("WINDOW").is_some() {
            loop {
                self.identifier();
                self.p.expect_kw("AS");
                self.p.expect(LPAREN, "'('");
                self.window_spec();
                self.p.expect(RPAREN, "')'");
                if self.p.eat(COMMA).is_none() {
                    break;
                }
            }
        }
    }

    fn select_item(&mut self) {
        if self.p.eat(STAR).is_some() {
            return;
        }
        self.expression();
        self.optional_alias();
    }

    fn table_references(&mut self) {
        loop {
            self.table_reference();
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
    }

    fn table_reference(&mut self) {
        self.table_primary();
        while self.at_join() {
            self.join();
        }
    }

    fn table_primary(&mut self) {
        if self.postgres() {
            self.p.eat_kw("LATERAL");
            self.p.eat_kw("ONLY");
        }
        if self.p.at(LPAREN) {
            self.p.consume();
            if self.p.at_kw("SELECT") || self.p.at_kw("WITH") || self.p.at(LPAREN) {
                self.statement();
            } else {
                self.table_references();
            }
            self.p.expect(RPAREN, "')'");
        } else if self.p.at(EMBEDDED_EXPRESSION) {
            self.p.consume();
        } else {
            let function = self.at_word() && self.p.la_symbol(1) == LPAREN;
            if function {
                self.function_call();
            } else {
                self.qualified_name();
            }
        }
        self.optional_alias();
        if self.p.at(LPAREN) && self.postgres() {
            self.p.consume();
            self.name_list();
            self.p.expect(RPAREN, "')'");
        }
    }

    fn at_join(&self) -> bool {
        self.p.at_any_kw(&["JOIN", "LEFT", "RIGHT", "INNER", "FULL", "CROSS", "NATURAL"])
            || (self.mysql() && self.p.at_kw("STRAIGHT_JOIN"))
    }

    fn join(&mut self) {
        if self.mysql() && self.p.eat_kw("STRAIGHT_JOIN").is_some() {
            self.table_primary();
            if self.p.eat_kw("ON").is_some() {
                self.expression();
            }
            return;
        }
        self.p.eat_kw("NATURAL");
        if self.p.eat_kw("LEFT").is_some() || self.p.eat_kw("RIGHT").is_some() || self.p.eat_kw("FULL").is_some() {
            self.p.eat_kw("OUTER");
        } else if self.p.eat_kw("INNER").is_none() {
            self.p.eat_kw("CROSS");
        }
        self.p.expect_kw("JOIN");
        self.table_primary();
        if self.p.eat_kw("ON").is_some() {
            self.expression();
        } else if self.p.eat_kw("USING").is_some() {
            self.p.expect(LPAREN, "'('");
            self.name_list();
            self.p.expect(RPAREN, "')'");
        }
    }

    fn order_by(&mut self) {
        self.p.expect_kw("ORDER");
        self.p.expect_kw("BY");
        loop {
            self.expression();
            if self.p.eat_kw("ASC").is_none() {
                self.p.eat_kw("DESC");
            }
            if self.p.eat_kw("NULLS").is_some() && self.p.eat_kw("FIRST").is_none() {
                self.p.expect_kw("LAST");
            }
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
    }

    fn limit_clauses(&mut self) {
        if self.p.eat_kw("LIMIT").is_some() {
            if self.p.eat_kw("ALL").is_none() {
                self.additive();
            }
            if self.mysql() && self.p.eat(COMMA).is_some() {
                self.additive();
            }
        }
        if self.p.eat_kw("OFFSET").is_some() {
            self.additive();
            if self.p.eat_kw("ROWS").is_none() {
                self.p.eat_kw("ROW");
            }
        }
        if self.p.eat_kw("FETCH").is_some() {
            if self.p.eat_kw("FIRST").is_none() {
                self.p.expect_kw("NEXT");
            }
            if !self.p.at_kw("ROW") && !self.p.at_kw("ROWS") {
                self.additive();
            }
            if self.p.eat_kw("ROWS").is_none() {
                self.p.expect_kw("ROW");
            }
            if self.p.eat_kw("WITH").is_some() {
                self.p.expect_kw("TIES");
            } else {
                self.p.expect_kw("ONLY");
            }
        }
    }

    fn insert_statement(&mut self) {
        self.p.consume();
        if self.mysql() {
            while self.p.at_any_kw(&["LOW_PRIORITY", "HIGH_PRIORITY", "IGNORE"]) {
                self.p.consume();
            }
        }
        self.p.eat_kw("INTO");
        self.qualified_name();
        if self.postgres() && self.p.eat_kw("AS").is_some() {
            self.identifier();
        }
        if self.p.at(LPAREN) && !self.p.la_kw(1, "SELECT") {
            self.p.consume();
            self.name_list();
            self.p.expect(RPAREN, "')'");
        }
        if self.p.eat_kw("VALUES").is_some() {
            loop {
                self.p.expect(LPAREN, "'('");
                if !self.p.at(RPAREN) {
                    self.expression_list();
                }
                self.p.expect(RPAREN, "')'");
                if self.p.eat(COMMA).is_none() {
                    break;
                }
            }
        } else if self.mysql() && self.p.at_kw("SET") {
            self.p.consume();
            self.assignments();
        } else if self.p.eat_kw("DEFAULT").is_some() {
            self.p.expect_kw("VALUES");
        } else {
            self.select_statement();
        }
        if self.p.at_kw("ON") {
            self.p.consume();
            if self.mysql() {
                self.p.expect_kw("DUPLICATE");
                self.p.expect_kw("KEY");
                self.p.expect_kw("UPDATE");
                self.assignments();
            } else {
                self.p.expect_kw("CONFLICT");
                if self.p.eat(LPAREN).is_some() {
                    self.name_list();
                    self.p.expect(RPAREN, "')'");
                }
                self.p.expect_kw("DO");
                if self.p.eat_kw("NOTHING").is_none() {
                    self.p.expect_kw("UPDATE");
                    self.p.expect_kw("SET");
                    self.assignments();
                    if self.p.eat_kw("WHERE").is_some() {
                        self.expression();
                    }
                }
            }
        }
        self.returning();
    }

    fn assignments(&mut self) {
        loop {
            self.qualified_name();
            if !self.comparison_operator() {
                self.p.mismatch("'='");
            }
            if self.p.eat_kw("DEFAULT").is_none() {
                self.expression();
            }
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
    }

    fn update_statement(&mut self) {
        self.p.expect_kw("UPDATE");
        if self.mysql() {
            while self.p.at_any_kw(&["LOW_PRIORITY", "IGNORE"]) {
                self.p.consume();
            }
        }
        self.table_reference();
        self.p.expect_kw("SET");
        self.assignments();
        if self.postgres() && self.p.eat_kw("FROM").is_some() {
            self.table_references();
        }
        if self.p.eat_kw("WHERE").is_some() {
            self.expression();
        }
        if self.mysql() {
            if self.p.at_kw("ORDER") {
                self.order_by();
            }
            self.limit_clauses();
        }
        self.returning();
    }

    fn delete_statement(&mut self) {
        self.p.expect_kw("DELETE");
        if self.mysql() {
            while self.p.at_any_kw(&["LOW_PRIORITY", "IGNORE"]) {
                self.p.consume();
            }
        }
        self.p.expect_kw("FROM");
        self.qualified_name();
        self.optional_alias();
        if self.p.eat_kw("USING").is_some() {
            self.table_references();
        }
        if self.p.eat_kw("WHERE").is_some() {
            self.expression();
        }
        if self.mysql() {
            if self.p.at_kw("ORDER") {
                self.order_by();
            }
            self.limit_clauses();
        }
        self.returning();
    }

    fn returning(&mut self) {
        if self.postgres() && self.p.eat_kw("RETURNING").is_some() {
            loop {
                self.select_item();
                if self.p.eat(COMMA).is_none() {
                    break;
                }
            }
        }
    }

    fn call_statement(&mut self) {
        self.p.expect_kw("CALL");
        self.p.eat(SCHEMA_PLACEHOLDER);
        if !self.at_word() {
            self.p.mismatch("IDENTIFIER");
            return;
        }
        let mut name = self.p.consume();
        while self.p.at(DOT) && self.p.la_symbol(1) != LPAREN {
            self.p.consume();
            if !self.at_word() {
                self.p.mismatch("IDENTIFIER");
                return;
            }
            name = self.p.consume();
        }
        self.rule(SqlRule::FunctionName, name);
        if self.p.at(LPAREN) {
            self.arguments();
        }
    }

    // ----- expressions -----

    fn expression_list(&mut self) {
        loop {
            self.expression();
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
    }

    fn expression(&mut self) {
        if !self.p.enter() {
            return;
        }
        self.and_expression();
        loop {
            if self.p.eat_kw("OR").is_some() || (self.mysql() && self.p.eat_kw("XOR").is_some()) {
                self.and_expression();
            } else if self.mysql() && self.p.at(CONCAT) {
                self.p.consume();
                self.and_expression();
            } else {
                break;
            }
        }
        self.p.exit();
    }

    fn and_expression(&mut self) {
        self.not_expression();
        loop {
            if self.p.eat_kw("AND").is_some() {
                self.not_expression();
            } else if self.mysql() && self.p.at(AMP) && self.p.la_symbol(1) == AMP && self.p.adjacent(1) {
                self.p.consume();
                self.p.consume();
                self.not_expression();
            } else {
                break;
            }
        }
    }

    fn not_expression(&mut self) {
        if self.p.at_kw("NOT") || (self.mysql() && self.p.at(BANG) && self.p.la_symbol(1) != EQ) {
            self.p.consume();
            if !self.p.enter() {
                return;
            }
            self.not_expression();
            self.p.exit();
        } else {
            self.predicate();
        }
    }

    /// Matches one comparison operator. MySQL spells compound operators as
    /// adjacent single-character tokens.
    fn comparison_operator(&mut self) -> bool {
        match self.p.la_symbol(0) {
            EQ | NE | LE | GE | NULL_SAFE_EQ => {
                self.p.consume();
                true
            }
            LT => {
                let eq = self.p.la_symbol(1) == EQ && self.p.adjacent(1);
                let gt = self.p.la_symbol(1) == GT && self.p.adjacent(1);
                let spaceship = eq && self.p.la_symbol(2) == GT && self.p.adjacent(2);
                self.p.consume();
                if eq || gt {
                    self.p.consume();
                }
                if spaceship {
                    self.p.consume();
                }
                true
            }
            GT => {
                let eq = self.p.la_symbol(1) == EQ && self.p.adjacent(1);
                self.p.consume();
                if eq {
                    self.p.consume();
                }
                true
            }
            BANG if self.p.la_symbol(1) == EQ && self.p.adjacent(1) => {
                self.p.consume();
                self.p.consume();
                true
            }
            _ => false,
        }
    }

    fn predicate(&mut self) {
        if self.p.at_kw("EXISTS") {
            self.p.consume();
            self.subquery();
            return;
        }
        self.additive();
        loop {
            let negated = self.p.at_kw("NOT")
                && (self.p.la_kw(1, "IN") || self.p.la_kw(1, "BETWEEN") || self.p.la_kw(1, "LIKE")
                    || self.p.la_kw(1, "ILIKE") || self.p.la_kw(1, "SIMILAR")
                    || self.p.la_kw(1, "REGEXP") || self.p.la_kw(1, "RLIKE"));
            if negated {
                self.p.consume();
            }
            if self.comparison_operator() {
                if self.p.at_any_kw(&["ANY", "ALL", "SOME"]) {
                    self.p.consume();
                    self.subquery_or_list();
                } else {
                    self.additive();
                }
            } else if self.p.eat_kw("IN").is_some() {
                self.in_list();
            } else if self.p.eat_kw("BETWEEN").is_some() {
                self.additive();
                self.p.expect_kw("AND");
                self.additive();
            } else if self.p.at_kw("LIKE") || (self.postgres() && self.p.at_kw("ILIKE")) {
                self.p.consume();
                self.additive();
                if self.p.eat_kw("ESCAPE").is_some() {
                    self.primary();
                }
            } else if self.postgres() && self.p.at_kw("SIMILAR") {
                self.p.consume();
                self.p.expect_kw("TO");
                self.pattern();
            } else if self.mysql() && self.p.at_any_kw(&["REGEXP", "RLIKE"]) {
                self.p.consume();
                self.pattern();
            } else if self.postgres() && (self.p.at(TILDE) || self.p.at(REGEX_OP)) {
                self.p.consume();
                self.pattern();
            } else if self.p.eat_kw("IS").is_some() {
                self.p.eat_kw("NOT");
                if self.p.eat_kw("DISTINCT").is_some() {
                    self.p.expect_kw("FROM");
                    self.additive();
                } else if self.p.at_any_kw(&["NULL", "TRUE", "FALSE"]) {
                    self.p.consume();
                } else {
                    self.p.mismatch("{'NULL', 'TRUE', 'FALSE', 'DISTINCT'}");
                }
            } else {
                if negated {
                    self.p.mismatch("{'IN', 'BETWEEN', 'LIKE'}");
                }
                break;
            }
        }
    }

    /// Right operand of a pattern-matching operator.
    fn pattern(&mut self) {
        if self.p.at(STRING_LITERAL) {
            let token = self.p.consume();
            self.rule(SqlRule::RegexPattern, token);
        } else {
            self.additive();
        }
    }

    fn in_list(&mut self) {
        if self.at_parameter() {
            self.parameter();
            return;
        }
        self.subquery_or_list();
    }

    fn subquery_or_list(&mut self) {
        self.p.expect(LPAREN, "'('");
        if self.p.at_kw("SELECT") || self.p.at_kw("WITH") {
            self.statement();
        } else if !self.p.at(RPAREN) {
            self.expression_list();
        }
        self.p.expect(RPAREN, "')'");
    }

    fn subquery(&mut self) {
        self.p.expect(LPAREN, "'('");
        self.statement();
        self.p.expect(RPAREN, "')'");
    }

    fn additive(&mut self) {
        if !self.p.enter() {
            return;
        }
        self.multiplicative();
        loop {
            let symbol = self.p.la_symbol(0);
            let additive = matches!(symbol, PLUS | MINUS | PIPE | AMP | CARET)
                || (self.postgres()
                    && matches!(symbol, CONCAT | ARROW | DOUBLE_ARROW | CONTAINS | CONTAINED_BY | QUESTION));
            if !additive || (symbol == AMP && self.p.la_symbol(1) == AMP) {
                break;
            }
            self.p.consume();
            self.multiplicative();
        }
        self.p.exit();
    }

    fn multiplicative(&mut self) {
        self.unary();
        loop {
            if self.p.at(STAR) || self.p.at(SLASH) || self.p.at(PERCENT)
                || (self.mysql() && self.p.at_any_kw(&["DIV", "MOD"]))
            {
                self.p.consume();
                self.unary();
            } else {
                break;
            }
        }
    }

    fn unary(&mut self) {
        if self.p.at_any(&[MINUS, PLUS, TILDE]) {
            self.p.consume();
            if !self.p.enter() {
                return;
            }
            self.unary();
            self.p.exit();
        } else {
            self.postfix();
        }
    }

    fn postfix(&mut self) {
        self.primary();
        loop {
            if self.postgres() && self.p.at(DOUBLE_COLON) {
                self.p.consume();
                self.data_type();
            } else if self.p.eat_kw("COLLATE").is_some() {
                if self.p.at(STRING_LITERAL) {
                    self.p.consume();
                } else {
                    self.identifier();
                }
            } else if self.postgres() && self.p.at(LBRACKET) {
                self.p.consume();
                self.expression();
                if self.p.eat(COLON).is_some() {
                    self.expression();
                }
                self.p.expect(RBRACKET, "']'");
            } else {
                break;
            }
        }
    }

    fn data_type(&mut self) {
        if !self.at_word() {
            self.p.mismatch("IDENTIFIER");
            return;
        }
        let token = self.p.consume();
        self.rule(SqlRule::DataType, token);
        // DOUBLE PRECISION, CHARACTER VARYING
        while self.p.at_any_kw(&["PRECISION", "VARYING", "UNSIGNED", "SIGNED"]) {
            let token = self.p.consume();
            self.rule(SqlRule::DataType, token);
        }
        if self.p.at(LPAREN) {
            self.p.consume();
            self.expression_list();
            self.p.expect(RPAREN, "')'");
        }
        while self.p.at(LBRACKET) {
            self.p.consume();
            self.p.eat(INTEGER_LITERAL);
            self.p.expect(RBRACKET, "']'");
        }
    }

    fn at_parameter(&self) -> bool {
        match self.p.la_symbol(0) {
            COLON => {
                let next = self.p.la_symbol(1);
                self.p.adjacent(1)
                    && (next == IDENTIFIER || next == EMBEDDED_EXPRESSION || next == INTEGER_LITERAL || self.p.is_keyword(1))
            }
            QUESTION | POSITIONAL_PARAMETER | EMBEDDED_EXPRESSION => true,
            _ => false,
        }
    }

    fn parameter(&mut self) {
        match self.p.la_symbol(0) {
            COLON => {
                self.p.consume();
                if self.p.eat(EMBEDDED_EXPRESSION).is_some() {
                    return;
                }
                if self.at_word() || self.p.at(INTEGER_LITERAL) {
                    let token = self.p.consume();
                    self.rule(SqlRule::Parameter, token);
                } else {
                    self.p.mismatch("IDENTIFIER");
                }
            }
            QUESTION => {
                self.p.consume();
                if self.p.eat(EMBEDDED_EXPRESSION).is_some() {
                    return;
                }
                if self.p.at(INTEGER_LITERAL) && Some(self.p.la(0).start) == self.p.la_previous_stop() {
                    let token = self.p.consume();
                    self.rule(SqlRule::Parameter, token);
                }
            }
            POSITIONAL_PARAMETER | EMBEDDED_EXPRESSION => {
                self.p.consume();
            }
            _ => self.p.mismatch("PARAMETER"),
        }
    }

    fn primary(&mut self) {
        let symbol = self.p.la_symbol(0);
        match symbol {
            LPAREN => {
                self.p.consume();
                if self.p.at_kw("SELECT") || self.p.at_kw("WITH") {
                    self.statement();
                } else {
                    self.expression_list();
                }
                self.p.expect(RPAREN, "')'");
            }
            STRING_LITERAL | INTEGER_LITERAL | DECIMAL_LITERAL | HEX_LITERAL => {
                self.p.consume();
            }
            COLON | QUESTION | POSITIONAL_PARAMETER | EMBEDDED_EXPRESSION if self.at_parameter() => self.parameter(),
            SCHEMA_PLACEHOLDER => {
                self.p.consume();
                if self.at_word() && self.p.la_symbol(1) == LPAREN {
                    self.function_call();
                } else {
                    self.identifier();
                    self.member_chain();
                }
            }
            _ if self.p.at_any_kw(&["NULL", "TRUE", "FALSE", "DEFAULT"]) => {
                self.p.consume();
            }
            _ if self.p.at_kw("CASE") => self.case_expression(),
            _ if self.p.at_kw("EXISTS") => {
                self.p.consume();
                self.subquery();
            }
            _ if self.p.at_kw("CAST") && self.p.la_symbol(1) == LPAREN => {
                self.p.consume();
                self.p.consume();
                self.expression();
                self.p.expect_kw("AS");
                self.data_type();
                self.p.expect(RPAREN, "')'");
            }
            _ if self.mysql() && self.p.at_kw("CONVERT") && self.p.la_symbol(1) == LPAREN => {
                self.p.consume();
                self.p.consume();
                self.expression();
                if self.p.eat(COMMA).is_some() {
                    self.data_type();
                } else if self.p.eat_kw("USING").is_some() {
                    self.identifier();
                }
                self.p.expect(RPAREN, "')'");
            }
            _ if self.p.at_kw("INTERVAL") && !matches!(self.p.la_symbol(1), DOT | COMMA | RPAREN) => {
                self.p.consume();
                self.additive();
                if self.p.at_any_kw(&["YEAR", "MONTH", "WEEK", "DAY", "HOUR", "MINUTE", "SECOND"]) {
                    self.p.consume();
                }
            }
            _ if self.postgres() && self.p.at_kw("ARRAY") => {
                self.p.consume();
                if self.p.eat(LBRACKET).is_some() {
                    if !self.p.at(RBRACKET) {
                        self.expression_list();
                    }
                    self.p.expect(RBRACKET, "']'");
                } else {
                    self.subquery();
                }
            }
            _ if self.at_word() && self.p.la_symbol(1) == LPAREN && !self.p.at_any_kw(&["IN", "VALUES"]) => {
                self.function_call();
            }
            _ if self.at_niladic_function() => {
                self.p.consume();
            }
            _ if self.at_identifier() => {
                self.identifier();
                self.member_chain();
                if self.p.at(LPAREN) {
                    // schema.function(...)
                    self.arguments();
                }
            }
            _ => {
                let start = self.p.cursor();
                self.p.no_viable(start);
            }
        }
    }

    fn at_niladic_function(&self) -> bool {
        self.p.at_any_kw(&["CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP"])
    }

    /// `name(args) [FILTER (WHERE ..)] [OVER (..) | OVER name]`
    fn function_call(&mut self) {
        let extract = self.p.at_kw("EXTRACT");
        let name = self.p.consume();
        self.rule(SqlRule::FunctionName, name);
        if extract {
            self.p.expect(LPAREN, "'('");
            if self.at_word() {
                self.p.consume();
            }
            self.p.expect_kw("FROM");
            self.expression();
            self.p.expect(RPAREN, "')'");
        } else {
            self.arguments();
        }
        if self.p.at_kw("FILTER") && self.p.la_symbol(1) == LPAREN {
            self.p.consume();
            self.p.consume();
            self.p.expect_kw("WHERE");
            self.expression();
            self.p.expect(RPAREN, "')'");
        }
        if self.p.eat_kw("OVER").is_some() {
            if self.p.eat(LPAREN).is_some() {
                self.window_spec();
                self.p.expect(RPAREN, "')'");
            } else {
                self.identifier();
            }
        }
    }

    fn arguments(&mut self) {
        self.p.expect(LPAREN, "'('");
        if self.p.at(RPAREN) {
            self.p.consume();
            return;
        }
        if self.p.eat(STAR).is_none() {
            if self.p.eat_kw("DISTINCT").is_none() {
                self.p.eat_kw("ALL");
            }
            loop {
                self.expression();
                if self.p.eat_kw("AS").is_some() {
                    self.data_type();
                }
                if self.p.eat(COMMA).is_none() {
                    break;
                }
            }
            if self.p.at_kw("ORDER") {
                self.order_by();
            }
        }
        self.p.expect(RPAREN, "')'");
    }

    fn window_spec(&mut self) {
        if self.at_identifier() && !self.p.at_any_kw(&["PARTITION", "ORDER", "ROWS", "RANGE"]) {
            self.identifier();
        }
        if self.p.eat_kw("PARTITION").is_some() {
            self.p.expect_kw("BY");
            self.expression_list();
        }
        if self.p.at_kw("ORDER") {
            self.order_by();
        }
        if self.p.at_any_kw(&["ROWS", "RANGE"]) {
            self.p.consume();
            if self.p.eat_kw("BETWEEN").is_some() {
                self.frame_bound();
                self.p.expect_kw("AND");
                self.frame_bound();
            } else {
                self.frame_bound();
            }
        }
    }

    fn frame_bound(&mut self) {
        if self.p.eat_kw("CURRENT").is_some() {
            self.p.expect_kw("ROW");
            return;
        }
        if self.p.eat_kw("UNBOUNDED").is_none() {
            self.additive();
        }
        if self.p.eat_kw("PRECEDING").is_none() {
            self.p.expect_kw("FOLLOWING");
        }
    }

    fn case_expression(&mut self) {
        self.p.expect_kw("CASE");
        if !self.p.at_kw("WHEN") {
            self.expression();
        }
        if !self.p.at_kw("WHEN") {
            self.p.mismatch("'WHEN'");
        }
        while self.p.eat_kw("WHEN").is_some() {
            self.expression();
            self.p.expect_kw("THEN");
            self.expression();
        }
        if self.p.eat_kw("ELSE").is_some() {
            self.expression();
        }
        self.p.expect_kw("END");
    }
}
