use super::{is_soft_keyword, QueryDialect, QueryRule};
use crate::parsers::lexicon::*;
use crate::parsers::runtime::{Parsed, Recognizer, Token, Vocabulary};
use crate::parsers::RuleKind;

/// Parses a JPQL or HQL statement into a flat event stream.
pub fn parse(source: &str, tokens: &[Token], vocabulary: &Vocabulary, dialect: QueryDialect) -> Parsed {
    let mut parser = QueryParser {
        p: Recognizer::new(source, tokens, vocabulary),
        hql: dialect.is_hql(),
    };
    parser.statement();
    parser.p.finish()
}

struct QueryParser<'a> {
    p: Recognizer<'a>,
    hql: bool,
}

impl QueryParser<'_> {
    fn rule(&mut self, rule: QueryRule, token: usize) {
        self.p.rule(RuleKind::Query(rule), token);
    }

    fn statement(&mut self) {
        if self.p.at_kw("SELECT") || (self.hql && self.p.at_kw("FROM")) {
            self.select_statement();
        } else if self.p.at_kw("UPDATE") {
            self.update_statement();
        } else if self.p.at_kw("DELETE") {
            self.delete_statement();
        } else if self.hql && self.p.at_kw("INSERT") {
            self.insert_statement();
        } else if self.hql && self.p.at_kw("WITH") {
            self.with_clause();
            self.select_statement();
        } else if self.hql {
            self.p.mismatch("{'SELECT', 'FROM', 'UPDATE', 'DELETE', 'INSERT', 'WITH'}");
        } else {
            self.p.mismatch("{'SELECT', 'UPDATE', 'DELETE'}");
        }
        self.p.expect_eof();
    }

    /// `IDENTIFIER` or a non-reserved keyword.
    fn at_identifier(&self) -> bool {
        let symbol = self.p.la_symbol(0);
        symbol == IDENTIFIER || symbol == QUOTED_IDENTIFIER || is_soft_keyword(symbol)
    }

    /// Any word, reserved or not. Used after `.`, for entity names and for
    /// parameter names.
    fn at_word(&self) -> bool {
        self.at_identifier() || self.p.is_keyword(0)
    }

    fn identification_variable(&mut self) -> Option<usize> {
        if self.at_identifier() {
            let token = self.p.consume();
            self.rule(QueryRule::IdentificationVariable, token);
            Some(token)
        } else {
            self.p.mismatch("IDENTIFICATION_VARIABLE");
            None
        }
    }

    fn with_clause(&mut self) {
        self.p.expect_kw("WITH");
        loop {
            self.identification_variable();
            self.p.expect_kw("AS");
            self.p.expect(LPAREN, "'('");
            self.select_statement();
            self.p.expect(RPAREN, "')'");
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
    }

    fn select_statement(&mut self) {
        if !self.p.enter() {
            return;
        }
        self.query_specification();
        while self.hql && self.p.at_any_kw(&["UNION", "INTERSECT", "EXCEPT"]) {
            self.p.consume();
            if self.p.eat_kw("ALL").is_none() {
                self.p.eat_kw("DISTINCT");
            }
            self.query_specification();
        }
        if self.p.at_kw("ORDER") {
            self.order_by_clause();
        }
        if self.hql {
            self.limit_offset_fetch();
        }
        self.p.exit();
    }

    fn query_specification(&mut self) {
        if self.p.at_kw("SELECT") {
            self.select_clause();
            if self.p.at_kw("FROM") {
                self.from_clause();
            } else if !self.hql {
                self.p.expect_kw("FROM");
            }
        } else if self.hql && self.p.at_kw("FROM") {
            self.from_clause();
            if self.p.at_kw("SELECT") {
                self.select_clause();
            }
        } else {
            self.p.mismatch("'SELECT'");
            return;
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
    }

    fn select_clause(&mut self) {
        self.p.expect_kw("SELECT");
        self.p.eat_kw("DISTINCT");
        loop {
            self.select_item();
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
    }

    fn select_item(&mut self) {
        if self.p.at_kw("NEW") {
            self.constructor_expression();
        } else if self.p.at_kw("OBJECT") && self.p.la_symbol(1) == LPAREN {
            self.p.consume();
            self.p.consume();
            self.identification_variable();
            self.p.expect(RPAREN, "')'");
        } else {
            self.expression();
        }
        if self.p.eat_kw("AS").is_some() {
            self.identification_variable();
        } else if self.at_identifier() {
            let token = self.p.consume();
            self.rule(QueryRule::IdentificationVariable, token);
        }
    }

    fn constructor_expression(&mut self) {
        self.p.expect_kw("NEW");
        self.qualified_name(QueryRule::ConstructorName);
        self.p.expect(LPAREN, "'('");
        if !self.p.at(RPAREN) {
            loop {
                self.select_item();
                if self.p.eat(COMMA).is_none() {
                    break;
                }
            }
        }
        self.p.expect(RPAREN, "')'");
    }

    /// `word ('.' word)*` where every segment gets `rule`.
    fn qualified_name(&mut self, rule: QueryRule) {
        if !self.at_word() {
            self.p.mismatch("IDENTIFIER");
            return;
        }
        let token = self.p.consume();
        self.rule(rule, token);
        while self.p.at(DOT) {
            self.p.consume();
            if !self.at_word() {
                self.p.mismatch("IDENTIFIER");
                return;
            }
            let token = self.p.consume();
            self.rule(rule, token);
        }
    }

    fn from_clause(&mut self) {
        self.p.expect_kw("FROM");
        loop {
            self.variable_declaration();
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
    }

    fn variable_declaration(&mut self) {
        if !self.hql && self.p.at_kw("IN") && self.p.la_symbol(1) == LPAREN {
            // Collection member declaration: IN (o.items) AS i
            self.p.consume();
            self.p.consume();
            self.path_expression();
            self.p.expect(RPAREN, "')'");
            self.p.eat_kw("AS");
            self.identification_variable();
            return;
        }
        if self.hql && self.p.at(LPAREN) {
            self.p.consume();
            self.select_statement();
            self.p.expect(RPAREN, "')'");
        } else {
            self.qualified_name(QueryRule::EntityName);
        }
        self.alias(!self.hql);
        while self.at_join() {
            self.join();
        }
    }

    /// Optional `[AS] alias`. When `required`, a missing alias is reported.
    fn alias(&mut self, required: bool) {
        let start = self.p.cursor();
        if self.p.eat_kw("AS").is_some() {
            self.identification_variable();
        } else if self.at_identifier() {
            let token = self.p.consume();
            self.rule(QueryRule::IdentificationVariable, token);
        } else if required {
            self.p.no_viable(start);
        }
    }

    fn at_join(&self) -> bool {
        self.p.at_any_kw(&["JOIN", "LEFT", "INNER"])
            || (self.hql && self.p.at_any_kw(&["RIGHT", "FULL", "CROSS"]))
    }

    fn join(&mut self) {
        if self.p.eat_kw("LEFT").is_some() || (self.hql && (self.p.eat_kw("RIGHT").is_some() || self.p.eat_kw("FULL").is_some())) {
            self.p.eat_kw("OUTER");
        } else if self.p.eat_kw("INNER").is_none() && self.hql {
            self.p.eat_kw("CROSS");
        }
        self.p.expect_kw("JOIN");
        let fetch = self.p.eat_kw("FETCH").is_some();

        let start = self.p.cursor();
        if self.p.at_kw("TREAT") && self.p.la_symbol(1) == LPAREN {
            self.treat_expression();
        } else if self.hql && self.at_word() && self.p.la_symbol(1) != DOT {
            // Entity join: JOIN Pet p ON ...
            self.qualified_name(QueryRule::EntityName);
        } else {
            self.path_expression();
        }

        if self.p.eat_kw("AS").is_some() {
            self.identification_variable();
        } else if self.at_identifier() {
            let token = self.p.consume();
            self.rule(QueryRule::IdentificationVariable, token);
        } else if !fetch && !self.hql {
            self.p.no_viable(start);
        }

        if self.p.eat_kw("ON").is_some() || (self.hql && self.p.eat_kw("WITH").is_some()) {
            self.expression();
        }
    }

    fn treat_expression(&mut self) {
        self.p.consume();
        self.p.expect(LPAREN, "'('");
        self.path_expression();
        self.p.expect_kw("AS");
        self.qualified_name(QueryRule::EntityName);
        self.p.expect(RPAREN, "')'");
    }

    fn order_by_clause(&mut self) {
        self.p.expect_kw("ORDER");
        self.p.expect_kw("BY");
        loop {
            self.expression();
            if self.p.eat_kw("ASC").is_none() {
                self.p.eat_kw("DESC");
            }
            if self.hql && self.p.eat_kw("NULLS").is_some() && self.p.eat_kw("FIRST").is_none() {
                self.p.expect_kw("LAST");
            }
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
    }

    fn limit_offset_fetch(&mut self) {
        if self.p.eat_kw("LIMIT").is_some() {
            self.additive();
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
            self.additive();
            self.p.eat_kw("PERCENT");
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

    fn update_statement(&mut self) {
        self.p.expect_kw("UPDATE");
        self.qualified_name(QueryRule::EntityName);
        self.alias(false);
        self.p.expect_kw("SET");
        loop {
            self.path_expression();
            self.p.expect(EQ, "'='");
            self.expression();
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
        if self.p.eat_kw("WHERE").is_some() {
            self.expression();
        }
    }

    fn delete_statement(&mut self) {
        self.p.expect_kw("DELETE");
        if self.hql {
            self.p.eat_kw("FROM");
        } else {
            self.p.expect_kw("FROM");
        }
        self.qualified_name(QueryRule::EntityName);
        self.alias(false);
        if self.p.eat_kw("WHERE").is_some() {
            self.expression();
        }
    }

    fn insert_statement(&mut self) {
        self.p.expect_kw("INSERT");
        self.p.expect_kw("INTO");
        self.qualified_name(QueryRule::EntityName);
        if self.p.eat(LPAREN).is_some() {
            loop {
                self.path_expression();
                if self.p.eat(COMMA).is_none() {
                    break;
                }
            }
            self.p.expect(RPAREN, "')'");
        }
        if self.p.eat_kw("VALUES").is_some() {
            loop {
                self.p.expect(LPAREN, "'('");
                self.expression_list();
                self.p.expect(RPAREN, "')'");
                if self.p.eat(COMMA).is_none() {
                    break;
                }
            }
        } else {
            self.select_statement();
        }
    }

    fn expression_list(&mut self) {
        loop {
            self.expression();
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
    }

    /// Head variable followed by navigated fields: `o.address.city`.
    fn path_expression(&mut self) {
        if self.at_identifier() {
            let token = self.p.consume();
            self.rule(QueryRule::IdentificationVariable, token);
        } else {
            self.p.mismatch("IDENTIFICATION_VARIABLE");
            return;
        }
        self.navigation();
    }

    fn navigation(&mut self) {
        while self.p.at(DOT) {
            self.p.consume();
            if self.at_word() {
                let token = self.p.consume();
                self.rule(QueryRule::StateField, token);
            } else {
                self.p.mismatch("IDENTIFIER");
                return;
            }
        }
    }

    fn expression(&mut self) {
        if !self.p.enter() {
            return;
        }
        self.and_expression();
        while self.p.eat_kw("OR").is_some() {
            self.and_expression();
        }
        self.p.exit();
    }

    fn and_expression(&mut self) {
        self.not_expression();
        while self.p.eat_kw("AND").is_some() {
            self.not_expression();
        }
    }

    fn not_expression(&mut self) {
        if self.p.at_kw("NOT") && !self.p.la_kw(1, "IN") {
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

    fn predicate(&mut self) {
        if self.p.at_kw("EXISTS") {
            self.p.consume();
            self.subquery();
            return;
        }
        let compares_type = self.p.at_kw("TYPE") && self.p.la_symbol(1) == LPAREN;
        self.additive();

        let negated = self.p.at_kw("NOT")
            && (self.p.la_kw(1, "BETWEEN") || self.p.la_kw(1, "LIKE") || self.p.la_kw(1, "IN")
                || self.p.la_kw(1, "MEMBER") || self.p.la_kw(1, "ILIKE"));
        if negated {
            self.p.consume();
        }

        if self.p.at_any(&[EQ, NE, LT, LE, GT, GE]) {
            self.p.consume();
            if self.p.at_any_kw(&["ANY", "ALL", "SOME"]) {
                self.p.consume();
                self.subquery();
            } else if compares_type && self.at_entity_literal() {
                let token = self.p.consume();
                self.rule(QueryRule::EntityTypeLiteral, token);
            } else {
                self.additive();
            }
        } else if self.p.eat_kw("BETWEEN").is_some() {
            self.additive();
            self.p.expect_kw("AND");
            self.additive();
        } else if self.p.at_kw("LIKE") || (self.hql && self.p.at_kw("ILIKE")) {
            self.p.consume();
            self.like_pattern();
            if self.p.eat_kw("ESCAPE").is_some() {
                self.primary();
            }
        } else if self.p.eat_kw("IN").is_some() {
            self.in_list(compares_type);
        } else if self.p.eat_kw("IS").is_some() {
            self.p.eat_kw("NOT");
            if self.p.eat_kw("NULL").is_none() && self.p.eat_kw("EMPTY").is_none() {
                if self.hql && (self.p.eat_kw("TRUE").is_some() || self.p.eat_kw("FALSE").is_some()) {
                    return;
                }
                if self.hql && self.p.eat_kw("DISTINCT").is_some() {
                    self.p.expect_kw("FROM");
                    self.additive();
                    return;
                }
                self.p.mismatch("{'NULL', 'EMPTY'}");
            }
        } else if self.p.eat_kw("MEMBER").is_some() {
            self.p.eat_kw("OF");
            self.path_expression();
        } else if negated {
            self.p.mismatch("{'BETWEEN', 'LIKE', 'IN', 'MEMBER'}");
        }
    }

    fn at_entity_literal(&self) -> bool {
        self.at_identifier() && !matches!(self.p.la_symbol(1), DOT | LPAREN)
    }

    /// LIKE operand. Accepts the `%:name%` wildcard decoration around a
    /// parameter that repository queries commonly use.
    fn like_pattern(&mut self) {
        let decorated = self.p.at(PERCENT) || self.at_parameter();
        if !decorated {
            self.additive();
            return;
        }
        self.p.eat(PERCENT);
        self.parameter();
        self.p.eat(PERCENT);
    }

    fn in_list(&mut self, compares_type: bool) {
        if self.at_parameter() {
            self.parameter();
            return;
        }
        self.p.expect(LPAREN, "'('");
        if self.p.at_kw("SELECT") {
            self.select_statement();
        } else {
            loop {
                if compares_type && self.at_entity_literal() {
                    let token = self.p.consume();
                    self.rule(QueryRule::EntityTypeLiteral, token);
                } else {
                    self.additive();
                }
                if self.p.eat(COMMA).is_none() {
                    break;
                }
            }
        }
        self.p.expect(RPAREN, "')'");
    }

    fn subquery(&mut self) {
        self.p.expect(LPAREN, "'('");
        self.select_statement();
        self.p.expect(RPAREN, "')'");
    }

    fn additive(&mut self) {
        if !self.p.enter() {
            return;
        }
        self.multiplicative();
        loop {
            if self.p.at(PLUS) || self.p.at(MINUS) || (self.hql && self.p.at(CONCAT)) {
                self.p.consume();
                self.multiplicative();
            } else {
                break;
            }
        }
        self.p.exit();
    }

    fn multiplicative(&mut self) {
        self.unary();
        loop {
            if self.p.at(STAR) || self.p.at(SLASH) || (self.hql && self.p.at(PERCENT) && self.operand_follows()) {
                self.p.consume();
                self.unary();
            } else {
                break;
            }
        }
    }

    /// A trailing `%` after an operand is a LIKE wildcard, not modulo.
    fn operand_follows(&self) -> bool {
        let next = self.p.la_symbol(1);
        next == IDENTIFIER || next == INTEGER_LITERAL || next == DECIMAL_LITERAL || next == LPAREN
    }

    fn unary(&mut self) {
        if self.p.at(PLUS) || self.p.at(MINUS) {
            self.p.consume();
            if !self.p.enter() {
                return;
            }
            self.unary();
            self.p.exit();
        } else {
            self.primary();
        }
    }

    fn at_parameter(&self) -> bool {
        match self.p.la_symbol(0) {
            COLON => {
                let next = self.p.la_symbol(1);
                next == EMBEDDED_EXPRESSION || next == IDENTIFIER || self.p.is_keyword(1) || is_soft_keyword(next)
            }
            QUESTION | EMBEDDED_EXPRESSION => true,
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
                if self.at_word() {
                    let token = self.p.consume();
                    self.rule(QueryRule::InputParameter, token);
                } else {
                    self.p.mismatch("IDENTIFIER");
                }
            }
            QUESTION => {
                self.p.consume();
                if self.p.eat(EMBEDDED_EXPRESSION).is_some() {
                    return;
                }
                if let Some(token) = self.p.eat(INTEGER_LITERAL) {
                    self.rule(QueryRule::InputParameter, token);
                }
            }
            EMBEDDED_EXPRESSION => {
                self.p.consume();
            }
            _ => self.p.mismatch("INPUT_PARAMETER"),
        }
    }

    fn primary(&mut self) {
        let symbol = self.p.la_symbol(0);
        match symbol {
            LPAREN => {
                self.p.consume();
                if self.p.at_kw("SELECT") {
                    self.select_statement();
                } else {
                    self.expression();
                    while self.hql && self.p.eat(COMMA).is_some() {
                        self.expression();
                    }
                }
                self.p.expect(RPAREN, "')'");
            }
            STRING_LITERAL | INTEGER_LITERAL | DECIMAL_LITERAL | LONG_LITERAL | FLOAT_LITERAL
            | HEX_LITERAL | JAVA_STRING_LITERAL => {
                self.p.consume();
            }
            COLON | QUESTION | EMBEDDED_EXPRESSION => self.parameter(),
            _ if self.p.at_any_kw(&["TRUE", "FALSE", "NULL"]) => {
                self.p.consume();
            }
            _ if self.p.at_kw("CASE") => self.case_expression(),
            _ if self.p.at_kw("NEW") && self.hql => self.constructor_expression(),
            _ if self.p.at_any_kw(&["CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP"]) => {
                self.p.consume();
            }
            _ if self.p.at_kw("TREAT") && self.p.la_symbol(1) == LPAREN => {
                self.treat_expression();
                self.navigation();
            }
            _ if self.p.is_keyword(0) && is_soft_keyword(symbol) && self.p.la_symbol(1) == LPAREN => {
                self.function_call();
                self.navigation();
            }
            IDENTIFIER if self.p.la_symbol(1) == LPAREN => {
                if self.hql {
                    let token = self.p.consume();
                    self.rule(QueryRule::FunctionName, token);
                    self.arguments();
                } else {
                    let start = self.p.cursor();
                    self.p.consume();
                    self.p.no_viable(start);
                }
            }
            _ if self.at_identifier() => self.path_expression(),
            _ => {
                let start = self.p.cursor();
                self.p.no_viable(start);
            }
        }
    }

    /// Built-in function whose name is a keyword.
    fn function_call(&mut self) {
        let name = self.p.vocabulary().word(self.p.la_symbol(0)).unwrap_or_default();
        self.p.consume();
        match name {
            "TRIM" => {
                self.p.expect(LPAREN, "'('");
                self.p.eat_kw("LEADING")
                    .or_else(|| self.p.eat_kw("TRAILING"))
                    .or_else(|| self.p.eat_kw("BOTH"));
                if !self.p.at_kw("FROM") {
                    self.additive();
                }
                if self.p.eat_kw("FROM").is_some() {
                    self.additive();
                }
                self.p.expect(RPAREN, "')'");
            }
            "CAST" => {
                self.p.expect(LPAREN, "'('");
                self.additive();
                self.p.expect_kw("AS");
                if self.at_word() {
                    let token = self.p.consume();
                    self.rule(QueryRule::CastTarget, token);
                    if self.p.eat(LPAREN).is_some() {
                        self.expression_list();
                        self.p.expect(RPAREN, "')'");
                    }
                } else {
                    self.p.mismatch("IDENTIFIER");
                }
                self.p.expect(RPAREN, "')'");
            }
            "EXTRACT" => {
                self.p.expect(LPAREN, "'('");
                if self.at_word() {
                    self.p.consume();
                }
                self.p.expect_kw("FROM");
                self.additive();
                self.p.expect(RPAREN, "')'");
            }
            "TYPE" | "KEY" | "VALUE" | "ENTRY" => {
                self.p.expect(LPAREN, "'('");
                self.path_expression();
                self.p.expect(RPAREN, "')'");
            }
            "FUNCTION" => {
                self.p.expect(LPAREN, "'('");
                self.p.expect(STRING_LITERAL, "STRING");
                while self.p.eat(COMMA).is_some() {
                    self.expression();
                }
                self.p.expect(RPAREN, "')'");
            }
            _ => self.arguments(),
        }
    }

    fn arguments(&mut self) {
        self.p.expect(LPAREN, "'('");
        self.p.eat_kw("DISTINCT");
        if self.p.at(STAR) {
            self.p.consume();
        } else if !self.p.at(RPAREN) {
            self.expression_list();
        }
        self.p.expect(RPAREN, "')'");
    }

    fn case_expression(&mut self) {
        self.p.expect_kw("CASE");
        if !self.p.at_kw("WHEN") {
            self.additive();
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

#[cfg(test)]
mod tests {
    use crate::parsers::{hql, jpql};

    fn jpql_errors(source: &str) -> Vec<String> {
        let lexed = super::super::tokenize(source, jpql::vocabulary());
        let parsed = super::parse(source, &lexed.tokens, jpql::vocabulary(), super::QueryDialect::Jpql);
        parsed.errors.into_iter().map(|e| e.message).collect()
    }

    fn hql_errors(source: &str) -> Vec<String> {
        let lexed = super::super::tokenize(source, hql::vocabulary());
        let parsed = super::parse(source, &lexed.tokens, hql::vocabulary(), super::QueryDialect::Hql);
        parsed.errors.into_iter().map(|e| e.message).collect()
    }

    #[test]
    fn test_valid_jpql_statements() {
        for query in [
            "SELECT ptype FROM PetType ptype ORDER BY ptype.name",
            "SELECT o FROM Order o WHERE o.id = ?1",
            "SELECT DISTINCT o FROM Owner o LEFT JOIN FETCH o.pets WHERE o.lastName LIKE :lastName%",
            "SELECT NEW com.example.Dto(o.id, o.name) FROM Owner o",
            "UPDATE Owner o SET o.name = :name WHERE o.id = :id",
            "DELETE FROM Owner o WHERE o.id IN :ids",
            "SELECT COUNT(o) FROM Owner o GROUP BY o.city HAVING COUNT(o) > 1",
            "SELECT e FROM Employee e WHERE TYPE(e) IN (Exempt, Contractor)",
            "SELECT o FROM Owner o WHERE EXISTS (SELECT p FROM Pet p WHERE p.owner = o)",
            "SELECT o FROM Owner o WHERE o.name = :#{#owner.name}",
            "SELECT CASE WHEN o.age > 18 THEN 'adult' ELSE 'minor' END FROM Owner o",
        ] {
            assert_eq!(jpql_errors(query), Vec::<String>::new(), "Unexpected errors for {}", query);
        }
    }

    #[test]
    fn test_jpql_join_requires_alias() {
        let errors = jpql_errors("SELECT DISTINCT owner FROM Owner owner left join  owner.pets WHERE owner.lastName LIKE :lastName%");
        assert_eq!(errors, vec!["no viable alternative at input 'owner.petsWHERE'".to_string()]);
    }

    #[test]
    fn test_hql_join_alias_is_optional() {
        let errors = hql_errors("SELECT DISTINCT owner FROM Owner owner left join  owner.pets WHERE owner.lastName LIKE :lastName%");
        assert!(errors.is_empty(), "HQL should accept join without alias: {:?}", errors);
    }

    #[test]
    fn test_hql_extensions() {
        for query in [
            "FROM Owner",
            "SELECT o FROM Owner o ORDER BY o.name NULLS LAST LIMIT 10 OFFSET 5",
            "SELECT upper(o.name) || '!' FROM Owner o",
            "SELECT CAST(o.id AS String) FROM Owner o",
            "INSERT INTO Owner (name) VALUES ('x')",
        ] {
            assert_eq!(hql_errors(query), Vec::<String>::new(), "Unexpected errors for {}", query);
        }
    }

    #[test]
    fn test_mismatched_statement_start() {
        let errors = hql_errors("SELECTX ptype FROM PetType ptype ORDER BY ptype.name");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("mismatched input 'SELECTX'"), "{}", errors[0]);
    }

    #[test]
    fn test_stray_trailing_comma() {
        let errors = jpql_errors("select o from Order o where o.id = ?1,");
        assert_eq!(errors, vec!["extraneous input ',' expecting <EOF>".to_string()]);
    }
}
