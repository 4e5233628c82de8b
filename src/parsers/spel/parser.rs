use super::*;
use crate::parsers::runtime::{Parsed, Recognizer, Token, Vocabulary};

/// Parses one SpEL expression (the text between `#{` and `}`).
pub fn parse(source: &str, tokens: &[Token], vocabulary: &Vocabulary) -> Parsed {
    let mut parser = SpelParser { p: Recognizer::new(source, tokens, vocabulary) };
    if !parser.p.at_eof() {
        parser.expression();
        while parser.p.eat(SEMICOLON).is_some() && !parser.p.at_eof() {
            parser.expression();
        }
    }
    parser.p.expect_eof();
    parser.p.finish()
}

struct SpelParser<'a> {
    p: Recognizer<'a>,
}

impl SpelParser<'_> {
    fn rule(&mut self, rule: SpelRule, token: usize) {
        self.p.rule(RuleKind::Spel(rule), token);
    }

    fn expression(&mut self) {
        if !self.p.enter() {
            return;
        }
        self.ternary();
        if self.p.eat(ASSIGN).is_some() {
            self.expression();
        }
        self.p.exit();
    }

    fn ternary(&mut self) {
        self.logical_or();
        if self.p.eat(QMARK).is_some() {
            self.expression();
            self.p.expect(COLON, "':'");
            self.expression();
        } else if self.p.eat(ELVIS).is_some() {
            self.expression();
        }
    }

    fn logical_or(&mut self) {
        self.logical_and();
        while self.p.at(SYMBOLIC_OR) || self.p.at_kw("OR") {
            self.p.consume();
            self.logical_and();
        }
    }

    fn logical_and(&mut self) {
        self.relational();
        while self.p.at(SYMBOLIC_AND) || self.p.at_kw("AND") {
            self.p.consume();
            self.relational();
        }
    }

    fn relational(&mut self) {
        self.sum();
        let relop = self.p.at_any(&[GT, GE, LT, LE, EQ, NE])
            || self.p.at_any_kw(&["GT", "GE", "LT", "LE", "EQ", "NE", "INSTANCEOF", "MATCHES", "BETWEEN"]);
        if relop {
            self.p.consume();
            self.sum();
        }
    }

    fn sum(&mut self) {
        self.product();
        while self.p.at_any(&[PLUS, MINUS]) {
            self.p.consume();
            self.product();
        }
    }

    fn product(&mut self) {
        self.power();
        while self.p.at_any(&[STAR, DIV, MOD]) || self.p.at_any_kw(&["DIV", "MOD"]) {
            self.p.consume();
            self.power();
        }
    }

    fn power(&mut self) {
        self.unary();
        if self.p.eat(POWER).is_some() {
            self.unary();
        }
    }

    fn unary(&mut self) {
        if self.p.at_any(&[NOT, MINUS, PLUS, INC, DEC]) || self.p.at_kw("NOT") {
            if !self.p.enter() {
                return;
            }
            self.p.consume();
            self.unary();
            self.p.exit();
            return;
        }
        self.start_node();
        self.nodes();
        if self.p.at_any(&[INC, DEC]) {
            self.p.consume();
        }
    }

    fn nodes(&mut self) {
        loop {
            if self.p.at_any(&[DOT, SAFE_NAVI]) {
                self.p.consume();
                self.dotted_node();
            } else if self.p.at(LSQUARE) {
                self.p.consume();
                self.expression();
                self.p.expect(RSQUARE, "']'");
            } else {
                break;
            }
        }
    }

    fn dotted_node(&mut self) {
        match self.p.la_symbol(0) {
            IDENTIFIER => self.method_or_property(true),
            HASH => self.function_or_var(),
            PROJECT | SELECT | SELECT_FIRST | SELECT_LAST => self.selection(),
            _ => self.p.mismatch("IDENTIFIER"),
        }
    }

    fn start_node(&mut self) {
        let symbol = self.p.la_symbol(0);
        match symbol {
            LPAREN => {
                self.p.consume();
                self.expression();
                self.p.expect(RPAREN, "')'");
            }
            INTEGER_LITERAL | REAL_LITERAL | STRING_LITERAL | PROPERTY_PLACEHOLDER => {
                self.p.consume();
            }
            IDENTIFIER => self.method_or_property(false),
            HASH => self.function_or_var(),
            BEAN_REF | FACTORY_BEAN_REF => self.bean_reference(),
            PROJECT | SELECT | SELECT_FIRST | SELECT_LAST => self.selection(),
            LCURLY => self.inline_list_or_map(),
            LSQUARE => self.input_parameter(),
            _ if self.p.at_any_kw(&["TRUE", "FALSE", "NULL"]) => {
                self.p.consume();
            }
            _ if self.p.at_kw("T") => self.type_reference(),
            _ if self.p.at_kw("NEW") => self.constructor_reference(),
            _ => {
                self.p.mismatch("an expression");
                if !self.p.at_any(&[RPAREN, RSQUARE, RCURLY, COMMA, COLON]) {
                    self.p.skip();
                }
            }
        }
    }

    /// `[0]` refers to a method argument by index.
    fn input_parameter(&mut self) {
        let first = self.p.consume();
        if self.p.at(INTEGER_LITERAL) && self.p.la_symbol(1) == RSQUARE {
            self.p.consume();
            let last = self.p.consume();
            self.p.rule_span(RuleKind::Spel(SpelRule::InputParameter), first, last);
        } else {
            self.expression();
            self.p.expect(RSQUARE, "']'");
        }
    }

    fn method_or_property(&mut self, dotted: bool) {
        let name = self.p.consume();
        if self.p.at(LPAREN) {
            self.rule(SpelRule::MethodName, name);
            self.method_args();
        } else if dotted {
            self.rule(SpelRule::PropertyName, name);
        }
    }

    /// `#var` or `#fn(args)`
    fn function_or_var(&mut self) {
        self.p.consume();
        let Some(name) = self.p.expect(IDENTIFIER, "IDENTIFIER") else { return };
        if self.p.at(LPAREN) {
            self.rule(SpelRule::FunctionName, name);
            self.method_args();
        }
    }

    fn method_args(&mut self) {
        self.p.expect(LPAREN, "'('");
        if !self.p.at(RPAREN) {
            self.args();
        }
        self.p.expect(RPAREN, "')'");
    }

    fn args(&mut self) {
        self.expression();
        while self.p.eat(COMMA).is_some() {
            self.expression();
        }
    }

    /// `![..]`, `?[..]`, `^[..]`, `$[..]`
    fn selection(&mut self) {
        self.p.consume();
        self.expression();
        self.p.expect(RSQUARE, "']'");
    }

    fn bean_reference(&mut self) {
        self.p.consume();
        if self.p.at_any(&[IDENTIFIER, STRING_LITERAL]) {
            let name = self.p.consume();
            self.rule(SpelRule::BeanReference, name);
        } else {
            self.p.mismatch("{IDENTIFIER, STRING_LITERAL}");
        }
    }

    /// `T(java.lang.Math)`
    fn type_reference(&mut self) {
        self.p.consume();
        self.p.expect(LPAREN, "'('");
        self.possibly_qualified_id();
        while self.p.at(LSQUARE) && self.p.la_symbol(1) == RSQUARE {
            self.p.consume();
            self.p.consume();
        }
        self.p.expect(RPAREN, "')'");
    }

    /// Returns the last segment of `a.b.C`.
    fn possibly_qualified_id(&mut self) -> Option<usize> {
        let mut segments = Vec::new();
        loop {
            match self.p.expect(IDENTIFIER, "IDENTIFIER") {
                Some(segment) => segments.push(segment),
                None => break,
            }
            if !(self.p.at(DOT) && self.p.la_symbol(1) == IDENTIFIER) {
                break;
            }
            self.p.consume();
        }
        let (&last, leading) = segments.split_last()?;
        for &segment in leading {
            self.rule(SpelRule::Namespace, segment);
        }
        self.rule(SpelRule::TypeName, last);
        Some(last)
    }

    /// `new a.b.C(args)` or `new int[4]{...}`
    fn constructor_reference(&mut self) {
        self.p.consume();
        let name = self.possibly_qualified_id();
        if self.p.at(LSQUARE) {
            while self.p.eat(LSQUARE).is_some() {
                if !self.p.at(RSQUARE) {
                    self.expression();
                }
                self.p.expect(RSQUARE, "']'");
            }
            if self.p.at(LCURLY) {
                self.inline_list_or_map();
            }
            return;
        }
        if let Some(name) = name {
            self.rule(SpelRule::ConstructorName, name);
        }
        self.method_args();
    }

    /// `{}`, `{:}`, `{a, b}` or `{k: v, ...}`
    fn inline_list_or_map(&mut self) {
        self.p.consume();
        if self.p.eat(RCURLY).is_some() {
            return;
        }
        if self.p.at(COLON) && self.p.la_symbol(1) == RCURLY {
            self.p.consume();
            self.p.consume();
            return;
        }
        loop {
            self.expression();
            if self.p.eat(COLON).is_some() {
                self.expression();
            }
            if self.p.eat(COMMA).is_none() {
                break;
            }
        }
        self.p.expect(RCURLY, "'}'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::runtime::ParseEvent;

    fn parse_text(source: &str) -> Parsed {
        let lexed = tokenize(source, vocabulary());
        parse(source, &lexed.tokens, vocabulary())
    }

    fn rules(source: &str) -> Vec<(SpelRule, String)> {
        let lexed = tokenize(source, vocabulary());
        let parsed = parse(source, &lexed.tokens, vocabulary());
        parsed
            .events
            .iter()
            .filter_map(|event| match event {
                ParseEvent::Rule { rule: RuleKind::Spel(rule), first, last } => {
                    let text = &source[lexed.tokens[*first].start..lexed.tokens[*last].stop];
                    Some((*rule, text.to_string()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_valid_expressions() {
        for source in [
            "someBean.someProperty != null ? someBean.someProperty : 'default'",
            "#root.name?.toUpperCase()",
            "T(java.lang.Math).random() * 100.0",
            "@myBean.compute(#p0, 'x') ?: {1, 2, 3}",
            "new java.util.Date()",
            "members.?[age > 18].![name]",
            "{name: 'x', tags: {}}",
            "[0] + 1",
            "${app.prefix:none} + 'suffix'",
            "!flag and count ge 2",
        ] {
            let parsed = parse_text(source);
            assert!(parsed.errors.is_empty(), "{}: {:?}", source, parsed.errors);
        }
    }

    #[test]
    fn test_method_and_property_roles() {
        assert_eq!(
            rules("a.b.c(1)"),
            vec![(SpelRule::PropertyName, "b".to_string()), (SpelRule::MethodName, "c".to_string())]
        );
    }

    #[test]
    fn test_constructor_name_follows_type_name() {
        let roles = rules("new foo.Bar()");
        assert_eq!(roles.len(), 3);
        assert_eq!(roles[0], (SpelRule::Namespace, "foo".to_string()));
        assert_eq!(roles[1], (SpelRule::TypeName, "Bar".to_string()));
        assert_eq!(roles[2], (SpelRule::ConstructorName, "Bar".to_string()), "Constructor wins as the later rule");
    }

    #[test]
    fn test_input_parameter_spans_brackets() {
        assert_eq!(rules("[1]"), vec![(SpelRule::InputParameter, "[1]".to_string())]);
    }

    #[test]
    fn test_unclosed_paren_is_reported() {
        let parsed = parse_text("foo(1");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].message, "missing ')' at '<EOF>'");
    }
}
