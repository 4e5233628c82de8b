use crate::parsers::lexicon::*;
use crate::parsers::runtime::{is_ident_part, is_ident_start, Lexed, Mark, Scanner, SymbolId, Vocabulary};

/// Lexical differences between the SQL dialects.
#[derive(Debug, Clone, Copy)]
pub struct SqlLexerOptions {
    /// `` `name` `` quotes identifiers
    pub backtick_identifiers: bool,
    /// `"..."` is a string rather than an identifier
    pub double_quoted_strings: bool,
    /// `#` starts a line comment (unless it opens `#{`)
    pub hash_comments: bool,
    pub backslash_escapes: bool,
    /// `<=`, `>=`, `<>`, `!=` lex as one token. MySQL leaves them split and
    /// the parser joins adjacent pieces.
    pub compound_comparisons: bool,
    /// `$1` parameters and `$tag$...$tag$` strings
    pub dollar_syntax: bool,
}

impl SqlLexerOptions {
    pub const MYSQL: SqlLexerOptions = SqlLexerOptions {
        backtick_identifiers: true,
        double_quoted_strings: true,
        hash_comments: true,
        backslash_escapes: true,
        compound_comparisons: false,
        dollar_syntax: false,
    };

    pub const POSTGRESQL: SqlLexerOptions = SqlLexerOptions {
        backtick_identifiers: false,
        double_quoted_strings: false,
        hash_comments: false,
        backslash_escapes: true,
        compound_comparisons: true,
        dollar_syntax: true,
    };
}

pub fn tokenize(source: &str, vocabulary: &Vocabulary, options: SqlLexerOptions) -> Lexed {
    let mut s = Scanner::new(source);
    loop {
        s.skip_whitespace();
        let Some(c) = s.peek() else { break };
        let mark = s.mark();

        match c {
            '-' if s.at_str("--") => {
                s.eat_while(|c| c != '\n');
                s.emit_hidden(mark, LINE_COMMENT);
            }
            '#' if s.peek_nth(1) == Some('{') => {
                if s.eat_braced() {
                    s.emit(mark, EMBEDDED_EXPRESSION);
                } else {
                    s.reject(mark);
                }
            }
            '#' if options.hash_comments => {
                s.eat_while(|c| c != '\n');
                s.emit_hidden(mark, LINE_COMMENT);
            }
            '/' if s.at_str("/*") => block_comment(&mut s, mark),
            '{' if s.at_str_ignore_case("{h-") => {
                s.eat_while(|c| c != '}');
                if s.eat('}') {
                    s.emit(mark, SCHEMA_PLACEHOLDER);
                } else {
                    s.reject(mark);
                }
            }
            '\'' => quoted(&mut s, mark, '\'', options.backslash_escapes, STRING_LITERAL),
            '"' if options.double_quoted_strings => {
                quoted(&mut s, mark, '"', options.backslash_escapes, STRING_LITERAL)
            }
            '"' => quoted(&mut s, mark, '"', false, QUOTED_IDENTIFIER),
            '`' if options.backtick_identifiers => quoted(&mut s, mark, '`', false, QUOTED_IDENTIFIER),
            '$' if options.dollar_syntax => dollar(&mut s, mark),
            '0' if matches!(s.peek_nth(1), Some('x' | 'X')) && s.peek_nth(2).is_some_and(|c| c.is_ascii_hexdigit()) => {
                s.bump();
                s.bump();
                s.eat_while(|c| c.is_ascii_hexdigit());
                s.emit(mark, HEX_LITERAL);
            }
            c if c.is_ascii_digit() || (c == '.' && s.peek_nth(1).is_some_and(|d| d.is_ascii_digit())) => {
                let symbol = if s.eat_number() { DECIMAL_LITERAL } else { INTEGER_LITERAL };
                s.emit(mark, symbol);
            }
            c if is_ident_start(c) && c != '$' => {
                s.eat_while(is_ident_part);
                let symbol = vocabulary.keyword(s.slice(mark)).unwrap_or(IDENTIFIER);
                s.emit(mark, symbol);
            }
            _ => match operator(&mut s, options) {
                Some(symbol) => s.emit(mark, symbol),
                None => s.reject(mark),
            },
        }
    }
    s.finish()
}

fn block_comment(s: &mut Scanner<'_>, mark: Mark) {
    s.eat_str("/*");
    while !s.is_eof() {
        if s.eat_str("*/") {
            s.emit_hidden(mark, BLOCK_COMMENT);
            return;
        }
        s.bump();
    }
    s.reject(mark);
}

fn quoted(s: &mut Scanner<'_>, mark: Mark, quote: char, escapes: bool, symbol: SymbolId) {
    if s.eat_quoted(quote, escapes) {
        s.emit(mark, symbol);
    } else {
        s.reject(mark);
    }
}

/// `$1`, `$$body$$` or `$tag$body$tag$`.
fn dollar(s: &mut Scanner<'_>, mark: Mark) {
    s.bump();
    if s.eat_while(|c| c.is_ascii_digit()) > 0 {
        s.emit(mark, POSITIONAL_PARAMETER);
        return;
    }
    s.eat_while(|c| c.is_alphanumeric() || c == '_');
    if !s.eat('$') {
        s.reject(mark);
        return;
    }
    let tag = s.slice(mark).to_string();
    while !s.is_eof() {
        if s.eat_str(&tag) {
            s.emit(mark, STRING_LITERAL);
            return;
        }
        s.bump();
    }
    s.reject(mark);
}

fn operator(s: &mut Scanner<'_>, options: SqlLexerOptions) -> Option<SymbolId> {
    let mut compound: Vec<(&str, SymbolId)> = vec![("::", DOUBLE_COLON), ("||", CONCAT)];
    if options.compound_comparisons {
        compound.extend([
            ("<=>", NULL_SAFE_EQ),
            ("->>", DOUBLE_ARROW),
            ("!~*", REGEX_OP),
            ("<>", NE),
            ("!=", NE),
            ("<=", LE),
            (">=", GE),
            ("->", ARROW),
            ("~*", REGEX_OP),
            ("!~", REGEX_OP),
            ("@>", CONTAINS),
            ("<@", CONTAINED_BY),
        ]);
    }
    for (text, symbol) in compound {
        if s.eat_str(text) {
            return Some(symbol);
        }
    }
    let symbol = match s.peek()? {
        '.' => DOT,
        ',' => COMMA,
        '(' => LPAREN,
        ')' => RPAREN,
        '[' => LBRACKET,
        ']' => RBRACKET,
        '{' => LBRACE,
        '}' => RBRACE,
        '=' => EQ,
        '<' => LT,
        '>' => GT,
        '+' => PLUS,
        '-' => MINUS,
        '*' => STAR,
        '/' => SLASH,
        '%' => PERCENT,
        ':' => COLON,
        '?' => QUESTION,
        ';' => SEMICOLON,
        '&' => AMP,
        '|' => PIPE,
        '^' => CARET,
        '~' => TILDE,
        '!' => BANG,
        '@' => AT,
        _ => return None,
    };
    s.bump();
    Some(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::runtime::EOF;
    use crate::parsers::{mysql, postgresql};

    fn mysql_symbols(source: &str) -> Vec<SymbolId> {
        tokenize(source, mysql::vocabulary(), SqlLexerOptions::MYSQL)
            .tokens
            .iter()
            .filter(|t| t.channel == crate::parsers::runtime::Channel::Default)
            .map(|t| t.symbol)
            .collect()
    }

    fn postgres_symbols(source: &str) -> Vec<SymbolId> {
        tokenize(source, postgresql::vocabulary(), SqlLexerOptions::POSTGRESQL)
            .tokens
            .iter()
            .map(|t| t.symbol)
            .collect()
    }

    #[test]
    fn test_mysql_keeps_comparisons_split() {
        assert_eq!(mysql_symbols("a >= b"), vec![IDENTIFIER, GT, EQ, IDENTIFIER, EOF]);
    }

    #[test]
    fn test_postgres_joins_comparisons() {
        assert_eq!(postgres_symbols("a >= b"), vec![IDENTIFIER, GE, IDENTIFIER, EOF]);
        assert_eq!(postgres_symbols("x::jsonb")[1], DOUBLE_COLON);
    }

    #[test]
    fn test_mysql_hash_comment_vs_embedded_expression() {
        let lexed = tokenize("x = :#{a} # trailing", mysql::vocabulary(), SqlLexerOptions::MYSQL);
        let hidden: Vec<_> = lexed.hidden().map(|(_, t)| t.symbol).collect();
        assert_eq!(hidden, vec![LINE_COMMENT]);
        assert!(lexed.tokens.iter().any(|t| t.symbol == EMBEDDED_EXPRESSION));
    }

    #[test]
    fn test_postgres_dollar_forms() {
        assert_eq!(postgres_symbols("$1"), vec![POSITIONAL_PARAMETER, EOF]);
        assert_eq!(postgres_symbols("$fn$ select 'x' $fn$"), vec![STRING_LITERAL, EOF]);
    }

    #[test]
    fn test_schema_placeholder() {
        let lexed = tokenize("CALL {h-schema}calc()", postgresql::vocabulary(), SqlLexerOptions::POSTGRESQL);
        assert_eq!(lexed.tokens[1].symbol, SCHEMA_PLACEHOLDER);
        assert_eq!((lexed.tokens[1].start, lexed.tokens[1].stop), (5, 15));
    }
}
