use crate::parsers::lexicon::*;
use crate::parsers::runtime::{is_ident_part, is_ident_start, Lexed, Scanner, SymbolId, Vocabulary};

/// Splits an object-query snippet into tokens. Keywords are resolved
/// against the dialect's vocabulary; anything else that looks like a word is
/// an identifier.
pub fn tokenize(source: &str, vocabulary: &Vocabulary) -> Lexed {
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
            '/' if s.at_str("/*") => {
                s.eat_str("/*");
                let mut closed = false;
                while !s.is_eof() {
                    if s.eat_str("*/") {
                        closed = true;
                        break;
                    }
                    s.bump();
                }
                if closed {
                    s.emit_hidden(mark, BLOCK_COMMENT);
                } else {
                    s.reject(mark);
                }
            }
            '\'' => {
                if s.eat_quoted('\'', false) {
                    s.emit(mark, STRING_LITERAL);
                } else {
                    s.reject(mark);
                }
            }
            '"' => {
                if s.eat_quoted('"', true) {
                    s.emit(mark, JAVA_STRING_LITERAL);
                } else {
                    s.reject(mark);
                }
            }
            '`' => {
                if s.eat_quoted('`', false) {
                    s.emit(mark, QUOTED_IDENTIFIER);
                } else {
                    s.reject(mark);
                }
            }
            '#' if s.peek_nth(1) == Some('{') => {
                if s.eat_braced() {
                    s.emit(mark, EMBEDDED_EXPRESSION);
                } else {
                    s.reject(mark);
                }
            }
            '0' if matches!(s.peek_nth(1), Some('x' | 'X')) => {
                s.bump();
                s.bump();
                s.eat_while(|c| c.is_ascii_hexdigit());
                s.emit(mark, HEX_LITERAL);
            }
            c if c.is_ascii_digit() || (c == '.' && s.peek_nth(1).is_some_and(|d| d.is_ascii_digit())) => {
                let symbol = number(&mut s);
                s.emit(mark, symbol);
            }
            c if is_ident_start(c) => {
                s.eat_while(is_ident_part);
                let symbol = vocabulary.keyword(s.slice(mark)).unwrap_or(IDENTIFIER);
                s.emit(mark, symbol);
            }
            _ => match operator(&mut s) {
                Some(symbol) => s.emit(mark, symbol),
                None => s.reject(mark),
            },
        }
    }
    s.finish()
}

fn number(s: &mut Scanner<'_>) -> SymbolId {
    let decimal = s.eat_number();
    if s.at_str_ignore_case("BI") {
        s.bump();
        s.bump();
        return LONG_LITERAL;
    }
    if s.at_str_ignore_case("BD") {
        s.bump();
        s.bump();
        return FLOAT_LITERAL;
    }
    match s.peek() {
        Some('l' | 'L') => {
            s.bump();
            LONG_LITERAL
        }
        Some('f' | 'F' | 'd' | 'D') => {
            s.bump();
            FLOAT_LITERAL
        }
        _ if decimal => DECIMAL_LITERAL,
        _ => INTEGER_LITERAL,
    }
}

fn operator(s: &mut Scanner<'_>) -> Option<SymbolId> {
    for (text, symbol) in [("<>", NE), ("!=", NE), ("<=", LE), (">=", GE), ("||", CONCAT)] {
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
