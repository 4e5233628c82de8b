use super::*;
use crate::parsers::runtime::{is_ident_part, Lexed, Scanner, SymbolId, Vocabulary};

pub fn tokenize(source: &str, vocabulary: &Vocabulary) -> Lexed {
    let mut s = Scanner::new(source);
    loop {
        s.skip_whitespace();
        let Some(c) = s.peek() else { break };
        let mark = s.mark();

        match c {
            '\'' | '"' => {
                if s.eat_quoted(c, false) {
                    s.emit(mark, STRING_LITERAL);
                } else {
                    s.reject(mark);
                }
            }
            '$' if s.peek_nth(1) == Some('{') => {
                if s.eat_braced() {
                    s.emit(mark, PROPERTY_PLACEHOLDER);
                } else {
                    s.reject(mark);
                }
            }
            '0' if matches!(s.peek_nth(1), Some('x' | 'X')) => {
                s.bump();
                s.bump();
                s.eat_while(|c| c.is_ascii_hexdigit());
                s.eat_while(|c| matches!(c, 'l' | 'L'));
                s.emit(mark, INTEGER_LITERAL);
            }
            c if c.is_ascii_digit() => {
                let real = s.eat_number();
                let symbol = match s.peek() {
                    Some('l' | 'L') => {
                        s.bump();
                        INTEGER_LITERAL
                    }
                    Some('f' | 'F' | 'd' | 'D') => {
                        s.bump();
                        REAL_LITERAL
                    }
                    _ if real => REAL_LITERAL,
                    _ => INTEGER_LITERAL,
                };
                s.emit(mark, symbol);
            }
            c if c.is_alphabetic() || c == '_' || (c == '$' && s.peek_nth(1) != Some('[')) => {
                s.eat_while(is_ident_part);
                let word = s.slice(mark);
                let symbol = match vocabulary.keyword(word) {
                    // T is only the type operator when it opens T(...)
                    Some(_) if word.eq_ignore_ascii_case("T") && s.peek() != Some('(') => IDENTIFIER,
                    Some(symbol) => symbol,
                    None => IDENTIFIER,
                };
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

fn operator(s: &mut Scanner<'_>) -> Option<SymbolId> {
    const COMPOUND: [(&str, SymbolId); 14] = [
        ("++", INC),
        ("--", DEC),
        ("^[", SELECT_FIRST),
        ("![", PROJECT),
        ("!=", NE),
        ("==", EQ),
        ("&&", SYMBOLIC_AND),
        ("||", SYMBOLIC_OR),
        ("?[", SELECT),
        ("?:", ELVIS),
        ("?.", SAFE_NAVI),
        ("$[", SELECT_LAST),
        (">=", GE),
        ("<=", LE),
    ];
    for (text, symbol) in COMPOUND {
        if s.eat_str(text) {
            return Some(symbol);
        }
    }
    let symbol = match s.peek()? {
        ';' => SEMICOLON,
        '+' => PLUS,
        '-' => MINUS,
        ':' => COLON,
        '.' => DOT,
        ',' => COMMA,
        '*' => STAR,
        '/' => DIV,
        '%' => MOD,
        '(' => LPAREN,
        ')' => RPAREN,
        '[' => LSQUARE,
        ']' => RSQUARE,
        '#' => HASH,
        '@' => BEAN_REF,
        '^' => POWER,
        '!' => NOT,
        '=' => ASSIGN,
        '&' => FACTORY_BEAN_REF,
        '?' => QMARK,
        '>' => GT,
        '<' => LT,
        '{' => LCURLY,
        '}' => RCURLY,
        _ => return None,
    };
    s.bump();
    Some(symbol)
}
