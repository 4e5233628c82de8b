//! Grammar runtime shared by all query dialects
//!
//! Lexers are built on [`Scanner`], parsers on [`Recognizer`]. Both report
//! [`SyntaxError`]s in snippet-local coordinates; translation into host
//! document offsets happens in `analysis::diagnostics`.

mod recognizer;
mod scanner;
mod token;
mod vocabulary;

pub use recognizer::{ParseEvent, Parsed, Recognizer, MAX_RULE_DEPTH};
pub use scanner::{is_ident_part, is_ident_start, Mark, Scanner};
pub use token::{Channel, Lexed, SymbolId, SyntaxError, Token, EOF};
pub use vocabulary::{KeywordGroup, Vocabulary};
