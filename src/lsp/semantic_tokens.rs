//! Semantic tokens in protocol form

use lsp_types::{SemanticToken, SemanticTokenType, SemanticTokens, SemanticTokensLegend};
use tracing::trace;

use crate::analysis::{SemanticTokenDatum, TokenType};
use crate::document::HostDocument;

/// Legend published to the client. Token type indexes refer to
/// [`TokenType::ALL`].
pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: TokenType::ALL.iter().map(|t| SemanticTokenType::new(t.as_str())).collect(),
        token_modifiers: Vec::new(),
    }
}

fn type_index(token_type: TokenType) -> u32 {
    TokenType::ALL.iter().position(|t| *t == token_type).unwrap_or(0) as u32
}

/// Delta encoder over absolute line/column positions.
struct SemanticTokensBuilder {
    tokens: Vec<SemanticToken>,
    prev_line: u32,
    prev_start: u32,
}

impl SemanticTokensBuilder {
    fn new() -> Self {
        Self { tokens: Vec::new(), prev_line: 0, prev_start: 0 }
    }

    /// Tokens must arrive in document order.
    fn push(&mut self, line: u32, start: u32, length: u32, token_type: u32) {
        if length == 0 {
            return;
        }
        let delta_line = line.saturating_sub(self.prev_line);
        let delta_start = if delta_line == 0 { start.saturating_sub(self.prev_start) } else { start };
        self.tokens.push(SemanticToken {
            delta_line,
            delta_start,
            length,
            token_type,
            token_modifiers_bitset: 0,
        });
        self.prev_line = line;
        self.prev_start = start;
    }

    fn build(self) -> Vec<SemanticToken> {
        self.tokens
    }
}

/// Encodes sorted, non-overlapping tokens. Tokens spanning line breaks are
/// split into one token per line; tokens outside the document are dropped.
pub fn encode(document: &HostDocument, tokens: &[SemanticTokenDatum]) -> Vec<SemanticToken> {
    let mut builder = SemanticTokensBuilder::new();
    for token in tokens {
        let (Some(start), Some(end)) = (document.position_of(token.start), document.position_of(token.end)) else {
            trace!("Dropping token {:?} outside the document", token.range());
            continue;
        };
        let token_type = type_index(token.token_type);
        if start.line == end.line {
            builder.push(start.line, start.character, end.character.saturating_sub(start.character), token_type);
            continue;
        }
        for line in start.line..=end.line {
            let from = if line == start.line { start.character } else { 0 };
            let to = if line == end.line {
                end.character
            } else {
                document.line_len_utf16(line as usize).unwrap_or(0) as u32
            };
            builder.push(line, from, to.saturating_sub(from), token_type);
        }
    }
    builder.build()
}

pub fn semantic_tokens(document: &HostDocument, tokens: &[SemanticTokenDatum]) -> SemanticTokens {
    SemanticTokens { result_id: None, data: encode(document, tokens) }
}
