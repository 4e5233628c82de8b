#![allow(dead_code)]

use std::sync::Arc;

use query_language_server::analysis::{ArtifactCapabilities, Capability, QueryAnalyzer, TokenType};
use query_language_server::config::{ConfigHandle, QueryAnalysisConfig};
use query_language_server::{compute_tokens, GrammarId};

/// `(start, end, type)` triples, the shape the token expectations are
/// written in.
pub fn token_triples(grammar: GrammarId, text: &str) -> Vec<(usize, usize, TokenType)> {
    token_triples_with(grammar, text, 0, &QueryAnalysisConfig::default())
}

pub fn token_triples_with(
    grammar: GrammarId,
    text: &str,
    offset: usize,
    config: &QueryAnalysisConfig,
) -> Vec<(usize, usize, TokenType)> {
    compute_tokens(grammar, text, offset, config)
        .expect("token computation failed")
        .into_iter()
        .map(|t| (t.start, t.end, t.token_type))
        .collect()
}

/// Token texts with their types, for readable assertions.
pub fn token_texts(grammar: GrammarId, text: &str) -> Vec<(String, TokenType)> {
    token_triples(grammar, text)
        .into_iter()
        .map(|(start, end, token_type)| (text[start..end].to_string(), token_type))
        .collect()
}

pub fn analyzer_for(capabilities: &[Capability]) -> QueryAnalyzer {
    analyzer_with_config(capabilities, QueryAnalysisConfig::default())
}

pub fn analyzer_with_config(capabilities: &[Capability], config: QueryAnalysisConfig) -> QueryAnalyzer {
    let project = capabilities
        .iter()
        .fold(ArtifactCapabilities::default(), |project, capability| project.with(*capability));
    QueryAnalyzer::new(Arc::new(project), Arc::new(ConfigHandle::new(config)))
}
