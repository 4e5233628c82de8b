//! Error types
//!
//! Syntax errors in user queries are not errors here: they are reported as
//! `ReconcileProblem`s. These types cover failures of the analysis itself
//! and malformed configuration.

use thiserror::Error;

use crate::parsers::GrammarId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A grammar panicked or hit the nesting limit.
    #[error("internal failure in {grammar} analysis: {message}")]
    InternalFailure { grammar: GrammarId, message: String },

    /// The grammar cannot serve the requested operation.
    #[error("{0} is not supported for this operation")]
    UnsupportedGrammar(GrammarId),
}

impl AnalysisError {
    pub fn internal(grammar: GrammarId, message: impl Into<String>) -> Self {
        AnalysisError::InternalFailure { grammar, message: message.into() }
    }

    pub fn grammar(&self) -> GrammarId {
        match self {
            AnalysisError::InternalFailure { grammar, .. } | AnalysisError::UnsupportedGrammar(grammar) => *grammar,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed settings: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown severity '{value}' for {kind}")]
    UnknownSeverity { kind: String, value: String },

    #[error("setting {key} must be {expected}")]
    WrongType { key: String, expected: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("stale change: document is at version {current}, change is for {received}")]
    StaleVersion { current: i32, received: i32 },

    #[error("position {}:{} is outside the document", .0.line, .0.character)]
    InvalidPosition(lsp_types::Position),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let error = AnalysisError::internal(GrammarId::Hql, "nesting limit exceeded");
        assert_eq!(error.to_string(), "internal failure in HQL analysis: nesting limit exceeded");
        assert_eq!(error.grammar(), GrammarId::Hql);
        assert_eq!(
            AnalysisError::UnsupportedGrammar(GrammarId::PropertyPlaceholder).to_string(),
            "Property placeholder is not supported for this operation"
        );
    }
}
