pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod language_regions;
pub mod logging;
pub mod lsp;
pub mod metrics;
pub mod parsers;

pub use analysis::{compute_tokens, reconcile, EmbeddedQuerySnippet, QueryAnalyzer, ReconcileProblem, SemanticTokenDatum};
pub use config::{ConfigHandle, QueryAnalysisConfig};
pub use error::{AnalysisError, ConfigError, DocumentError};
pub use parsers::GrammarId;
