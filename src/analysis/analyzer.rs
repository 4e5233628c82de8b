//! Per-snippet entry points used by the protocol layer

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use super::diagnostics::SeveritySink;
use super::dialect::{select_dialect, DialectChoice, ProjectCapabilities};
use super::engine;
use super::model::{EmbeddedQuerySnippet, ProblemKind, ProblemSink, ReconcileProblem, SemanticTokenDatum};
use crate::config::{ConfigHandle, QueryAnalysisConfig};
use crate::error::AnalysisError;
use crate::metrics::{metrics, FailureLimiter, TimingGuard};

/// Analyses query snippets of one project.
///
/// Capabilities can be swapped when the project's dependencies change; the
/// dialect is still chosen again for every snippet.
pub struct QueryAnalyzer {
    capabilities: RwLock<Arc<dyn ProjectCapabilities>>,
    config: Arc<ConfigHandle>,
    failures: FailureLimiter,
}

impl QueryAnalyzer {
    pub fn new(capabilities: Arc<dyn ProjectCapabilities>, config: Arc<ConfigHandle>) -> Self {
        Self::with_failure_limiter(capabilities, config, FailureLimiter::default())
    }

    pub fn with_failure_limiter(
        capabilities: Arc<dyn ProjectCapabilities>,
        config: Arc<ConfigHandle>,
        failures: FailureLimiter,
    ) -> Self {
        Self { capabilities: RwLock::new(capabilities), config, failures }
    }

    pub fn config(&self) -> &Arc<ConfigHandle> {
        &self.config
    }

    pub fn set_capabilities(&self, capabilities: Arc<dyn ProjectCapabilities>) {
        *self.capabilities.write() = capabilities;
    }

    pub fn dialect_for(&self, snippet: &EmbeddedQuerySnippet) -> Option<DialectChoice> {
        let capabilities = self.capabilities.read().clone();
        select_dialect(capabilities.as_ref(), snippet.is_native)
    }

    /// Reports the problems of one snippet into `sink`, with configured
    /// severities applied.
    ///
    /// Native queries without a known driver produce nothing. An internal
    /// failure becomes one `ANALYSIS_FAILURE` problem over the snippet, at
    /// most once per grammar per limiter window.
    pub fn reconcile_snippet(&self, snippet: &EmbeddedQuerySnippet, sink: &mut dyn ProblemSink) {
        let config = self.config.snapshot();
        self.reconcile_with(&config, snippet, sink);
    }

    pub(crate) fn reconcile_with(
        &self,
        config: &QueryAnalysisConfig,
        snippet: &EmbeddedQuerySnippet,
        sink: &mut dyn ProblemSink,
    ) {
        let Some(choice) = self.dialect_for(snippet) else {
            trace!("No dialect for native query at {}", snippet.host_start_offset);
            metrics().record_skipped_snippet();
            return;
        };
        let _timing = TimingGuard::new("reconcile");
        metrics().record_reconcile();

        let mut sink = SeveritySink::new(config, sink);
        let result = engine::reconcile(choice.grammar, &snippet.text, snippet.host_start_offset, config, &mut sink);
        if let Err(error) = result {
            metrics().record_internal_failure();
            warn!("Query analysis failed at {}: {}", snippet.host_start_offset, error);
            if self.failures.allow(error.grammar()) {
                sink.accept(ReconcileProblem::new(
                    ProblemKind::AnalysisFailure,
                    error.to_string(),
                    snippet.host_start_offset,
                    snippet.text.len(),
                ));
            } else {
                debug!("Suppressing repeated {} failure diagnostic", error.grammar());
            }
        }
    }

    /// Tokens of one snippet in host offsets.
    ///
    /// `Ok` with no tokens when semantic tokens are switched off or no
    /// dialect applies.
    pub fn tokens_for_snippet(&self, snippet: &EmbeddedQuerySnippet) -> Result<Vec<SemanticTokenDatum>, AnalysisError> {
        let config = self.config.snapshot();
        self.tokens_with(&config, snippet)
    }

    pub(crate) fn tokens_with(
        &self,
        config: &QueryAnalysisConfig,
        snippet: &EmbeddedQuerySnippet,
    ) -> Result<Vec<SemanticTokenDatum>, AnalysisError> {
        if !config.semantic_tokens_enabled {
            return Ok(Vec::new());
        }
        let Some(choice) = self.dialect_for(snippet) else {
            metrics().record_skipped_snippet();
            return Ok(Vec::new());
        };
        let _timing = TimingGuard::new("semantic_tokens");
        metrics().record_token_pass();
        engine::compute_tokens(choice.grammar, &snippet.text, snippet.host_start_offset, config)
    }

    /// Problems of every snippet of a document.
    pub fn reconcile_document(&self, snippets: &[EmbeddedQuerySnippet]) -> Vec<ReconcileProblem> {
        let config = self.config.snapshot();
        let mut problems = Vec::new();
        for snippet in snippets {
            self.reconcile_with(&config, snippet, &mut problems);
        }
        problems
    }

    /// Tokens of every snippet of a document, sorted. A snippet whose
    /// analysis fails contributes no tokens.
    pub fn document_tokens(&self, snippets: &[EmbeddedQuerySnippet]) -> Vec<SemanticTokenDatum> {
        let config = self.config.snapshot();
        let mut tokens = Vec::new();
        for snippet in snippets {
            match self.tokens_with(&config, snippet) {
                Ok(found) => tokens.extend(found),
                Err(error) => {
                    metrics().record_internal_failure();
                    warn!("Semantic tokens failed at {}: {}", snippet.host_start_offset, error);
                }
            }
        }
        tokens.sort_by_key(|t| (t.start, t.end));
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ArtifactCapabilities, Capability, ProblemSeverity, TokenType};
    use crate::parsers::GrammarId;
    use serde_json::json;
    use std::time::Duration;

    fn analyzer(capabilities: &[Capability]) -> QueryAnalyzer {
        let project = capabilities.iter().fold(ArtifactCapabilities::default(), |p, c| p.with(*c));
        QueryAnalyzer::new(Arc::new(project), Arc::new(ConfigHandle::default()))
    }

    #[test]
    fn test_stray_comma_gives_one_problem_inside_snippet() {
        let text = "select o from Order o where o.id = ?1,";
        let snippet = EmbeddedQuerySnippet::new(text, 100, false);
        let mut problems = Vec::new();
        analyzer(&[]).reconcile_snippet(&snippet, &mut problems);
        assert_eq!(problems.len(), 1, "Problems: {:?}", problems);
        assert!(problems[0].offset >= 100 && problems[0].end() <= 100 + text.len());
        assert_eq!(problems[0].kind, ProblemKind::JpqlSyntax);
    }

    #[test]
    fn test_native_query_without_driver_is_silent() {
        let snippet = EmbeddedQuerySnippet::new("SELECT FROM WHERE", 0, true);
        let mut problems = Vec::new();
        let analyzer = analyzer(&[Capability::HibernateRuntime]);
        analyzer.reconcile_snippet(&snippet, &mut problems);
        assert!(problems.is_empty());
        assert!(analyzer.tokens_for_snippet(&snippet).unwrap().is_empty());
    }

    #[test]
    fn test_capabilities_can_change() {
        let analyzer = analyzer(&[]);
        let snippet = EmbeddedQuerySnippet::new("select 1", 0, true);
        assert_eq!(analyzer.dialect_for(&snippet), None);
        analyzer.set_capabilities(Arc::new(ArtifactCapabilities::default().with(Capability::PostgreSqlDriver)));
        assert_eq!(analyzer.dialect_for(&snippet).map(|c| c.grammar), Some(GrammarId::PostgreSql));
    }

    #[test]
    fn test_configured_severity_applies() {
        let analyzer = analyzer(&[]);
        analyzer
            .config()
            .update(&json!({ "spring-boot.ls.problem.data-query.JPQL_SYNTAX": "WARNING" }))
            .unwrap();
        let problems = analyzer.reconcile_document(&[EmbeddedQuerySnippet::new("select o from", 0, false)]);
        assert!(!problems.is_empty());
        assert!(problems.iter().all(|p| p.severity == ProblemSeverity::Warning));
    }

    #[test]
    fn test_internal_failure_is_rate_limited() {
        let analyzer = QueryAnalyzer::with_failure_limiter(
            Arc::new(ArtifactCapabilities::default()),
            Arc::new(ConfigHandle::default()),
            FailureLimiter::new(Duration::from_secs(3600)),
        );
        let text = format!("select o from Order o where o.id = {}1{}", "(".repeat(300), ")".repeat(300));
        let snippet = EmbeddedQuerySnippet::new(text, 0, false);
        let first = analyzer.reconcile_document(std::slice::from_ref(&snippet));
        let second = analyzer.reconcile_document(std::slice::from_ref(&snippet));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, ProblemKind::AnalysisFailure);
        assert_eq!(first[0].severity, ProblemSeverity::Warning);
        assert!(second.is_empty(), "Second failure within the window is suppressed");
    }

    #[test]
    fn test_tokens_switched_off() {
        let analyzer = analyzer(&[]);
        let snippet = EmbeddedQuerySnippet::new("select o from Owner o", 0, false);
        assert_eq!(analyzer.tokens_for_snippet(&snippet).unwrap()[0].token_type, TokenType::Keyword);
        analyzer.config().set_semantic_tokens_enabled(false);
        assert!(analyzer.document_tokens(&[snippet]).is_empty());
    }
}
