//! "Explain Query" code lenses

use lsp_types::{CodeLens, Command};
use serde_json::Value;
use tracing::debug;

use crate::analysis::{DialectChoice, EmbeddedQuerySnippet, QueryAnalyzer};
use crate::document::HostDocument;
use crate::error::AnalysisError;
use crate::parsers::GrammarId;

pub const EXPLAIN_COMMAND: &str = "vscode-spring-boot.query.explain";
pub const EXPLAIN_TITLE: &str = "Explain Query";

/// Prompt asking for an explanation of `query`. Only query dialects can be
/// explained.
pub fn explain_prompt(grammar: GrammarId, query: &str) -> Result<String, AnalysisError> {
    match grammar {
        GrammarId::Jpql | GrammarId::Hql | GrammarId::MySql | GrammarId::PostgreSql => {
            Ok(format!("Explain the following {} query:\n\n{}", grammar.display_name(), query))
        }
        GrammarId::Spel | GrammarId::PropertyPlaceholder => Err(AnalysisError::UnsupportedGrammar(grammar)),
    }
}

/// Lens over the whole snippet. `Ok(None)` when the snippet lies outside
/// `document`.
pub fn explain_lens(
    document: &HostDocument,
    snippet: &EmbeddedQuerySnippet,
    choice: &DialectChoice,
) -> Result<Option<CodeLens>, AnalysisError> {
    let prompt = explain_prompt(choice.grammar, &snippet.text)?;
    let Some(range) = document.range_of(snippet.host_range()) else {
        return Ok(None);
    };
    Ok(Some(CodeLens {
        range,
        command: Some(Command {
            title: EXPLAIN_TITLE.to_string(),
            command: EXPLAIN_COMMAND.to_string(),
            arguments: Some(vec![Value::String(prompt)]),
        }),
        data: None,
    }))
}

/// Lenses for every snippet with a dialect, when explain lenses are on.
pub fn explain_lenses(analyzer: &QueryAnalyzer, document: &HostDocument, snippets: &[EmbeddedQuerySnippet]) -> Vec<CodeLens> {
    if !analyzer.config().snapshot().explain_lenses_enabled {
        return Vec::new();
    }
    snippets
        .iter()
        .filter_map(|snippet| {
            let choice = analyzer.dialect_for(snippet)?;
            match explain_lens(document, snippet, &choice) {
                Ok(lens) => lens,
                Err(e) => {
                    debug!("No explain lens at {}: {}", snippet.host_start_offset, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ArtifactCapabilities;
    use crate::analysis::Capability;
    use crate::config::ConfigHandle;
    use serde_json::json;
    use std::sync::Arc;
    use url::Url;

    #[test]
    fn test_prompt_names_dialect() {
        assert_eq!(
            explain_prompt(GrammarId::Hql, "from Owner").unwrap(),
            "Explain the following HQL query:\n\nfrom Owner"
        );
        assert_eq!(
            explain_prompt(GrammarId::Spel, "#x"),
            Err(AnalysisError::UnsupportedGrammar(GrammarId::Spel))
        );
    }

    #[test]
    fn test_lenses_follow_setting() {
        let text = "owner.all=select o from Owner o";
        let doc = HostDocument::new(Url::parse("file:///repo/jpa-named-queries.properties").unwrap(), 0, text);
        let project = ArtifactCapabilities::default().with(Capability::HibernateRuntime);
        let analyzer = QueryAnalyzer::new(Arc::new(project), Arc::new(ConfigHandle::default()));
        let snippets = vec![EmbeddedQuerySnippet::new("select o from Owner o", 10, false)];
        assert!(explain_lenses(&analyzer, &doc, &snippets).is_empty());

        analyzer.config().update(&json!({ "spring-boot.ls.data-query.explain.enabled": true })).unwrap();
        let lenses = explain_lenses(&analyzer, &doc, &snippets);
        assert_eq!(lenses.len(), 1);
        assert_eq!(lenses[0].range.start.character, 10);
        let command = lenses[0].command.as_ref().unwrap();
        assert_eq!(command.command, EXPLAIN_COMMAND);
        assert_eq!(
            command.arguments,
            Some(vec![Value::String("Explain the following HQL query:\n\nselect o from Owner o".to_string())])
        );
    }
}
