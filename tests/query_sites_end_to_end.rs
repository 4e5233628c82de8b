use std::sync::Arc;

use indoc::indoc;
use lsp_types::{
    DiagnosticSeverity, GotoDefinitionResponse, InlayHintLabel, NumberOrString, Position, SemanticToken,
    TextDocumentContentChangeEvent,
};
use url::Url;

use query_language_server::analysis::{
    spawn_analysis_worker, Capability, EmbeddedQuerySnippet, FormalParameter, MethodDeclaration, TokenType,
};
use query_language_server::document::HostDocument;
use query_language_server::language_regions::LocatorRegistry;
use query_language_server::lsp::{encode, explain_lenses, to_lsp_diagnostics, ParameterNavigator};

pub mod common;
use crate::common::analyzer_for;

const PROPERTIES_URL: &str = "file:///petclinic/src/main/resources/META-INF/jpa-named-queries.properties";

fn properties_document(text: &str) -> HostDocument {
    HostDocument::new(Url::parse(PROPERTIES_URL).unwrap(), 1, text)
}

#[test]
fn test_properties_file_to_semantic_tokens() {
    let text = "# owners\nOwner.all=SELECT owner FROM Owner owner\n";
    let document = properties_document(text);
    let snippets = LocatorRegistry::with_defaults().locate(document.url().path(), text);
    assert_eq!(snippets.len(), 1);
    assert_eq!(snippets[0].host_start_offset, 19);

    let analyzer = analyzer_for(&[Capability::HibernateRuntime]);
    let tokens = analyzer.document_tokens(&snippets);
    let keyword = TokenType::ALL.iter().position(|t| *t == TokenType::Keyword).unwrap() as u32;
    let variable = TokenType::ALL.iter().position(|t| *t == TokenType::Variable).unwrap() as u32;
    let class = TokenType::ALL.iter().position(|t| *t == TokenType::Class).unwrap() as u32;

    let encoded = encode(&document, &tokens);
    let token = |delta_line, delta_start, length, token_type| SemanticToken {
        delta_line,
        delta_start,
        length,
        token_type,
        token_modifiers_bitset: 0,
    };
    assert_eq!(
        encoded,
        vec![
            token(1, 10, 6, keyword),
            token(0, 7, 5, variable),
            token(0, 6, 4, keyword),
            token(0, 5, 5, class),
            token(0, 6, 5, variable),
        ]
    );
}

#[test]
fn test_properties_file_to_diagnostics() {
    let text = indoc! {"
        Owner.all=SELECT owner FROM Owner owner
        Owner.broken=SELECTX owner FROM Owner owner
    "};
    let document = properties_document(text);
    let snippets = LocatorRegistry::with_defaults().locate(document.url().path(), text);
    let analyzer = analyzer_for(&[Capability::HibernateRuntime]);
    let diagnostics = to_lsp_diagnostics(&document, &analyzer.reconcile_document(&snippets));
    assert_eq!(diagnostics.len(), 1, "Diagnostics: {:?}", diagnostics);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.range.start, Position::new(1, 13));
    assert_eq!(diagnostic.range.end, Position::new(1, 20));
    assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::ERROR));
    assert_eq!(diagnostic.code, Some(NumberOrString::String("HQL_SYNTAX".to_string())));
}

#[test]
fn test_edits_are_reanalysed() {
    let text = "Owner.all=SELECTX owner FROM Owner owner";
    let mut document = properties_document(text);
    let analyzer = analyzer_for(&[Capability::HibernateRuntime]);
    let registry = LocatorRegistry::with_defaults();

    let before = registry.locate(document.url().path(), &document.text());
    assert_eq!(analyzer.reconcile_document(&before).len(), 1);

    let change = TextDocumentContentChangeEvent {
        range: Some(lsp_types::Range::new(Position::new(0, 16), Position::new(0, 17))),
        range_length: None,
        text: String::new(),
    };
    document.apply_changes(&[change], 2).unwrap();
    assert_eq!(document.text(), "Owner.all=SELECT owner FROM Owner owner");
    let after = registry.locate(document.url().path(), &document.text());
    assert!(analyzer.reconcile_document(&after).is_empty());
}

#[test]
fn test_parameter_navigation_over_computed_tokens() {
    let source = indoc! {r#"
        interface OwnerRepository {
            @Query("SELECT o FROM Owner o WHERE o.lastName = :lastName AND o.city = ?2")
            List<Owner> find(String lastName, String city);
        }
    "#};
    let document = HostDocument::new(Url::parse("file:///petclinic/OwnerRepository.java").unwrap(), 0, source);
    let query_start = source.find("SELECT").unwrap();
    let query_end = source.find("?2").unwrap() + 2;
    let snippet = EmbeddedQuerySnippet::new(&source[query_start..query_end], query_start, false);

    let last_name = source.find("lastName,").unwrap();
    let city = source.find("city)").unwrap();
    let method = MethodDeclaration::new(
        "find",
        vec![
            FormalParameter::new("lastName", last_name..last_name + 8),
            FormalParameter::new("city", city..city + 4),
        ],
    );

    let analyzer = analyzer_for(&[]);
    let tokens = analyzer.document_tokens(&[snippet]);
    let navigator = ParameterNavigator::new(&method, &document, &tokens);
    let names: Vec<&str> = navigator.bindings().iter().map(|b| b.parameter_name.as_str()).collect();
    assert_eq!(names, vec!["lastName", "city"]);

    let hints = navigator.inlay_hints(&document);
    assert_eq!(hints.len(), 2);
    assert!(matches!(&hints[1].label, InlayHintLabel::String(label) if label == "city"));

    let usage = source.find(":lastName").unwrap() + 3;
    let Some(GotoDefinitionResponse::Scalar(location)) = navigator.definition(&document, usage) else {
        panic!("Expected the declaration of lastName");
    };
    assert_eq!(location.range.start.line, 2);
    assert_eq!(navigator.highlights(&document, usage).len(), 2);
}

#[test]
fn test_explain_lenses_for_named_queries() {
    let text = "Owner.all=SELECT owner FROM Owner owner\n";
    let document = properties_document(text);
    let snippets = LocatorRegistry::with_defaults().locate(document.url().path(), text);
    let analyzer = analyzer_for(&[]);
    analyzer
        .config()
        .update(&serde_json::json!({ "spring-boot.ls.data-query.explain.enabled": true }))
        .unwrap();
    let lenses = explain_lenses(&analyzer, &document, &snippets);
    assert_eq!(lenses.len(), 1);
    let arguments = lenses[0].command.as_ref().and_then(|c| c.arguments.clone()).unwrap();
    assert_eq!(
        arguments[0].as_str(),
        Some("Explain the following JPQL query:\n\nSELECT owner FROM Owner owner")
    );
}

#[tokio::test]
async fn test_worker_serves_both_passes() {
    let text = "Owner.all=SELECT owner FROM Owner owner\nOwner.bad=SELECTX owner FROM Owner owner\n";
    let url = Url::parse(PROPERTIES_URL).unwrap();
    let snippets = LocatorRegistry::with_defaults().locate(url.path(), text);
    assert_eq!(snippets.len(), 2);

    let worker = spawn_analysis_worker(Arc::new(analyzer_for(&[Capability::HibernateRuntime])));
    let reconciled = worker.reconcile(url.clone(), snippets.clone()).await.unwrap();
    assert!(!reconciled.problems.is_empty());
    assert!(reconciled.problems.iter().all(|p| p.offset >= snippets[1].host_start_offset));

    let highlighted = worker.semantic_tokens(url, snippets).await.unwrap();
    assert!(highlighted.tokens.len() >= 5);
    assert!(highlighted.tokens.windows(2).all(|w| w[0].start <= w[1].start));
}
