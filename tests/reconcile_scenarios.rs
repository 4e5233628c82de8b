use indoc::indoc;
use serde_json::json;

use query_language_server::analysis::{Capability, ProblemKind, ProblemSeverity};
use query_language_server::config::QueryAnalysisConfig;
use query_language_server::language_regions::LocatorRegistry;
use query_language_server::{reconcile, EmbeddedQuerySnippet, GrammarId, ReconcileProblem};

pub mod common;
use crate::common::{analyzer_for, analyzer_with_config};

const PROPERTIES_PATH: &str = "src/main/resources/META-INF/jpa-named-queries.properties";

fn problems_in(grammar: GrammarId, text: &str) -> Vec<ReconcileProblem> {
    let mut problems = Vec::new();
    reconcile(grammar, text, 0, &QueryAnalysisConfig::default(), &mut problems).expect("reconcile failed");
    problems
}

#[test]
fn test_named_query_without_errors() {
    let document = "query1=SELECT ptype FROM PetType ptype ORDER BY ptype.name\n";
    let snippets = LocatorRegistry::with_defaults().locate(PROPERTIES_PATH, document);
    let analyzer = analyzer_for(&[Capability::HibernateRuntime]);
    assert_eq!(analyzer.reconcile_document(&snippets), vec![]);
}

#[test]
fn test_named_query_with_misspelled_select() {
    let document = "query1=SELECTX ptype FROM PetType ptype ORDER BY ptype.name\n";
    let snippets = LocatorRegistry::with_defaults().locate(PROPERTIES_PATH, document);
    let analyzer = analyzer_for(&[Capability::HibernateRuntime]);
    let problems = analyzer.reconcile_document(&snippets);
    assert_eq!(problems.len(), 1, "Problems: {:?}", problems);
    let problem = &problems[0];
    assert_eq!(&document[problem.offset..problem.end()], "SELECTX");
    assert!(problem.message.starts_with("HQL: mismatched input 'SELECTX'"), "{}", problem.message);
    assert_eq!(problem.kind, ProblemKind::HqlSyntax);
    assert_eq!(problem.severity, ProblemSeverity::Error);
}

#[test]
fn test_join_without_alias_depends_on_dialect() {
    let query = "SELECT DISTINCT owner FROM Owner owner left join  owner.pets WHERE owner.lastName LIKE :lastName%";
    let document = format!("query1={}\n", query);
    let snippets = LocatorRegistry::with_defaults().locate(PROPERTIES_PATH, &document);

    let hibernate = analyzer_for(&[Capability::HibernateRuntime]);
    assert_eq!(hibernate.reconcile_document(&snippets), vec![], "HQL accepts the join");

    let plain = analyzer_for(&[]);
    let problems = plain.reconcile_document(&snippets);
    assert_eq!(problems.len(), 1, "Problems: {:?}", problems);
    assert_eq!(&document[problems[0].offset..problems[0].end()], "WHERE");
    assert!(problems[0].message.starts_with("JPQL: no viable alternative"), "{}", problems[0].message);
}

#[test]
fn test_native_queries_follow_driver() {
    let document = indoc! {"
        Owner.count.native=SELEC COUNT(*) FROM owners
    "};
    let snippets = LocatorRegistry::with_defaults().locate(PROPERTIES_PATH, document);
    assert_eq!(snippets.len(), 1);
    assert!(snippets[0].is_native);

    assert_eq!(analyzer_for(&[]).reconcile_document(&snippets), vec![], "No driver, no native analysis");

    let problems = analyzer_for(&[Capability::PostgreSqlDriver]).reconcile_document(&snippets);
    assert_eq!(problems.len(), 1, "Problems: {:?}", problems);
    assert_eq!(problems[0].kind, ProblemKind::SqlSyntax);
    assert!(problems[0].message.starts_with("PostgreSQL: "), "{}", problems[0].message);
    assert_eq!(&document[problems[0].offset..problems[0].end()], "SELEC");
}

#[test]
fn test_configured_severity_and_ignore() {
    let snippet = EmbeddedQuerySnippet::new("SELEC 1", 0, true);
    let settings = json!({
        "spring-boot": { "ls": { "problem": { "data-query": { "SQL_SYNTAX": "WARNING" } } } }
    });
    let config = QueryAnalysisConfig::from_settings(&settings).unwrap();
    let analyzer = analyzer_with_config(&[Capability::MySqlDriver], config);
    let problems = analyzer.reconcile_document(std::slice::from_ref(&snippet));
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].severity, ProblemSeverity::Warning);

    analyzer
        .config()
        .update(&json!({ "spring-boot.ls.problem.data-query.SQL_SYNTAX": "IGNORE" }))
        .unwrap();
    assert_eq!(analyzer.reconcile_document(&[snippet]), vec![], "Ignored problems are dropped");
}

#[test]
fn test_nested_expression_problem_in_host_coordinates() {
    let text = "SELECT o FROM Owner o WHERE o.id = :#{foo(1}";
    let problems = problems_in(GrammarId::Jpql, text);
    assert_eq!(problems.len(), 1, "Problems: {:?}", problems);
    assert_eq!(problems[0].kind, ProblemKind::SpelSyntax);
    assert!(problems[0].message.starts_with("SpEL: "), "{}", problems[0].message);
    let expression_start = text.find("#{").unwrap() + 2;
    assert!(problems[0].offset >= expression_start, "{:?} starts inside the expression", problems[0]);
    assert!(problems[0].end() <= text.len() - 1);
}

#[test]
fn test_nested_expression_not_checked_when_disabled() {
    let config = QueryAnalysisConfig { embedded_expressions_enabled: false, ..Default::default() };
    let mut problems: Vec<ReconcileProblem> = Vec::new();
    reconcile(GrammarId::Jpql, "SELECT o FROM Owner o WHERE o.id = :#{foo(1}", 0, &config, &mut problems).unwrap();
    assert_eq!(problems, vec![]);
}

#[test]
fn test_problems_in_every_statement_position() {
    for (grammar, text, expected) in [
        (GrammarId::Jpql, "select o from Order o where o.id = ?1,", ","),
        (GrammarId::Hql, "SELECTX ptype FROM PetType ptype", "SELECTX"),
        (GrammarId::PostgreSql, "SELECT * FROM WHERE x = 1", "WHERE"),
    ] {
        let problems = problems_in(grammar, text);
        assert_eq!(problems.len(), 1, "{}: {:?}", text, problems);
        assert_eq!(&text[problems[0].offset..problems[0].end()], expected, "{}", text);
    }
}

#[test]
fn test_problem_at_end_of_input_stays_inside_snippet() {
    let text = "SELECT o FROM Owner o WHERE";
    let problems = problems_in(GrammarId::Jpql, text);
    assert!(!problems.is_empty());
    for problem in &problems {
        assert!(problem.end() <= text.len(), "{:?} runs past the snippet", problem);
        assert!(problem.length > 0);
    }
}
