use query_language_server::analysis::TokenType::{self, *};
use query_language_server::config::QueryAnalysisConfig;
use query_language_server::GrammarId;

pub mod common;
use crate::common::{token_texts, token_triples, token_triples_with};

const SPEL_QUERY: &str = "SELECT owner FROM Owner owner left join fetch owner.pets WHERE owner.id =:#{id}";

#[test]
fn test_hql_simple_query() {
    let tokens = token_triples(GrammarId::Hql, "SELECT owner FROM Owner owner");
    assert_eq!(
        tokens,
        vec![(0, 6, Keyword), (7, 12, Variable), (13, 17, Keyword), (18, 23, Class), (24, 29, Variable)]
    );
}

#[test]
fn test_hql_initial_offset() {
    let tokens = token_triples_with(GrammarId::Hql, "SELECT owner FROM Owner owner", 3, &QueryAnalysisConfig::default());
    assert_eq!(
        tokens,
        vec![(3, 9, Keyword), (10, 15, Variable), (16, 20, Keyword), (21, 26, Class), (27, 32, Variable)]
    );
}

#[test]
fn test_hql_entity_named_like_keyword() {
    let tokens = token_texts(GrammarId::Hql, "SELECT g FROM Group g GROUP BY g.name");
    assert_eq!(tokens.len(), 10);
    assert_eq!(tokens[3], ("Group".to_string(), Class), "Entity name wins over keyword");
    assert_eq!(tokens[5], ("GROUP".to_string(), Keyword));
    assert_eq!(tokens[9], ("name".to_string(), Method));
}

#[test]
fn test_hql_embedded_expression_tokens() {
    let tokens = token_triples(GrammarId::Hql, SPEL_QUERY);
    let expected: Vec<(usize, usize, TokenType)> = vec![
        (0, 6, Keyword),
        (7, 12, Variable),
        (13, 17, Keyword),
        (18, 23, Class),
        (24, 29, Variable),
        (30, 34, Keyword),
        (35, 39, Keyword),
        (40, 45, Keyword),
        (46, 51, Variable),
        (51, 52, Operator),
        (52, 56, Method),
        (57, 62, Keyword),
        (63, 68, Variable),
        (68, 69, Operator),
        (69, 71, Method),
        (72, 73, Operator),
        (73, 74, Operator),
        (74, 76, Operator),
        (76, 78, Variable),
        (78, 79, Operator),
    ];
    assert_eq!(tokens, expected);
}

#[test]
fn test_hql_embedded_expression_as_string_when_disabled() {
    let config = QueryAnalysisConfig { embedded_expressions_enabled: false, ..Default::default() };
    let tokens = token_triples_with(GrammarId::Hql, SPEL_QUERY, 0, &config);
    assert_eq!(tokens.len(), 20);
    assert_eq!(tokens[18], (76, 78, String), "Inner text stays one string");
    assert_eq!(tokens[17], (74, 76, Operator));
    assert_eq!(tokens[19], (78, 79, Operator));
}

#[test]
fn test_hql_complex_embedded_expression() {
    let text = "SELECT owner FROM Owner owner left join fetch owner.pets WHERE owner.id =:#{someBean.someProperty != null ? someBean.someProperty : 'default'}";
    let tokens = token_texts(GrammarId::Hql, text);
    assert_eq!(tokens.len(), 30, "Unexpected tokens: {:?}", tokens);
    assert_eq!(tokens[17], ("#{".to_string(), Operator));
    assert_eq!(tokens[18], ("someBean".to_string(), Variable));
    assert_eq!(tokens[20], ("someProperty".to_string(), Property));
    assert_eq!(tokens[22], ("null".to_string(), Keyword));
    assert_eq!(tokens[28], ("'default'".to_string(), String));
    assert_eq!(tokens[29], ("}".to_string(), Operator));
}

#[test]
fn test_jpql_parameters() {
    let tokens = token_texts(GrammarId::Jpql, "SELECT o FROM Order o WHERE o.id = ?1 AND o.name = :name");
    let parameters: Vec<&str> = tokens
        .iter()
        .filter(|(_, t)| *t == Parameter)
        .map(|(text, _)| text.as_str())
        .collect();
    assert_eq!(parameters, vec!["1", "name"]);
    assert!(tokens.contains(&("Order".to_string(), Class)));
}

#[test]
fn test_tokens_are_sorted_and_disjoint() {
    for (grammar, text) in [
        (GrammarId::Jpql, "SELECT NEW com.example.Dto(o.id, o.name) FROM Owner o WHERE o.name = :#{#owner.name}"),
        (GrammarId::Hql, "SELECT upper(o.name) || '!' FROM Owner o ORDER BY o.name NULLS LAST LIMIT 10"),
        (GrammarId::MySql, "SELECT COUNT(*) FROM `order` o WHERE o.name REGEXP '^a' LIMIT 10, 20"),
        (GrammarId::PostgreSql, "UPDATE doc SET title = $2 WHERE id = $1 RETURNING id"),
    ] {
        let tokens = token_triples(grammar, text);
        assert!(!tokens.is_empty(), "No tokens for {}", text);
        for pair in tokens.windows(2) {
            assert!(pair[0].1 <= pair[1].0, "Overlapping tokens {:?} in {}", pair, text);
        }
        for (start, end, _) in &tokens {
            assert!(start < end && *end <= text.len(), "Token {}..{} outside {}", start, end, text);
        }
    }
}
