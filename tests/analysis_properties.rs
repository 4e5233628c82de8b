use quickcheck::{QuickCheck, TestResult};

use query_language_server::config::QueryAnalysisConfig;
use query_language_server::{compute_tokens, reconcile, AnalysisError, GrammarId, ReconcileProblem};

const GRAMMARS: [GrammarId; 5] = [
    GrammarId::Jpql,
    GrammarId::Hql,
    GrammarId::MySql,
    GrammarId::PostgreSql,
    GrammarId::Spel,
];

/// Query-shaped fragments, so generated inputs reach past the first token.
const FRAGMENTS: [&str; 24] = [
    "SELECT", "o", "FROM", "Owner", "WHERE", "o.name", "=", ":name", "?1", "AND", "(", ")", ",", "'x'", "42",
    ":#{#id}", "#{[0]}", "${app.name}", "ORDER BY", "GROUP BY", "count(*)", "JOIN", "o.pets p", ";",
];

fn query_from(choices: &[u8]) -> String {
    choices
        .iter()
        .map(|c| FRAGMENTS[*c as usize % FRAGMENTS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_internal(error: &AnalysisError) -> bool {
    matches!(error, AnalysisError::InternalFailure { .. })
}

#[test]
fn test_problems_stay_inside_the_snippet() {
    fn prop(text: String, grammar: u8, shift: u16) -> TestResult {
        let grammar = GRAMMARS[grammar as usize % GRAMMARS.len()];
        let shift = shift as usize;
        let mut problems: Vec<ReconcileProblem> = Vec::new();
        match reconcile(grammar, &text, shift, &QueryAnalysisConfig::default(), &mut problems) {
            Ok(()) => {}
            Err(e) if is_internal(&e) => return TestResult::discard(),
            Err(_) => return TestResult::failed(),
        }
        let inside = problems
            .iter()
            .all(|p| p.offset >= shift && p.end() <= shift + text.len() && (p.length > 0 || text.is_empty()));
        TestResult::from_bool(inside)
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(String, u8, u16) -> TestResult);
}

#[test]
fn test_tokens_shift_with_the_initial_offset() {
    fn prop(choices: Vec<u8>, grammar: u8, shift: u16) -> TestResult {
        let grammar = GRAMMARS[grammar as usize % GRAMMARS.len()];
        let text = query_from(&choices);
        let config = QueryAnalysisConfig::default();
        let (Ok(at_zero), Ok(shifted)) = (
            compute_tokens(grammar, &text, 0, &config),
            compute_tokens(grammar, &text, shift as usize, &config),
        ) else {
            return TestResult::discard();
        };
        let moved: Vec<_> = at_zero
            .iter()
            .map(|t| (t.start + shift as usize, t.end + shift as usize, t.token_type))
            .collect();
        let actual: Vec<_> = shifted.iter().map(|t| (t.start, t.end, t.token_type)).collect();
        TestResult::from_bool(moved == actual)
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(Vec<u8>, u8, u16) -> TestResult);
}

#[test]
fn test_tokens_are_sorted_and_in_bounds() {
    fn prop(choices: Vec<u8>, grammar: u8) -> TestResult {
        let grammar = GRAMMARS[grammar as usize % GRAMMARS.len()];
        let text = query_from(&choices);
        let Ok(tokens) = compute_tokens(grammar, &text, 0, &QueryAnalysisConfig::default()) else {
            return TestResult::discard();
        };
        let sorted = tokens.windows(2).all(|w| (w[0].start, w[0].end) <= (w[1].start, w[1].end));
        let in_bounds = tokens.iter().all(|t| t.start < t.end && t.end <= text.len());
        TestResult::from_bool(sorted && in_bounds)
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(Vec<u8>, u8) -> TestResult);
}

#[test]
fn test_deep_nesting_is_an_internal_failure() {
    let text = format!("SELECT o FROM Owner o WHERE {}1{}", "(".repeat(1000), ")".repeat(1000));
    let mut problems: Vec<ReconcileProblem> = Vec::new();
    let result = reconcile(GrammarId::Jpql, &text, 0, &QueryAnalysisConfig::default(), &mut problems);
    assert!(matches!(result, Err(AnalysisError::InternalFailure { grammar: GrammarId::Jpql, .. })), "{:?}", result);
}
