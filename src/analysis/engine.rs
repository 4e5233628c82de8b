//! Reconciliation and semantic-token computation for one snippet
//!
//! Both entry points parse once, under `catch_unwind`, and then recurse into
//! nested `#{...}` / `${...}` spans with the start offset shifted past the
//! opening delimiter. Nested results are already in host coordinates.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace};

use super::classifier::NodeKind;
use super::diagnostics::DiagnosticMapper;
use super::model::{ProblemSink, SemanticTokenDatum, TokenType};
use crate::config::QueryAnalysisConfig;
use crate::error::AnalysisError;
use crate::metrics::metrics;
use crate::parsers::position_utils::to_host;
use crate::parsers::runtime::{Channel, ParseEvent, Token};
use crate::parsers::{create_parser, GrammarId, NestedLanguage, ParseOutcome};

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic while parsing".to_string()
    }
}

/// Parses `text`, converting panics and runaway nesting into
/// [`AnalysisError::InternalFailure`].
fn parse_guarded(grammar: GrammarId, text: &str, start_offset: usize) -> Result<ParseOutcome, AnalysisError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| create_parser(grammar, text, start_offset).run()))
        .map_err(|payload| AnalysisError::internal(grammar, panic_message(payload.as_ref())))?;
    if outcome.depth_exceeded {
        return Err(AnalysisError::internal(grammar, "nesting limit exceeded"));
    }
    Ok(outcome)
}

/// The nested language to descend into, unless switched off.
fn active_nested(grammar: GrammarId, config: &QueryAnalysisConfig) -> Option<NestedLanguage> {
    grammar
        .nested()
        .filter(|nested| nested.grammar != GrammarId::Spel || config.embedded_expressions_enabled)
}

/// Marker tokens of `nested` with their inner content range.
fn nested_spans(outcome: &ParseOutcome, nested: NestedLanguage) -> impl Iterator<Item = (&Token, usize, usize)> {
    outcome
        .tokens
        .iter()
        .filter(move |t| t.symbol == nested.marker && t.channel == Channel::Default)
        .filter(move |t| t.len() >= nested.opener_len + nested.closer_len)
        .map(move |t| (t, t.start + nested.opener_len, t.stop - nested.closer_len))
}

/// Pushes every syntax problem of `text` into `sink`, including problems of
/// nested expressions.
pub fn reconcile(
    grammar: GrammarId,
    text: &str,
    start_offset: usize,
    config: &QueryAnalysisConfig,
    sink: &mut dyn ProblemSink,
) -> Result<(), AnalysisError> {
    if text.is_empty() {
        return Ok(());
    }
    let outcome = parse_guarded(grammar, text, start_offset)?;
    debug!("{} reconcile at {}: {} problem(s)", grammar, start_offset, outcome.errors.len());
    metrics().record_syntax_problems(outcome.errors.len());

    let mapper = DiagnosticMapper::new(grammar, text, start_offset);
    for error in &outcome.errors {
        sink.accept(mapper.map(error));
    }

    if let Some(nested) = active_nested(grammar, config) {
        let mut failure = None;
        for (_, from, to) in nested_spans(&outcome, nested) {
            metrics().record_nested_delegation();
            if let Err(e) = reconcile(nested.grammar, &text[from..to], to_host(start_offset, from), config, sink) {
                failure.get_or_insert(e);
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }
    }
    Ok(())
}

/// Classified tokens of `text`, sorted and non-overlapping, shifted by
/// `initial_offset`.
pub fn compute_tokens(
    grammar: GrammarId,
    text: &str,
    initial_offset: usize,
    config: &QueryAnalysisConfig,
) -> Result<Vec<SemanticTokenDatum>, AnalysisError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let outcome = parse_guarded(grammar, text, initial_offset)?;
    let classifier = grammar.classifier();

    // first token index -> (last token index, type)
    let mut spans: BTreeMap<usize, (usize, TokenType)> = BTreeMap::new();

    for (index, token) in outcome.tokens.iter().enumerate() {
        if token.channel == Channel::Hidden {
            if let Some(token_type) = classifier.classify(NodeKind::Terminal(token.symbol), token, text) {
                spans.insert(index, (index, token_type));
            }
        }
    }
    // Terminals first, then rules in the order they completed, so a rule
    // always overrides the lexical type of the tokens it covers.
    for event in &outcome.events {
        if let ParseEvent::Terminal { token, .. } = *event {
            let t = &outcome.tokens[token];
            if let Some(token_type) = classifier.classify(NodeKind::Terminal(t.symbol), t, text) {
                spans.insert(token, (token, token_type));
            }
        }
    }
    for event in &outcome.events {
        if let ParseEvent::Rule { rule, first, last } = *event {
            let t = &outcome.tokens[first];
            if let Some(token_type) = classifier.classify(NodeKind::Rule(rule), t, text) {
                let covered: Vec<usize> = spans.range(first..=last).map(|(&k, _)| k).collect();
                for key in covered {
                    spans.remove(&key);
                }
                spans.insert(first, (last, token_type));
            }
        }
    }

    let mut result: Vec<SemanticTokenDatum> = spans
        .into_iter()
        .filter_map(|(first, (last, token_type))| {
            let start = outcome.tokens[first].start;
            let end = outcome.tokens[last].stop;
            (start < end).then(|| SemanticTokenDatum::new(to_host(initial_offset, start), to_host(initial_offset, end), token_type))
        })
        .collect();

    if let Some(nested) = grammar.nested() {
        let delegate = active_nested(grammar, config).is_some();
        for (marker, from, to) in nested_spans(&outcome, nested) {
            result.push(SemanticTokenDatum::new(
                to_host(initial_offset, marker.start),
                to_host(initial_offset, from),
                TokenType::Operator,
            ));
            if delegate {
                metrics().record_nested_delegation();
                result.extend(compute_tokens(nested.grammar, &text[from..to], to_host(initial_offset, from), config)?);
            } else if from < to {
                result.push(SemanticTokenDatum::new(to_host(initial_offset, from), to_host(initial_offset, to), TokenType::String));
            }
            result.push(SemanticTokenDatum::new(
                to_host(initial_offset, to),
                to_host(initial_offset, marker.stop),
                TokenType::Operator,
            ));
        }
    }

    result.sort_by_key(|t| (t.start, t.end));
    trace!("{} tokens at {}: {}", grammar, initial_offset, result.len());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ReconcileProblem;

    fn tokens(grammar: GrammarId, text: &str) -> Vec<(String, TokenType)> {
        compute_tokens(grammar, text, 0, &QueryAnalysisConfig::default())
            .unwrap()
            .into_iter()
            .map(|t| (text[t.start..t.end].to_string(), t.token_type))
            .collect()
    }

    #[test]
    fn test_rule_overrides_lexical_type() {
        let result = tokens(GrammarId::Hql, "SELECT g FROM Group g GROUP BY g.name");
        assert_eq!(result.len(), 10);
        assert_eq!(result[3], ("Group".to_string(), TokenType::Class));
        assert_eq!(result[9], ("name".to_string(), TokenType::Method));
    }

    #[test]
    fn test_empty_text_has_no_tokens() {
        assert!(tokens(GrammarId::PostgreSql, "").is_empty());
    }

    #[test]
    fn test_nested_expression_is_bracketed_by_operators() {
        let result = tokens(GrammarId::Jpql, "SELECT o FROM Owner o WHERE o.id = :#{id}");
        let tail: Vec<_> = result[result.len() - 4..].to_vec();
        assert_eq!(
            tail,
            vec![
                (":".to_string(), TokenType::Operator),
                ("#{".to_string(), TokenType::Operator),
                ("id".to_string(), TokenType::Variable),
                ("}".to_string(), TokenType::Operator),
            ]
        );
    }

    #[test]
    fn test_disabled_nested_expression_is_a_string() {
        let config = QueryAnalysisConfig { embedded_expressions_enabled: false, ..Default::default() };
        let text = "SELECT o FROM Owner o WHERE o.id = :#{id}";
        let result = compute_tokens(GrammarId::Jpql, text, 0, &config).unwrap();
        let inner = &result[result.len() - 2];
        assert_eq!(&text[inner.start..inner.end], "id");
        assert_eq!(inner.token_type, TokenType::String);
    }

    #[test]
    fn test_nested_problems_are_absolute() {
        let text = "SELECT o FROM Owner o WHERE o.id = :#{foo(}";
        let mut problems: Vec<ReconcileProblem> = Vec::new();
        reconcile(GrammarId::Jpql, text, 100, &QueryAnalysisConfig::default(), &mut problems).unwrap();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].message.starts_with("SpEL: "));
        assert!(problems[0].offset >= 100 + 38 && problems[0].end() <= 100 + text.len());
    }

    #[test]
    fn test_nesting_limit_is_an_internal_failure() {
        let text = format!("{}1{}", "(".repeat(400), ")".repeat(400));
        let result = compute_tokens(GrammarId::Spel, &text, 0, &QueryAnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::InternalFailure { grammar: GrammarId::Spel, .. })));
    }
}
