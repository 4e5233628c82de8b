use lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString};
use tracing::trace;

use crate::analysis::{ProblemSeverity, ReconcileProblem};
use crate::document::HostDocument;

pub const DIAGNOSTIC_SOURCE: &str = "spring-data-query";

/// `None` for ignored problems.
pub fn to_lsp_severity(severity: ProblemSeverity) -> Option<DiagnosticSeverity> {
    match severity {
        ProblemSeverity::Error => Some(DiagnosticSeverity::ERROR),
        ProblemSeverity::Warning => Some(DiagnosticSeverity::WARNING),
        ProblemSeverity::Info => Some(DiagnosticSeverity::INFORMATION),
        ProblemSeverity::Hint => Some(DiagnosticSeverity::HINT),
        ProblemSeverity::Ignore => None,
    }
}

pub fn to_lsp_diagnostic(document: &HostDocument, problem: &ReconcileProblem) -> Option<Diagnostic> {
    let severity = to_lsp_severity(problem.severity)?;
    let Some(range) = document.range_of(problem.offset..problem.end()) else {
        trace!("Problem at {} lies outside {}", problem.offset, document.url());
        return None;
    };
    Some(Diagnostic {
        range,
        severity: Some(severity),
        code: Some(NumberOrString::String(problem.kind.id().to_string())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: problem.message.clone(),
        ..Default::default()
    })
}

pub fn to_lsp_diagnostics(document: &HostDocument, problems: &[ReconcileProblem]) -> Vec<Diagnostic> {
    problems.iter().filter_map(|p| to_lsp_diagnostic(document, p)).collect()
}
