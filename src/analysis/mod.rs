//! Dialect-independent query analysis
//!
//! The pipeline for one snippet is: pick a grammar ([`dialect`]), parse it
//! once, then map syntax errors to host-document problems
//! ([`diagnostics`]) or classify tokens ([`engine`]). Nested `#{...}` and
//! `${...}` spans go through the same pipeline with a shifted start offset.

pub mod analyzer;
pub mod classifier;
pub mod diagnostics;
pub mod dialect;
pub mod engine;
mod model;
pub mod parameters;
pub mod worker;

pub use analyzer::QueryAnalyzer;
pub use dialect::{select_dialect, ArtifactCapabilities, Capability, DialectChoice, ProjectCapabilities};
pub use engine::{compute_tokens, reconcile};
pub use model::*;
pub use parameters::{
    bind_parameters, resolve_parameter, FormalParameter, MethodDeclaration, ParameterBinding, ParameterDescriptor,
};
pub use worker::{spawn_analysis_worker, AnalysisKind, AnalysisResult, AnalysisWorkerHandle, CancellationFlag};
