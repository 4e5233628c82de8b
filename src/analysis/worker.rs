//! Background analysis worker
//!
//! Requests are batched as they arrive and analysed on the blocking pool,
//! with rayon spreading a batch over the available cores. A parse cannot be
//! interrupted: cancelling a request only stops it from starting and drops
//! its result if it already ran.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, trace};
use url::Url;

use super::analyzer::QueryAnalyzer;
use super::model::{EmbeddedQuerySnippet, ReconcileProblem, SemanticTokenDatum};

/// Cooperative cancellation shared between a caller and the worker.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Reconcile,
    SemanticTokens,
}

#[derive(Debug)]
pub struct AnalysisRequest {
    pub uri: Url,
    pub kind: AnalysisKind,
    pub snippets: Vec<EmbeddedQuerySnippet>,
    pub cancellation: CancellationFlag,
    pub response: oneshot::Sender<AnalysisResult>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    pub problems: Vec<ReconcileProblem>,
    pub tokens: Vec<SemanticTokenDatum>,
    pub elapsed_ms: u64,
}

/// Sending side of the worker. The worker stops once every handle is
/// dropped.
#[derive(Clone)]
pub struct AnalysisWorkerHandle {
    request_tx: mpsc::UnboundedSender<AnalysisRequest>,
}

impl AnalysisWorkerHandle {
    /// Queues one request. The receiver yields nothing if the request is
    /// cancelled or the worker has stopped.
    pub fn submit(
        &self,
        uri: Url,
        kind: AnalysisKind,
        snippets: Vec<EmbeddedQuerySnippet>,
        cancellation: CancellationFlag,
    ) -> oneshot::Receiver<AnalysisResult> {
        let (response, response_rx) = oneshot::channel();
        let request = AnalysisRequest { uri, kind, snippets, cancellation, response };
        if let Err(e) = self.request_tx.send(request) {
            error!("Failed to queue analysis request for {}", e.0.uri);
        }
        response_rx
    }

    pub fn reconcile(&self, uri: Url, snippets: Vec<EmbeddedQuerySnippet>) -> oneshot::Receiver<AnalysisResult> {
        self.submit(uri, AnalysisKind::Reconcile, snippets, CancellationFlag::new())
    }

    pub fn semantic_tokens(&self, uri: Url, snippets: Vec<EmbeddedQuerySnippet>) -> oneshot::Receiver<AnalysisResult> {
        self.submit(uri, AnalysisKind::SemanticTokens, snippets, CancellationFlag::new())
    }

    pub fn is_running(&self) -> bool {
        !self.request_tx.is_closed()
    }
}

/// Spawns the worker on the current tokio runtime.
pub fn spawn_analysis_worker(analyzer: Arc<QueryAnalyzer>) -> AnalysisWorkerHandle {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<AnalysisRequest>();

    tokio::spawn(async move {
        debug!("Query analysis worker started");
        while let Some(first) = request_rx.recv().await {
            let mut batch = vec![first];
            while let Ok(request) = request_rx.try_recv() {
                batch.push(request);
            }
            trace!("Analysing batch of {} request(s)", batch.len());

            let analyzer = analyzer.clone();
            tokio::spawn(async move {
                match tokio::task::spawn_blocking(move || analyze_batch(&analyzer, batch)).await {
                    Ok(finished) => {
                        for (request, result) in finished {
                            if request.cancellation.is_cancelled() {
                                trace!("Discarding result for cancelled request on {}", request.uri);
                                continue;
                            }
                            if request.response.send(result).is_err() {
                                debug!("Analysis result for {} dropped by caller", request.uri);
                            }
                        }
                    }
                    Err(e) => error!("Analysis batch panicked: {}", e),
                }
            });
        }
        debug!("Query analysis worker stopped");
    });

    AnalysisWorkerHandle { request_tx }
}

struct Finished {
    uri: Url,
    cancellation: CancellationFlag,
    response: oneshot::Sender<AnalysisResult>,
}

fn analyze_batch(analyzer: &QueryAnalyzer, batch: Vec<AnalysisRequest>) -> Vec<(Finished, AnalysisResult)> {
    batch
        .into_par_iter()
        .filter_map(|request| {
            if request.cancellation.is_cancelled() {
                trace!("Skipping cancelled request on {}", request.uri);
                return None;
            }
            let start = Instant::now();
            let mut result = AnalysisResult::default();
            match request.kind {
                AnalysisKind::Reconcile => result.problems = analyzer.reconcile_document(&request.snippets),
                AnalysisKind::SemanticTokens => result.tokens = analyzer.document_tokens(&request.snippets),
            }
            result.elapsed_ms = start.elapsed().as_millis() as u64;
            let finished = Finished { uri: request.uri, cancellation: request.cancellation, response: request.response };
            Some((finished, result))
        })
        .collect()
}
