//! Counters and timings for query analysis
//!
//! Metrics are kept in memory and can be logged or exposed by the host
//! server.
//!
//! ## Metrics Tracked
//!
//! - Reconcile and semantic-token passes
//! - Syntax problems reported and internal failures
//! - Nested expression delegations
//! - Snippets skipped because no dialect applies
//! - Per-operation latencies
//!
//! Counters are lock-free atomics; timings live in a `DashMap`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::parsers::GrammarId;

static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| Arc::new(Metrics::new()));

/// The global metrics instance
pub fn metrics() -> &'static Arc<Metrics> {
    &METRICS
}

#[derive(Debug)]
pub struct Metrics {
    reconcile_passes: AtomicU64,
    token_passes: AtomicU64,
    syntax_problems: AtomicU64,
    internal_failures: AtomicU64,
    nested_delegations: AtomicU64,
    skipped_snippets: AtomicU64,

    // operation name -> durations in microseconds
    operation_timings: DashMap<String, Vec<u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            reconcile_passes: AtomicU64::new(0),
            token_passes: AtomicU64::new(0),
            syntax_problems: AtomicU64::new(0),
            internal_failures: AtomicU64::new(0),
            nested_delegations: AtomicU64::new(0),
            skipped_snippets: AtomicU64::new(0),
            operation_timings: DashMap::new(),
        }
    }

    pub fn record_reconcile(&self) {
        self.reconcile_passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_token_pass(&self) {
        self.token_passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_syntax_problems(&self, count: usize) {
        self.syntax_problems.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_internal_failure(&self) {
        self.internal_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_nested_delegation(&self) {
        self.nested_delegations.fetch_add(1, Ordering::Relaxed);
    }

    /// A native query whose SQL dialect could not be determined
    pub fn record_skipped_snippet(&self) {
        self.skipped_snippets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timing(&self, operation: &str, duration: Duration) {
        let micros = duration.as_micros() as u64;
        self.operation_timings
            .entry(operation.to_string())
            .or_default()
            .push(micros);
    }

    pub fn operation_stats(&self, operation: &str) -> Option<OperationStats> {
        let timings = self.operation_timings.get(operation)?;
        let mut sorted = timings.value().clone();
        drop(timings);
        sorted.sort_unstable();

        let count = sorted.len();
        if count == 0 {
            return Some(OperationStats::default());
        }
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];
        Some(OperationStats {
            count,
            min_micros: sorted[0],
            max_micros: sorted[count - 1],
            mean_micros: sorted.iter().sum::<u64>() / count as u64,
            p50_micros: sorted[count / 2],
            p95_micros: percentile(0.95),
            p99_micros: percentile(0.99),
        })
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            reconcile_passes: self.reconcile_passes.load(Ordering::Relaxed),
            token_passes: self.token_passes.load(Ordering::Relaxed),
            syntax_problems: self.syntax_problems.load(Ordering::Relaxed),
            internal_failures: self.internal_failures.load(Ordering::Relaxed),
            nested_delegations: self.nested_delegations.load(Ordering::Relaxed),
            skipped_snippets: self.skipped_snippets.load(Ordering::Relaxed),
        }
    }

    /// Resets all metrics (useful for testing)
    pub fn reset(&self) {
        self.reconcile_passes.store(0, Ordering::Relaxed);
        self.token_passes.store(0, Ordering::Relaxed);
        self.syntax_problems.store(0, Ordering::Relaxed);
        self.internal_failures.store(0, Ordering::Relaxed);
        self.nested_delegations.store(0, Ordering::Relaxed);
        self.skipped_snippets.store(0, Ordering::Relaxed);
        self.operation_timings.clear();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperationStats {
    pub count: usize,
    pub min_micros: u64,
    pub max_micros: u64,
    pub mean_micros: u64,
    pub p50_micros: u64, // Median
    pub p95_micros: u64,
    pub p99_micros: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSummary {
    pub reconcile_passes: u64,
    pub token_passes: u64,
    pub syntax_problems: u64,
    pub internal_failures: u64,
    pub nested_delegations: u64,
    pub skipped_snippets: u64,
}

/// RAII guard recording the duration of a scope into the global metrics.
///
/// ```
/// use query_language_server::metrics::TimingGuard;
///
/// fn reconcile_document() {
///     let _guard = TimingGuard::new("reconcile_document");
///     // ... do work ...
/// }
/// ```
pub struct TimingGuard {
    operation: &'static str,
    start: Instant,
}

impl TimingGuard {
    pub fn new(operation: &'static str) -> Self {
        Self { operation, start: Instant::now() }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        metrics().record_timing(self.operation, self.start.elapsed());
    }
}

/// Lets one internal-failure diagnostic through per grammar per window.
#[derive(Debug)]
pub struct FailureLimiter {
    window: Duration,
    last_reported: DashMap<GrammarId, Instant>,
}

impl FailureLimiter {
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(30);

    pub fn new(window: Duration) -> Self {
        Self { window, last_reported: DashMap::new() }
    }

    /// Whether a failure of `grammar` observed at `now` should be surfaced.
    pub fn allow_at(&self, grammar: GrammarId, now: Instant) -> bool {
        match self.last_reported.entry(grammar) {
            Entry::Occupied(mut last) => {
                if now.saturating_duration_since(*last.get()) < self.window {
                    return false;
                }
                last.insert(now);
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
                true
            }
        }
    }

    pub fn allow(&self, grammar: GrammarId) -> bool {
        self.allow_at(grammar, Instant::now())
    }
}

impl Default for FailureLimiter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}
