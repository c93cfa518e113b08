//! # Engine — Two-Phase Pipeline Orchestration
//!
//! Runs the whole pipeline: base primes are generated sequentially up to
//! ⌊√N⌋, the remaining interval is partitioned into one span per worker, W
//! scans run concurrently on a dedicated pool, and the aggregator merges
//! their results into one globally sorted sequence.
//!
//! The phase order is strict: scanning cannot begin before base generation
//! completes, because the oracle's early exit is only sound against a
//! complete base set. Within the scanning phase there is no ordering among
//! workers at all — the final sort is the sole ordering guarantee, and it
//! runs only after the transport has handed over exactly W local results.
//!
//! ## Paths
//!
//! - [`run_sequential`] — the single-threaded reference path: base primes
//!   plus one scan over the full interval. Used for correctness comparison.
//! - [`run_parallel`] — the partitioned pipeline over the default
//!   shared-memory transport.
//! - [`run_parallel_with`] — the same pipeline with an injected transport,
//!   collection deadline, and progress handle.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::partition::{partition, Span};
use crate::progress::Progress;
use crate::transport::{SharedTransport, Transport};
use crate::trial::{base_limit, generate_base};
use crate::worker;

/// Default bound on how long the aggregator waits for worker results.
pub const DEFAULT_COLLECT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum EngineError {
    /// The pipeline needs at least one worker; rejected before any phase runs.
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    /// Fewer than the expected number of local results arrived before the
    /// collection deadline. Reported instead of silently under-counting.
    #[error("aggregation incomplete: received {received} of {expected} worker results before the deadline")]
    IncompleteAggregation { received: usize, expected: usize },

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Single-threaded reference path: base primes, then one scan over [2, n].
///
/// Infallible — every `u64` is a valid bound, and n < 2 yields an empty
/// result.
pub fn run_sequential(n: u64) -> Vec<u64> {
    if n < 2 {
        return Vec::new();
    }
    let base = generate_base(base_limit(n));
    worker::scan(Span { start: 2, end: n }, &base)
}

/// Full partitioned pipeline over the default shared-memory transport.
pub fn run_parallel(n: u64, worker_count: usize) -> Result<Vec<u64>, EngineError> {
    run_parallel_with(
        n,
        worker_count,
        Arc::new(SharedTransport::new()),
        DEFAULT_COLLECT_TIMEOUT,
        &Progress::new(),
    )
}

/// Full partitioned pipeline with an injected transport, collection deadline,
/// and progress handle.
///
/// Workers own their local results exclusively until the single
/// `Transport::deliver` hand-off; the base set is shared read-only and never
/// locked. Produces identical output for identical (n, worker_count)
/// regardless of the transport realization or worker completion order.
pub fn run_parallel_with(
    n: u64,
    worker_count: usize,
    transport: Arc<dyn Transport>,
    timeout: Duration,
    progress: &Arc<Progress>,
) -> Result<Vec<u64>, EngineError> {
    if worker_count == 0 {
        return Err(EngineError::InvalidWorkerCount);
    }
    if n < 2 {
        return Ok(Vec::new());
    }

    let limit = base_limit(n);
    let base = Arc::new(generate_base(limit));
    debug!(limit, base_primes = base.len(), "base primes generated");

    let spans = partition(n, worker_count);
    debug!(workers = worker_count, "interval partitioned");

    // A panicking scan must surface as a missing delivery (and thus an
    // IncompleteAggregation at the deadline), not a process abort.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .panic_handler(|_| warn!("scan worker panicked; its result will not be delivered"))
        .build()?;

    for span in spans {
        let base = Arc::clone(&base);
        let transport = Arc::clone(&transport);
        let progress = Arc::clone(progress);
        pool.spawn(move || {
            let local = worker::scan(span, &base);
            progress.scanned.fetch_add(span.len(), Ordering::Relaxed);
            progress.found.fetch_add(local.len() as u64, Ordering::Relaxed);
            transport.deliver(local);
        });
    }

    let locals = transport.collect(worker_count, timeout)?;
    let result = aggregate(locals);
    info!(
        limit = n,
        workers = worker_count,
        primes = result.len(),
        "parallel scan complete"
    );
    Ok(result)
}

/// Merge all local results into the global result: concatenate in arrival
/// order, then sort. Spans are disjoint, so no dedup pass is needed — but the
/// sort is mandatory because workers finish in no particular order.
pub fn aggregate(locals: Vec<Vec<u64>>) -> Vec<u64> {
    let mut all: Vec<u64> = locals.into_iter().flatten().collect();
    all.sort_unstable();
    all
}

#[cfg(test)]
mod tests {
    //! Validates the engine against the sequential trial-division definition
    //! of primality: known values (primes ≤ 10, π(100) = 25, π(10000) = 1229,
    //! OEIS [A000720](https://oeis.org/A000720)), parallel/sequential
    //! equivalence across worker counts, transport interchangeability, and
    //! the degenerate and invalid-input cases.

    use super::*;
    use crate::transport::ChannelTransport;

    // ── Known Values ────────────────────────────────────────────────────

    #[test]
    fn sequential_primes_up_to_ten() {
        assert_eq!(run_sequential(10), vec![2, 3, 5, 7]);
    }

    #[test]
    fn sequential_known_counts() {
        assert_eq!(run_sequential(100).len(), 25);
        assert_eq!(run_sequential(10000).len(), 1229);
    }

    #[test]
    fn sequential_trivial_bounds() {
        assert_eq!(run_sequential(0), Vec::<u64>::new());
        assert_eq!(run_sequential(1), Vec::<u64>::new());
        assert_eq!(run_sequential(2), vec![2]);
        assert_eq!(run_sequential(3), vec![2, 3]);
    }

    // ── Parallel/Sequential Equivalence ─────────────────────────────────

    /// The core correctness property: the parallel pipeline must match the
    /// sequential reference exactly, for every tested (N, W) pair.
    #[test]
    fn parallel_matches_sequential() {
        for n in [0u64, 1, 2, 3, 10, 100, 10000] {
            let expected = run_sequential(n);
            for w in [1usize, 2, 3, 7] {
                assert_eq!(
                    run_parallel(n, w).unwrap(),
                    expected,
                    "mismatch at n={} workers={}",
                    n,
                    w
                );
            }
        }
    }

    /// Both transport realizations produce identical output.
    #[test]
    fn transports_are_interchangeable() {
        let shared = run_parallel_with(
            5000,
            4,
            Arc::new(SharedTransport::new()),
            DEFAULT_COLLECT_TIMEOUT,
            &Progress::new(),
        )
        .unwrap();
        let channel = run_parallel_with(
            5000,
            4,
            Arc::new(ChannelTransport::new()),
            DEFAULT_COLLECT_TIMEOUT,
            &Progress::new(),
        )
        .unwrap();
        assert_eq!(shared, channel);
        assert_eq!(shared, run_sequential(5000));
    }

    // ── Output Shape ────────────────────────────────────────────────────

    /// Strictly increasing: no duplicates, no inversions.
    #[test]
    fn parallel_output_strictly_increasing() {
        for w in [1usize, 2, 5, 8] {
            let primes = run_parallel(3000, w).unwrap();
            assert!(
                primes.windows(2).all(|p| p[0] < p[1]),
                "inversion or duplicate with {} workers",
                w
            );
        }
    }

    // ── Degenerate and Invalid Inputs ───────────────────────────────────

    /// More workers than candidates: excess workers contribute empty results
    /// harmlessly and the output matches a single-worker run.
    #[test]
    fn excess_workers_are_harmless() {
        assert_eq!(run_parallel(10, 50).unwrap(), run_parallel(10, 1).unwrap());
        assert_eq!(run_parallel(2, 8).unwrap(), vec![2]);
    }

    #[test]
    fn zero_workers_rejected_before_any_phase() {
        assert!(matches!(
            run_parallel(100, 0),
            Err(EngineError::InvalidWorkerCount)
        ));
    }

    #[test]
    fn small_bounds_yield_empty_results() {
        assert_eq!(run_parallel(0, 4).unwrap(), Vec::<u64>::new());
        assert_eq!(run_parallel(1, 4).unwrap(), Vec::<u64>::new());
    }

    // ── Aggregation ─────────────────────────────────────────────────────

    /// The merge must not assume arrival order follows span order.
    #[test]
    fn aggregate_sorts_out_of_order_arrivals() {
        let locals = vec![vec![11, 13], vec![2, 3, 5, 7], vec![], vec![17, 19]];
        assert_eq!(aggregate(locals), vec![2, 3, 5, 7, 11, 13, 17, 19]);
    }

    #[test]
    fn aggregate_of_nothing_is_empty() {
        assert_eq!(aggregate(Vec::new()), Vec::<u64>::new());
        assert_eq!(aggregate(vec![vec![], vec![]]), Vec::<u64>::new());
    }

    // ── Progress Accounting ─────────────────────────────────────────────

    /// Workers batch exactly one scanned/found update per span: the scanned
    /// total is the interval size and the found total is the prime count.
    #[test]
    fn progress_counts_whole_interval() {
        let progress = Progress::new();
        let primes = run_parallel_with(
            1000,
            3,
            Arc::new(SharedTransport::new()),
            DEFAULT_COLLECT_TIMEOUT,
            &progress,
        )
        .unwrap();
        assert_eq!(progress.scanned.load(Ordering::Relaxed), 999); // |[2, 1000]|
        assert_eq!(progress.found.load(Ordering::Relaxed), primes.len() as u64);
    }
}
