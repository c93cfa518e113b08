//! # Partition — Deterministic Span Assignment
//!
//! Splits the candidate interval [2, N] into W contiguous, disjoint spans,
//! one per worker. The block size is the integer division `(N − 1) / W` over
//! the span size, and the **last worker absorbs the remainder** — an
//! asymmetric policy kept for reproducibility rather than replaced with even
//! remainder distribution. When W exceeds the span size the leading workers
//! receive empty spans and contribute nothing.

/// An inclusive candidate range owned by exactly one worker.
///
/// Empty iff `start > end`, which is how excess workers are represented when
/// the worker count exceeds the number of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    /// True when the span contains no candidates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of candidates in the span.
    #[inline]
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }
}

/// Split [2, n] into `worker_count` spans. Requires n ≥ 2 and
/// `worker_count` ≥ 1 (callers reject n < 2 before partitioning).
///
/// Worker i < W−1 owns `[2 + i·block, 2 + (i+1)·block − 1]`; the last worker
/// owns `[2 + (W−1)·block, n]`. The union is exactly [2, n] with no overlap.
pub fn partition(n: u64, worker_count: usize) -> Vec<Span> {
    debug_assert!(n >= 2 && worker_count >= 1);
    let w = worker_count as u64;
    let block = (n - 1) / w;
    (0..w)
        .map(|i| {
            let start = 2 + i * block;
            let end = if i == w - 1 { n } else { start + block - 1 };
            Span { start, end }
        })
        .collect()
}
