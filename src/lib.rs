//! # primespan — Parallel Segmented Trial-Division Prime Finder
//!
//! Produces the sorted, duplicate-free set of all primes in [2, N]. A base
//! set of primes up to ⌊√N⌋ is generated sequentially, the remaining
//! interval is partitioned into one contiguous span per worker, W workers
//! scan their spans concurrently by trial division against the shared base
//! set, and the aggregator merges the locally sorted results into one global
//! sequence.
//!
//! The hand-off between workers and the aggregator is injectable: the
//! shared-memory accumulator and the message-passing channel realizations
//! ship in [`transport`] and produce identical output for identical input.
//!
//! ```
//! let primes = primespan::run_parallel(100, 4).unwrap();
//! assert_eq!(primes.len(), 25);
//! assert_eq!(primes, primespan::run_sequential(100));
//! ```

pub mod engine;
pub mod partition;
pub mod progress;
pub mod transport;
pub mod trial;
pub mod worker;

pub use engine::{
    run_parallel, run_parallel_with, run_sequential, EngineError, DEFAULT_COLLECT_TIMEOUT,
};
pub use partition::{partition, Span};
pub use progress::Progress;
pub use transport::{ChannelTransport, SharedTransport, Transport};
