//! # Progress — Atomic Scan Counters
//!
//! Thread-safe progress shared between scan workers and the background
//! reporter. Counters are lock-free atomics batched once per span (not per
//! candidate), so workers never contend on them in a hot loop. The reporter
//! thread logs rate and totals every 10 seconds and exits on the shutdown
//! flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

pub struct Progress {
    /// Candidates scanned so far, across all workers.
    pub scanned: AtomicU64,
    /// Primes found so far, across all workers.
    pub found: AtomicU64,
    start: Instant,
    shutdown: AtomicBool,
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            scanned: AtomicU64::new(0),
            found: AtomicU64::new(0),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Spawn the background reporter. It logs every 10 seconds until `stop`.
    pub fn start_reporter(self: &Arc<Self>) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        thread::spawn(move || loop {
            thread::sleep(Duration::from_secs(10));
            if progress.shutdown.load(Ordering::Relaxed) {
                break;
            }
            progress.log_status();
        })
    }

    pub fn log_status(&self) {
        let elapsed = self.start.elapsed();
        let scanned = self.scanned.load(Ordering::Relaxed);
        let found = self.found.load(Ordering::Relaxed);
        let rate = if elapsed.as_secs() > 0 {
            scanned as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        info!(
            scanned,
            found,
            rate = format_args!("{:.0}/s", rate),
            elapsed = format_args!("{:.1}s", elapsed.as_secs_f64()),
            "scan progress"
        );
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
