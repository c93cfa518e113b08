//! # Transport — Result Hand-Off Between Workers and the Aggregator
//!
//! The transport is the one injectable collaborator of the engine: how a
//! worker's finished local result reaches the aggregator. Two realizations
//! ship, and both must produce byte-identical global results for the same
//! input:
//!
//! - [`SharedTransport`] — shared-memory hand-off. A mutex-guarded
//!   accumulator appended to once per worker; the lock is held only for the
//!   O(1) append, never during scanning. A condvar wakes the collector.
//! - [`ChannelTransport`] — message-passing hand-off. Each worker sends its
//!   local result as one self-contained message; the collector drains the
//!   channel with a per-receive deadline.
//!
//! Collection is a barrier with a bounded wait: the aggregator needs exactly
//! one result per worker, and rather than block forever on a worker that
//! never reports, `collect` fails with
//! [`EngineError::IncompleteAggregation`](crate::engine::EngineError) once
//! the deadline passes.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::engine::EngineError;

/// Hand-off capability between workers and the aggregator.
///
/// `deliver` transfers ownership of one worker's local result; `collect`
/// blocks until `expected` results have arrived or the timeout expires.
/// Arrival order is unspecified — the aggregator sorts.
pub trait Transport: Send + Sync {
    /// Hand one worker's local result to the collector. Called once per
    /// worker, after its scan completes.
    fn deliver(&self, local: Vec<u64>);

    /// Wait for exactly `expected` results, failing after `timeout`.
    fn collect(&self, expected: usize, timeout: Duration) -> Result<Vec<Vec<u64>>, EngineError>;
}

/// Shared-memory hand-off: a mutex-guarded accumulator plus a condvar.
#[derive(Default)]
pub struct SharedTransport {
    slots: Mutex<Vec<Vec<u64>>>,
    ready: Condvar,
}

impl SharedTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for SharedTransport {
    fn deliver(&self, local: Vec<u64>) {
        let mut slots = self.slots.lock().unwrap();
        slots.push(local);
        self.ready.notify_all();
    }

    fn collect(&self, expected: usize, timeout: Duration) -> Result<Vec<Vec<u64>>, EngineError> {
        let deadline = Instant::now() + timeout;
        let mut slots = self.slots.lock().unwrap();
        while slots.len() < expected {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(EngineError::IncompleteAggregation {
                    received: slots.len(),
                    expected,
                });
            }
            let (guard, _timed_out) = self.ready.wait_timeout(slots, remaining).unwrap();
            slots = guard;
        }
        Ok(std::mem::take(&mut *slots))
    }
}

/// Message-passing hand-off over an in-process channel, one message per
/// worker.
pub struct ChannelTransport {
    tx: Sender<Vec<u64>>,
    rx: Mutex<Receiver<Vec<u64>>>,
}

impl ChannelTransport {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        ChannelTransport {
            tx,
            rx: Mutex::new(rx),
        }
    }
}

impl Default for ChannelTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ChannelTransport {
    fn deliver(&self, local: Vec<u64>) {
        if self.tx.send(local).is_err() {
            warn!("result channel closed before delivery; dropping worker result");
        }
    }

    fn collect(&self, expected: usize, timeout: Duration) -> Result<Vec<Vec<u64>>, EngineError> {
        let deadline = Instant::now() + timeout;
        let rx = self.rx.lock().unwrap();
        let mut results = Vec::with_capacity(expected);
        while results.len() < expected {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(local) => results.push(local),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return Err(EngineError::IncompleteAggregation {
                        received: results.len(),
                        expected,
                    });
                }
            }
        }
        Ok(results)
    }
}
