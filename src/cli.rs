//! # CLI — Run Helpers and Result Reporting
//!
//! Shared plumbing between `main` and the subcommands: worker-count
//! resolution, transport selection, timing, and the human/JSON result
//! summaries. The `compare` path mirrors the classic benchmark loop: run the
//! sequential reference, run the parallel pipeline, check they agree, report
//! the speedup.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::info;

use primespan::{
    run_parallel_with, run_sequential, ChannelTransport, Progress, SharedTransport, Transport,
};

/// Resolve a `--workers` value: 0 means all logical cores.
pub fn resolve_workers(workers: usize) -> usize {
    if workers > 0 {
        workers
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Build the transport named on the command line.
pub fn make_transport(name: &str) -> Result<Arc<dyn Transport>> {
    match name {
        "shared" => Ok(Arc::new(SharedTransport::new())),
        "channel" => Ok(Arc::new(ChannelTransport::new())),
        other => bail!("unknown transport '{}' (expected 'shared' or 'channel')", other),
    }
}

#[derive(Serialize)]
struct RunSummary<'a> {
    mode: &'a str,
    limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    workers: Option<usize>,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    largest: Option<u64>,
    elapsed_ms: u128,
}

fn report(mode: &str, limit: u64, workers: Option<usize>, primes: &[u64], elapsed: Duration, json: bool) {
    if json {
        let summary = RunSummary {
            mode,
            limit,
            workers,
            count: primes.len(),
            largest: primes.last().copied(),
            elapsed_ms: elapsed.as_millis(),
        };
        println!("{}", serde_json::to_string(&summary).expect("summary serializes"));
        return;
    }
    println!(
        "[{}] {} primes <= {} ({:.3} s)",
        mode,
        primes.len(),
        limit,
        elapsed.as_secs_f64()
    );
    if !primes.is_empty() {
        let head = &primes[..primes.len().min(10)];
        let tail = &primes[primes.len().saturating_sub(10)..];
        println!("first 10: {}", join(head));
        println!("last 10:  {}", join(tail));
    }
}

fn join(primes: &[u64]) -> String {
    primes
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn run_sequential_cmd(limit: u64, json: bool) -> Result<()> {
    let start = Instant::now();
    let primes = run_sequential(limit);
    report("sequential", limit, None, &primes, start.elapsed(), json);
    Ok(())
}

pub fn run_parallel_cmd(
    limit: u64,
    workers: usize,
    transport: &str,
    timeout: Duration,
    json: bool,
) -> Result<()> {
    let workers = resolve_workers(workers);
    let transport = make_transport(transport)?;
    let progress = Progress::new();
    let reporter = progress.start_reporter();

    let start = Instant::now();
    let result = run_parallel_with(limit, workers, transport, timeout, &progress);
    progress.stop();
    drop(reporter);

    let primes = result?;
    report("parallel", limit, Some(workers), &primes, start.elapsed(), json);
    Ok(())
}

pub fn run_compare_cmd(limit: u64, workers: usize, timeout: Duration, json: bool) -> Result<()> {
    let workers = resolve_workers(workers);

    let seq_start = Instant::now();
    let sequential = run_sequential(limit);
    let seq_elapsed = seq_start.elapsed();
    report("sequential", limit, None, &sequential, seq_elapsed, json);

    let progress = Progress::new();
    let par_start = Instant::now();
    let parallel = run_parallel_with(
        limit,
        workers,
        Arc::new(SharedTransport::new()),
        timeout,
        &progress,
    )?;
    let par_elapsed = par_start.elapsed();
    report("parallel", limit, Some(workers), &parallel, par_elapsed, json);

    if parallel != sequential {
        bail!(
            "parallel and sequential results disagree: {} vs {} primes",
            parallel.len(),
            sequential.len()
        );
    }

    let speedup = seq_elapsed.as_secs_f64() / par_elapsed.as_secs_f64().max(f64::EPSILON);
    if json {
        println!(
            "{}",
            serde_json::json!({ "mode": "compare", "limit": limit, "workers": workers, "match": true, "speedup": speedup })
        );
    } else {
        println!("results match, speedup: {:.2}x", speedup);
    }
    info!(limit, workers, speedup = format_args!("{:.2}", speedup), "comparison complete");
    Ok(())
}
